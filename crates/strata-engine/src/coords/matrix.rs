use core::ops::Mul;

use super::Vec2;

/// 2D affine transform stored as a 3×2 matrix `[a, b, c, d, tx, ty]`.
///
/// A point maps as:
///
/// ```text
/// x' = a·x + c·y + tx
/// y' = b·x + d·y + ty
/// ```
///
/// `m1 * m2` applies `m2` first, then `m1`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    #[inline]
    pub const fn new(a: f32, b: f32, c: f32, d: f32, tx: f32, ty: f32) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    #[inline]
    pub const fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    #[inline]
    pub const fn scaling(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `angle` radians; positive angles turn clockwise on screen (+Y down).
    #[inline]
    pub fn rotation(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(c, s, -s, c, 0.0, 0.0)
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Returns `self` followed by a translation.
    #[inline]
    pub fn then_translate(self, offset: Vec2) -> Self {
        Matrix::translation(offset.x, offset.y) * self
    }

    /// Returns `self` followed by a scale about `pivot`.
    pub fn then_scale(self, sx: f32, sy: f32, pivot: Vec2) -> Self {
        Matrix::translation(pivot.x, pivot.y)
            * Matrix::scaling(sx, sy)
            * Matrix::translation(-pivot.x, -pivot.y)
            * self
    }

    /// Returns `self` followed by a rotation about `pivot`.
    pub fn then_rotate(self, angle: f32, pivot: Vec2) -> Self {
        Matrix::translation(pivot.x, pivot.y)
            * Matrix::rotation(angle)
            * Matrix::translation(-pivot.x, -pivot.y)
            * self
    }

    #[inline]
    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse transform, or `None` when the matrix is singular (e.g. zero scale).
    pub fn invert(&self) -> Option<Matrix> {
        let det = self.determinant();
        if det.abs() <= f32::EPSILON || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        Some(Matrix::new(
            self.d * inv,
            -self.b * inv,
            -self.c * inv,
            self.a * inv,
            (self.c * self.ty - self.d * self.tx) * inv,
            (self.b * self.tx - self.a * self.ty) * inv,
        ))
    }

    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    /// Approximate uniform scale factor, used to pick curve flattening density.
    #[inline]
    pub fn max_scale(&self) -> f32 {
        let sx = (self.a * self.a + self.b * self.b).sqrt();
        let sy = (self.c * self.c + self.d * self.d).sqrt();
        sx.max(sy)
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Matrix {
        Matrix::new(
            self.a * rhs.a + self.c * rhs.b,
            self.b * rhs.a + self.d * rhs.b,
            self.a * rhs.c + self.c * rhs.d,
            self.b * rhs.c + self.d * rhs.d,
            self.a * rhs.tx + self.c * rhs.ty + self.tx,
            self.b * rhs.tx + self.d * rhs.ty + self.ty,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn composition_applies_right_operand_first() {
        let m = Matrix::translation(10.0, 0.0) * Matrix::scaling(2.0, 2.0);
        assert!(approx(m.apply(Vec2::new(1.0, 1.0)), Vec2::new(12.0, 2.0)));
    }

    #[test]
    fn rotation_quarter_turn_is_clockwise_on_screen() {
        let m = Matrix::rotation(std::f32::consts::FRAC_PI_2);
        assert!(approx(m.apply(Vec2::new(1.0, 0.0)), Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn scale_about_pivot_keeps_pivot_fixed() {
        let pivot = Vec2::new(5.0, 5.0);
        let m = Matrix::identity().then_scale(3.0, 3.0, pivot);
        assert!(approx(m.apply(pivot), pivot));
        assert!(approx(m.apply(Vec2::new(6.0, 5.0)), Vec2::new(8.0, 5.0)));
    }

    #[test]
    fn inverse_round_trips_a_point() {
        let m = Matrix::identity()
            .then_scale(2.0, 0.5, Vec2::zero())
            .then_rotate(0.7, Vec2::new(1.0, 2.0))
            .then_translate(Vec2::new(30.0, -4.0));
        let inv = m.invert().unwrap();
        let p = Vec2::new(3.5, -7.25);
        assert!(approx(inv.apply(m.apply(p)), p));
    }

    #[test]
    fn zero_scale_is_singular() {
        assert!(Matrix::scaling(0.0, 1.0).invert().is_none());
    }
}
