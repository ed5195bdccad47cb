use crate::error::InterpolationError;
use crate::paint::Paint;
use crate::style::Value;

/// Blends `from` toward `to` at eased progress `p`.
///
/// Numbers blend linearly, arrays element by element (recursively) and solid
/// colours channel by channel. Any other pair of same-kind values holds
/// `from` until `p` reaches 1, then switches to `to`. Values of different
/// kinds cannot be blended, and neither can numbers whose blend is not finite.
pub fn interpolate(
    path: &str,
    from: &Value,
    to: &Value,
    p: f32,
) -> Result<Value, InterpolationError> {
    let rejected = || InterpolationError {
        path: path.to_string(),
        from: from.kind(),
        to: to.kind(),
    };
    match (from, to) {
        (Value::Number(a), Value::Number(b)) => {
            let v = a + (b - a) * p;
            if v.is_finite() {
                Ok(Value::Number(v))
            } else {
                Err(rejected())
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            let mut out = Vec::with_capacity(b.len());
            for (i, to_item) in b.iter().enumerate() {
                match a.get(i) {
                    Some(from_item) => out.push(interpolate(path, from_item, to_item, p)?),
                    None => out.push(to_item.clone()),
                }
            }
            Ok(Value::Array(out))
        }
        (Value::Paint(Paint::Solid(a)), Value::Paint(Paint::Solid(b))) => {
            Ok(Value::Paint(Paint::Solid(a.lerp(*b, p))))
        }
        _ if from.kind() == to.kind() => Ok(if p >= 1.0 { to.clone() } else { from.clone() }),
        _ => Err(rejected()),
    }
}
