use std::collections::BTreeMap;

use crate::coords::Vec2;
use crate::paint::{Color, Paint};

/// Dynamically typed property value stored in a [`Style`](super::Style) or
/// addressed through a record property path.
///
/// Shape plugins read the keys they understand; everything else is carried
/// along untouched so chart code can attach its own metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f32),
    Bool(bool),
    Text(String),
    Paint(Paint),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    #[inline]
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Paints are accepted directly, or as `#hex` strings.
    pub fn as_paint(&self) -> Option<Paint> {
        match self {
            Value::Paint(p) => Some(p.clone()),
            Value::Text(s) => Color::from_hex(s).map(Paint::Solid),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// `[x, y]` arrays of numbers.
    pub fn as_vec2(&self) -> Option<Vec2> {
        match self.as_array()? {
            [x, y, ..] => Some(Vec2::new(x.as_number()?, y.as_number()?)),
            _ => None,
        }
    }

    /// `[[x, y], …]` point lists. Malformed entries make the whole list invalid.
    pub fn as_points(&self) -> Option<Vec<Vec2>> {
        self.as_array()?.iter().map(Value::as_vec2).collect()
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Text(_) => "text",
            Value::Paint(_) => "paint",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    /// Nested lookup through `Map` values.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => match self {
                Value::Map(m) => m.get(*head)?.get_path(rest),
                Value::Array(items) => items.get(head.parse::<usize>().ok()?)?.get_path(rest),
                _ => None,
            },
        }
    }

    /// Nested write. Missing intermediate maps are created; array slots must exist.
    pub fn set_path(&mut self, path: &[&str], value: Value) -> bool {
        let Some((head, rest)) = path.split_first() else {
            *self = value;
            return true;
        };
        match self {
            Value::Map(m) => {
                if rest.is_empty() {
                    m.insert((*head).to_string(), value);
                    return true;
                }
                m.entry((*head).to_string())
                    .or_insert_with(|| Value::Map(BTreeMap::new()))
                    .set_path(rest, value)
            }
            Value::Array(items) => match head.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                Some(slot) => slot.set_path(rest, value),
                None => false,
            },
            _ => false,
        }
    }

    /// Recursive merge: maps merge key by key, anything else is replaced.
    pub fn merge(&mut self, patch: &Value) {
        match (self, patch) {
            (Value::Map(dst), Value::Map(src)) => merge_maps(dst, src),
            (dst, src) => *dst = src.clone(),
        }
    }
}

pub(crate) fn merge_maps(dst: &mut BTreeMap<String, Value>, src: &BTreeMap<String, Value>) {
    for (k, v) in src {
        match dst.get_mut(k) {
            Some(existing) => existing.merge(v),
            None => {
                dst.insert(k.clone(), v.clone());
            }
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Number(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v as f32)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(v as f32)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Color> for Value {
    fn from(v: Color) -> Self {
        Value::Paint(Paint::Solid(v))
    }
}

impl From<Paint> for Value {
    fn from(v: Paint) -> Self {
        Value::Paint(v)
    }
}

impl From<Vec2> for Value {
    fn from(v: Vec2) -> Self {
        Value::Array(vec![Value::Number(v.x), Value::Number(v.y)])
    }
}

impl From<[f32; 2]> for Value {
    fn from(v: [f32; 2]) -> Self {
        Value::from(Vec2::new(v[0], v[1]))
    }
}

impl From<Vec<Vec2>> for Value {
    fn from(points: Vec<Vec2>) -> Self {
        Value::Array(points.into_iter().map(Value::from).collect())
    }
}

impl From<Vec<f32>> for Value {
    fn from(items: Vec<f32>) -> Self {
        Value::Array(items.into_iter().map(Value::Number).collect())
    }
}

impl From<Vec<f64>> for Value {
    fn from(items: Vec<f64>) -> Self {
        Value::Array(items.into_iter().map(Value::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, Value)]) -> Value {
        Value::Map(entries.iter().map(|(k, v)| ((*k).to_string(), v.clone())).collect())
    }

    #[test]
    fn merge_keeps_unspecified_keys_and_recurses() {
        let nested = map(&[("x", Value::Number(1.0)), ("y", Value::Number(2.0))]);
        let mut dst = map(&[("a", Value::Number(1.0)), ("nested", nested)]);
        let patch = map(&[("nested", map(&[("y", Value::Number(5.0))]))]);
        dst.merge(&patch);
        assert_eq!(dst.get_path(&["a"]), Some(&Value::Number(1.0)));
        assert_eq!(dst.get_path(&["nested", "x"]), Some(&Value::Number(1.0)));
        assert_eq!(dst.get_path(&["nested", "y"]), Some(&Value::Number(5.0)));
    }

    #[test]
    fn merge_replaces_arrays_wholesale() {
        let mut dst = Value::from(vec![1.0f32, 2.0, 3.0]);
        dst.merge(&Value::from(vec![9.0f32]));
        assert_eq!(dst, Value::from(vec![9.0f32]));
    }

    #[test]
    fn set_path_creates_intermediate_maps() {
        let mut v = map(&[]);
        assert!(v.set_path(&["label", "size"], Value::Number(12.0)));
        assert_eq!(v.get_path(&["label", "size"]), Some(&Value::Number(12.0)));
    }

    #[test]
    fn array_slots_are_addressable_by_index() {
        let mut v = Value::from(Vec2::new(1.0, 2.0));
        assert!(v.set_path(&["1"], Value::Number(7.0)));
        assert_eq!(v.as_vec2(), Some(Vec2::new(1.0, 7.0)));
        assert!(!v.set_path(&["5"], Value::Number(7.0)));
    }

    #[test]
    fn points_require_every_entry_to_be_a_pair() {
        let good = Value::from(vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)]);
        assert_eq!(good.as_points().map(|p| p.len()), Some(2));
        let bad = Value::Array(vec![Value::from(Vec2::zero()), Value::Number(3.0)]);
        assert!(bad.as_points().is_none());
    }

    #[test]
    fn hex_text_reads_as_paint() {
        assert_eq!(Value::from("#000").as_paint(), Some(Paint::Solid(Color::black())));
        assert!(Value::from("black").as_paint().is_none());
    }
}
