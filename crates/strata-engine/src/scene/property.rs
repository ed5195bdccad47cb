//! Dotted property paths over records, used by the animation layer.
//!
//! Supported roots: `position`, `rotation`, `scale`, `style`, `highlight_style`.
//! `position` and `scale` accept an index segment (`position.0`); styles accept
//! any nested key path (`style.label.size`).

use crate::coords::Vec2;
use crate::style::Value;

use super::{Rotation, Scale, Scene, ShapeId, ShapeRecord};

impl Scene {
    /// Current value at `path`, or `None` for unknown ids or paths.
    pub fn property(&self, id: &ShapeId, path: &str) -> Option<Value> {
        read(self.get(id)?, path)
    }

    /// Writes `value` at `path`. Returns `false` when the id or path is
    /// unknown or the value has the wrong shape for the slot.
    pub fn set_property(&mut self, id: &ShapeId, path: &str, value: Value) -> bool {
        let Some(record) = self.get_mut(id) else {
            return false;
        };
        let z = record.z();
        let written = write(record, path, value);
        if written {
            self.mark_dirty(z);
        }
        written
    }
}

fn read(record: &ShapeRecord, path: &str) -> Option<Value> {
    let segments: Vec<&str> = path.split('.').collect();
    match segments.as_slice() {
        ["position"] => Some(record.position().into()),
        ["position", i] => component(record.position(), i).map(Value::Number),
        ["rotation"] => Some(Value::Number(record.rotation().angle)),
        ["scale"] => {
            let s = record.scale();
            Some(Vec2::new(s.sx, s.sy).into())
        }
        ["scale", i] => {
            let s = record.scale();
            component(Vec2::new(s.sx, s.sy), i).map(Value::Number)
        }
        ["style", rest @ ..] if !rest.is_empty() => record.style().get_path(rest).cloned(),
        ["highlight_style", rest @ ..] if !rest.is_empty() => {
            record.highlight_style.get_path(rest).cloned()
        }
        _ => None,
    }
}

fn write(record: &mut ShapeRecord, path: &str, value: Value) -> bool {
    let segments: Vec<&str> = path.split('.').collect();
    match segments.as_slice() {
        ["position"] => match value.as_vec2() {
            Some(p) => {
                record.set_position(p);
                true
            }
            None => false,
        },
        ["position", i] => {
            let Some(n) = value.as_number() else {
                return false;
            };
            let mut p = record.position();
            if !set_component(&mut p, i, n) {
                return false;
            }
            record.set_position(p);
            true
        }
        ["rotation"] => match value.as_number() {
            Some(angle) => {
                let pivot = record.rotation().pivot;
                record.set_rotation(Rotation { angle, pivot });
                true
            }
            None => false,
        },
        ["scale"] => match value.as_vec2() {
            Some(v) => {
                let pivot = record.scale().pivot;
                record.set_scale(Scale { sx: v.x, sy: v.y, pivot });
                true
            }
            None => false,
        },
        ["scale", i] => {
            let Some(n) = value.as_number() else {
                return false;
            };
            let s = record.scale();
            let mut v = Vec2::new(s.sx, s.sy);
            if !set_component(&mut v, i, n) {
                return false;
            }
            record.set_scale(Scale { sx: v.x, sy: v.y, pivot: s.pivot });
            true
        }
        ["style", rest @ ..] if !rest.is_empty() => record.style_mut().set_path(rest, value),
        ["highlight_style", rest @ ..] if !rest.is_empty() => {
            record.highlight_style.set_path(rest, value)
        }
        _ => false,
    }
}

fn component(v: Vec2, index: &str) -> Option<f32> {
    match index {
        "0" => Some(v.x),
        "1" => Some(v.y),
        _ => None,
    }
}

fn set_component(v: &mut Vec2, index: &str, n: f32) -> bool {
    match index {
        "0" => v.x = n,
        "1" => v.y = n,
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::shape::ShapeRegistry;
    use crate::style::{Style, keys};

    fn scene_with(record: ShapeRecord) -> (Scene, ShapeId) {
        let mut s = Scene::new(Rc::new(ShapeRegistry::with_builtins()));
        let id = s.add(record);
        s.clear_dirty();
        (s, id)
    }

    #[test]
    fn position_and_components() {
        let (mut s, id) = scene_with(ShapeRecord::new("circle").with_position(Vec2::new(1.0, 2.0)));
        assert_eq!(s.property(&id, "position.1"), Some(Value::Number(2.0)));
        assert!(s.set_property(&id, "position.0", Value::Number(7.0)));
        assert_eq!(s.get(&id).map(|r| r.position()), Some(Vec2::new(7.0, 2.0)));
        assert!(s.has_dirty());
        assert!(!s.set_property(&id, "position.2", Value::Number(1.0)));
    }

    #[test]
    fn nested_style_paths() {
        let (mut s, id) = scene_with(
            ShapeRecord::new("circle").with_style(Style::new().with(keys::R, 4.0)),
        );
        assert_eq!(s.property(&id, "style.r"), Some(Value::Number(4.0)));
        assert!(s.set_property(&id, "style.r", Value::Number(9.0)));
        assert_eq!(s.get(&id).and_then(|r| r.style().number(keys::R)), Some(9.0));
        assert!(s.set_property(&id, "highlight_style.line_width", Value::Number(3.0)));
    }

    #[test]
    fn unknown_paths_and_kinds_are_rejected() {
        let (mut s, id) = scene_with(ShapeRecord::new("circle"));
        assert!(s.property(&id, "opacity").is_none());
        assert!(!s.set_property(&id, "rotation", Value::from("fast")));
        assert!(!s.set_property(&"ghost".into(), "rotation", Value::Number(1.0)));
    }
}
