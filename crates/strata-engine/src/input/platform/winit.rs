use ::winit::dpi::PhysicalPosition;
use ::winit::event::{
    ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, Touch, TouchPhase,
    WindowEvent,
};

use crate::coords::Vec2;
use crate::input::{MouseButton, MouseWheelDelta, PointerEvent, PointerKind};

/// Translates a winit `WindowEvent` into an engine `PointerEvent`.
///
/// winit reports buttons and wheel without a position, so the caller passes
/// the last cursor position it tracked (logical pixels). `now_ms` stamps
/// presses and releases for touch click detection.
///
/// Returns `None` for events the input router does not consume.
pub fn translate_window_event(
    scale_factor: f64,
    cursor: Option<Vec2>,
    event: &WindowEvent,
    now_ms: f64,
) -> Option<PointerEvent> {
    match event {
        WindowEvent::CursorLeft { .. } => Some(PointerEvent::Left),

        WindowEvent::CursorMoved { position, .. } => Some(PointerEvent::Moved {
            pos: to_logical(scale_factor, *position),
            kind: PointerKind::Mouse,
        }),

        WindowEvent::MouseInput { state, button, .. } => {
            let pos = cursor?;
            let button = map_mouse_button(*button);
            let kind = PointerKind::Mouse;
            Some(match state {
                ElementState::Pressed => {
                    PointerEvent::Pressed { pos, button, kind, time_ms: now_ms }
                }
                ElementState::Released => {
                    PointerEvent::Released { pos, button, kind, time_ms: now_ms }
                }
            })
        }

        WindowEvent::MouseWheel { delta, .. } => {
            let pos = cursor?;
            let delta = match delta {
                MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x: *x, y: *y },
                MouseScrollDelta::PixelDelta(p) => {
                    let p = to_logical(scale_factor, *p);
                    MouseWheelDelta::Pixel { x: p.x, y: p.y }
                }
            };
            Some(PointerEvent::Wheel { pos, delta })
        }

        WindowEvent::Touch(touch) => translate_touch(scale_factor, touch, now_ms),

        _ => None,
    }
}

fn translate_touch(scale_factor: f64, touch: &Touch, now_ms: f64) -> Option<PointerEvent> {
    let pos = to_logical(scale_factor, touch.location);
    let kind = PointerKind::Touch;
    let button = MouseButton::Left;
    Some(match touch.phase {
        TouchPhase::Started => PointerEvent::Pressed { pos, button, kind, time_ms: now_ms },
        TouchPhase::Moved => PointerEvent::Moved { pos, kind },
        TouchPhase::Ended => PointerEvent::Released { pos, button, kind, time_ms: now_ms },
        TouchPhase::Cancelled => PointerEvent::Left,
    })
}

fn to_logical(scale_factor: f64, pos: PhysicalPosition<f64>) -> Vec2 {
    let logical = pos.to_logical::<f64>(scale_factor);
    Vec2::new(logical.x as f32, logical.y as f32)
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_positions_become_logical() {
        let p = to_logical(2.0, PhysicalPosition::new(40.0, 10.0));
        assert_eq!(p, Vec2::new(20.0, 5.0));
    }

    #[test]
    fn buttons_map_one_to_one() {
        assert_eq!(map_mouse_button(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(map_mouse_button(WinitMouseButton::Other(7)), MouseButton::Other(7));
    }
}
