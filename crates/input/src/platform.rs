use crate::pointer::{ClientPoint, PointerButton, PointerEvent};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};

/// Pixels reported per wheel line, matching what browsers report per notch.
const PIXELS_PER_LINE: f32 = 100.0;

/// Converts winit window events into [`PointerEvent`]s.
///
/// winit reports button presses without a position, so the tracker remembers
/// the last cursor location. Only one touch contact is followed at a time;
/// further fingers are ignored until it lifts.
#[derive(Debug, Default)]
pub struct PointerTracker {
    cursor: ClientPoint,
    touch: Option<u64>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position.
    pub fn cursor(&self) -> ClientPoint {
        self.cursor
    }

    /// Translate one window event. Returns `None` for unrelated events.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.cursor_moved(position.x as f32, position.y as f32))
            }
            WindowEvent::MouseInput { state, button, .. } => {
                Some(self.mouse_input(*state, *button))
            }
            WindowEvent::MouseWheel { delta, .. } => Some(self.wheel(*delta)),
            WindowEvent::Touch(touch) => self.touch(
                touch.phase,
                touch.id,
                ClientPoint::new(touch.location.x as f32, touch.location.y as f32),
            ),
            WindowEvent::Focused(false) => Some(self.blur()),
            _ => None,
        }
    }

    pub fn cursor_moved(&mut self, x: f32, y: f32) -> PointerEvent {
        self.cursor = ClientPoint::new(x, y);
        PointerEvent::Move { point: self.cursor }
    }

    pub fn mouse_input(&mut self, state: ElementState, button: MouseButton) -> PointerEvent {
        match state {
            ElementState::Pressed => PointerEvent::Down {
                button: map_button(button),
                point: self.cursor,
            },
            ElementState::Released => PointerEvent::Up,
        }
    }

    pub fn wheel(&mut self, delta: MouseScrollDelta) -> PointerEvent {
        // winit reports positive y for scrolling away from the user.
        let delta_y = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y * PIXELS_PER_LINE,
            MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
        };
        PointerEvent::Wheel { delta_y }
    }

    pub fn touch(&mut self, phase: TouchPhase, id: u64, point: ClientPoint) -> Option<PointerEvent> {
        match phase {
            TouchPhase::Started if self.touch.is_none() => {
                self.touch = Some(id);
                self.cursor = point;
                Some(PointerEvent::Down {
                    button: PointerButton::Primary,
                    point,
                })
            }
            TouchPhase::Moved if self.touch == Some(id) => {
                self.cursor = point;
                Some(PointerEvent::Move { point })
            }
            TouchPhase::Ended | TouchPhase::Cancelled if self.touch == Some(id) => {
                self.touch = None;
                Some(PointerEvent::Up)
            }
            _ => {
                tracing::trace!(id, ?phase, "ignoring secondary touch contact");
                None
            }
        }
    }

    pub fn blur(&mut self) -> PointerEvent {
        self.touch = None;
        PointerEvent::Blur
    }
}

fn map_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Auxiliary,
        MouseButton::Back => PointerButton::Other(3),
        MouseButton::Forward => PointerButton::Other(4),
        MouseButton::Other(n) => PointerButton::Other(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn press_uses_last_cursor_position() {
        let mut tracker = PointerTracker::new();
        tracker.cursor_moved(40.0, 25.0);
        let down = tracker.mouse_input(ElementState::Pressed, MouseButton::Right);
        assert_eq!(
            down,
            PointerEvent::Down {
                button: PointerButton::Secondary,
                point: ClientPoint::new(40.0, 25.0),
            }
        );
        assert_eq!(
            tracker.mouse_input(ElementState::Released, MouseButton::Right),
            PointerEvent::Up
        );
    }

    #[test]
    fn wheel_sign_matches_browser_convention() {
        let mut tracker = PointerTracker::new();
        // Scrolling toward the user zooms out.
        let PointerEvent::Wheel { delta_y } = tracker.wheel(MouseScrollDelta::LineDelta(0.0, -1.0))
        else {
            panic!("expected wheel event");
        };
        assert!(delta_y > 0.0);

        let PointerEvent::Wheel { delta_y } =
            tracker.wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 12.0)))
        else {
            panic!("expected wheel event");
        };
        assert_eq!(delta_y, -12.0);
    }

    #[test]
    fn follows_only_first_touch() {
        let mut tracker = PointerTracker::new();
        let p = ClientPoint::new(5.0, 6.0);
        assert!(matches!(
            tracker.touch(TouchPhase::Started, 1, p),
            Some(PointerEvent::Down {
                button: PointerButton::Primary,
                ..
            })
        ));
        assert_eq!(tracker.touch(TouchPhase::Started, 2, p), None);
        assert_eq!(tracker.touch(TouchPhase::Moved, 2, p), None);
        assert_eq!(
            tracker.touch(TouchPhase::Moved, 1, ClientPoint::new(7.0, 6.0)),
            Some(PointerEvent::Move {
                point: ClientPoint::new(7.0, 6.0)
            })
        );
        assert_eq!(tracker.touch(TouchPhase::Ended, 1, p), Some(PointerEvent::Up));
        assert_eq!(tracker.cursor(), ClientPoint::new(7.0, 6.0));
    }

    #[test]
    fn blur_releases_touch() {
        let mut tracker = PointerTracker::new();
        tracker.touch(TouchPhase::Started, 9, ClientPoint::default());
        assert_eq!(tracker.blur(), PointerEvent::Blur);
        assert!(tracker.touch(TouchPhase::Started, 10, ClientPoint::default()).is_some());
    }
}
