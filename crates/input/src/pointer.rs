/// A point in surface client coordinates (pixels, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClientPoint {
    pub x: f32,
    pub y: f32,
}

impl ClientPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset from `origin` to `self`.
    pub fn delta_from(&self, origin: ClientPoint) -> (f32, f32) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// Which button started a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left mouse button or a touch contact.
    Primary,
    /// Right mouse button.
    Secondary,
    /// Middle mouse button.
    Auxiliary,
    Other(u16),
}

/// Normalized input event as consumed by camera controllers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// A button was pressed (or a touch began) at `point`.
    Down {
        button: PointerButton,
        point: ClientPoint,
    },
    /// The pointer (or the tracked touch) moved to `point`.
    Move { point: ClientPoint },
    /// The button was released or the touch ended.
    Up,
    /// Vertical scroll. Positive values scroll toward the user (zoom out).
    Wheel { delta_y: f32 },
    /// The surface lost focus; any drag in progress ends.
    Blur,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_between_points() {
        let a = ClientPoint::new(10.0, 20.0);
        let b = ClientPoint::new(15.0, 12.0);
        assert_eq!(b.delta_from(a), (5.0, -8.0));
    }

    #[test]
    fn default_point_is_origin() {
        assert_eq!(ClientPoint::default(), ClientPoint::new(0.0, 0.0));
    }
}
