use glam::Vec3;
use std::borrow::Cow;

/// Event type used for every property-change notification.
pub const CHANGE_EVENT: &str = "change";

/// Value carried by a property-change notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Scalar(f32),
    Vec3(Vec3),
}

impl PropertyValue {
    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Vec3(_) => None,
        }
    }

    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            Self::Vec3(v) => Some(*v),
            Self::Scalar(_) => None,
        }
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec3> for PropertyValue {
    fn from(value: Vec3) -> Self {
        Self::Vec3(value)
    }
}

/// Payload of a `"change"` event: which property moved, and from where to where.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub property: Cow<'static, str>,
    pub old_value: PropertyValue,
    pub new_value: PropertyValue,
}

impl ChangeEvent {
    pub fn new(
        property: impl Into<Cow<'static, str>>,
        old_value: impl Into<PropertyValue>,
        new_value: impl Into<PropertyValue>,
    ) -> Self {
        Self {
            property: property.into(),
            old_value: old_value.into(),
            new_value: new_value.into(),
        }
    }
}

/// An event dispatched through a [`Trigger`](crate::Trigger).
///
/// Listeners are selected by `event_type`. Change notifications carry a
/// [`ChangeEvent`] payload; other events are bare.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerEvent {
    event_type: Cow<'static, str>,
    change: Option<ChangeEvent>,
}

impl TriggerEvent {
    /// Create a bare event of the given type.
    pub fn new(event_type: impl Into<Cow<'static, str>>) -> Self {
        Self {
            event_type: event_type.into(),
            change: None,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The change payload, if this is a `"change"` event.
    pub fn as_change(&self) -> Option<&ChangeEvent> {
        self.change.as_ref()
    }
}

impl From<ChangeEvent> for TriggerEvent {
    fn from(change: ChangeEvent) -> Self {
        Self {
            event_type: Cow::Borrowed(CHANGE_EVENT),
            change: Some(change),
        }
    }
}
