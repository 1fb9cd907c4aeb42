use crate::event::{ChangeEvent, PropertyValue, TriggerEvent};
use std::any::Any;
use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A registered callback. Identity is the `Rc` allocation.
pub type Listener = Rc<dyn Fn(&TriggerEvent)>;

/// Opaque context a listener was registered with. Identity is the `Rc` allocation.
pub type Scope = Rc<dyn Any>;

struct Registration {
    listener: Listener,
    scope: Option<Scope>,
}

fn same_scope(a: &Option<Scope>, b: &Option<Scope>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

/// Publish/subscribe registry keyed by event type.
///
/// Registration and removal take `&self` so a listener holding a handle to
/// the trigger may call [`Trigger::off`] while being fired. `fire` snapshots
/// the listener list first, so such changes apply from the next `fire` on.
#[derive(Default)]
pub struct Trigger {
    listeners: RefCell<HashMap<String, Vec<Registration>>>,
}

impl Trigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `event_type`.
    ///
    /// Registering the same listener with the same scope twice is a no-op;
    /// the same listener under a different scope is a separate registration.
    pub fn on(&self, event_type: &str, listener: Listener, scope: Option<Scope>) {
        let mut map = self.listeners.borrow_mut();
        let registrations = map.entry(event_type.to_string()).or_default();
        let added = registrations
            .iter()
            .any(|r| Rc::ptr_eq(&r.listener, &listener) && same_scope(&r.scope, &scope));
        if !added {
            registrations.push(Registration { listener, scope });
        }
    }

    /// Remove the first registration of `listener` for `event_type`.
    ///
    /// Scope is not considered: if the listener was registered under several
    /// scopes, the earliest registration goes.
    pub fn off(&self, event_type: &str, listener: &Listener) {
        let mut map = self.listeners.borrow_mut();
        if let Some(registrations) = map.get_mut(event_type) {
            if let Some(index) = registrations
                .iter()
                .position(|r| Rc::ptr_eq(&r.listener, listener))
            {
                registrations.remove(index);
            }
        }
    }

    /// Invoke every listener registered for the event's type, in order.
    pub fn fire(&self, event: &TriggerEvent) {
        let snapshot: Vec<Listener> = match self.listeners.borrow().get(event.event_type()) {
            Some(registrations) => registrations.iter().map(|r| r.listener.clone()).collect(),
            None => return,
        };
        tracing::trace!(
            event_type = event.event_type(),
            listeners = snapshot.len(),
            "firing trigger event"
        );
        for listener in snapshot {
            listener(event);
        }
    }

    /// Fire a `"change"` event for `property`.
    pub fn fire_property_changed(
        &self,
        property: impl Into<Cow<'static, str>>,
        old_value: impl Into<PropertyValue>,
        new_value: impl Into<PropertyValue>,
    ) {
        self.fire(&ChangeEvent::new(property, old_value, new_value).into());
    }

    /// Number of registrations for `event_type`.
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.listeners
            .borrow()
            .get(event_type)
            .map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let map = self.listeners.borrow();
        let mut counts: Vec<(&str, usize)> =
            map.iter().map(|(k, v)| (k.as_str(), v.len())).collect();
        counts.sort_unstable();
        f.debug_struct("Trigger").field("listeners", &counts).finish()
    }
}
