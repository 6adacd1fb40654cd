//! The observable-store contract shared by the router and the subscription
//! bridge.

use std::fmt;
use std::rc::Rc;

/// A store that can be observed from outside.
///
/// Listeners are called after every state change. `snapshot` always returns
/// the current state: a snapshot read after a listener ran reflects the
/// change that triggered it. A new snapshot is a new `Rc`; an unchanged
/// store keeps returning the same one.
pub trait ExternalStore {
    type State: 'static;

    /// Register a change listener.
    fn subscribe(&self, listener: Rc<dyn Fn()>) -> Unsubscribe;

    /// The current state.
    fn snapshot(&self) -> Rc<Self::State>;
}

/// Removes a listener when called.
///
/// Dropping an `Unsubscribe` does not unsubscribe. Calling
/// [`unsubscribe`](Unsubscribe::unsubscribe) more than once is a no-op.
pub struct Unsubscribe {
    f: Option<Box<dyn FnOnce()>>,
}

impl Unsubscribe {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self {
            f: Some(Box::new(f)),
        }
    }

    /// An `Unsubscribe` that does nothing.
    pub fn noop() -> Self {
        Self { f: None }
    }

    pub fn unsubscribe(&mut self) {
        if let Some(f) = self.f.take() {
            f();
        }
    }

    /// Whether calling `unsubscribe` would still do something.
    pub fn is_active(&self) -> bool {
        self.f.is_some()
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("active", &self.is_active())
            .finish()
    }
}
