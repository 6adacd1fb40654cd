//! The legacy history interface.

use navbridge_store::{Action, Location, To, Unsubscribe};
use serde_json::Value;

use crate::error::Result;
use crate::predicate::Predicate;
use crate::unblock::Unblock;

/// Removes a history listener. Idempotent; dropping it does nothing.
pub type Unlisten = Unsubscribe;

/// A history listener: the new location and how it was reached.
pub type HistoryListener = Box<dyn Fn(&Location, Action)>;

/// The navigation surface legacy components are written against.
///
/// Object safe; consumers hold an `Rc<dyn History>`.
pub trait History {
    /// How the current location was reached.
    fn action(&self) -> Action;

    fn location(&self) -> Location;

    /// Number of entries in the history stack.
    fn length(&self) -> usize;

    /// Format `to` as an href. Does not navigate.
    fn create_href(&self, to: To) -> Result<String>;

    fn push(&self, to: To, state: Option<Value>) -> Result<()>;

    fn replace(&self, to: To, state: Option<Value>) -> Result<()>;

    /// Move `delta` entries through the stack; the target is clamped to it.
    fn go(&self, delta: isize) -> Result<()>;

    fn go_back(&self) -> Result<()> {
        self.go(-1)
    }

    fn go_forward(&self) -> Result<()> {
        self.go(1)
    }

    /// Guard transitions away from the current location.
    fn block(&self, predicate: Predicate) -> Unblock;

    fn listen(&self, listener: HistoryListener) -> Unlisten;
}
