//! Handles returned by [`History::block`](crate::History::block).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::predicate::Predicate;

type Release = Box<dyn FnOnce()>;
type Rebind = Rc<dyn Fn(Predicate) -> bool>;

/// Releases a block.
///
/// Clones share one release: whichever clone unblocks first does the work,
/// every later call (from any clone, from inside the predicate itself, or
/// after the history is gone) does nothing. Dropping an `Unblock` keeps the
/// block in place.
#[derive(Clone)]
pub struct Unblock {
    release: Rc<RefCell<Option<Release>>>,
    rebind: Option<Rebind>,
}

impl Unblock {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Rc::new(RefCell::new(Some(Box::new(release)))),
            rebind: None,
        }
    }

    /// Also support swapping the predicate in place.
    pub fn with_rebind(mut self, rebind: impl Fn(Predicate) -> bool + 'static) -> Self {
        self.rebind = Some(Rc::new(rebind));
        self
    }

    /// An `Unblock` that does nothing.
    pub fn inert() -> Self {
        Self {
            release: Rc::new(RefCell::new(None)),
            rebind: None,
        }
    }

    pub fn unblock(&self) {
        // Take first: the release may re-enter this handle.
        let release = self.release.borrow_mut().take();
        if let Some(release) = release {
            release();
        }
    }

    /// Replace the predicate while keeping the block registered.
    ///
    /// Returns `false` once released or when the history cannot rebind.
    pub fn rebind(&self, predicate: Predicate) -> bool {
        if !self.is_active() {
            return false;
        }
        match &self.rebind {
            Some(rebind) => rebind(predicate),
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.release.borrow().is_some()
    }
}

impl fmt::Debug for Unblock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unblock")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn clones_share_one_release() {
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let unblock = Unblock::new(move || c.set(c.get() + 1));
        let other = unblock.clone();

        unblock.unblock();
        other.unblock();
        unblock.unblock();
        assert_eq!(calls.get(), 1);
        assert!(!other.is_active());
    }

    #[test]
    fn rebind_after_release_is_refused() {
        let unblock = Unblock::new(|| {}).with_rebind(|_| true);
        assert!(unblock.rebind(Predicate::message("x")));
        unblock.unblock();
        assert!(!unblock.rebind(Predicate::message("x")));
    }

    #[test]
    fn inert_does_nothing() {
        let unblock = Unblock::inert();
        assert!(!unblock.is_active());
        unblock.unblock();
        assert!(!unblock.rebind(Predicate::message("x")));
    }
}
