//! Subscription bridge between an [`ExternalStore`] and a render loop.
//!
//! The bridge subscribes once to the store. A store notification only marks
//! the bridge dirty and schedules a flush on a [`TaskQueue`]; the flush reads
//! the live snapshot and hands it to every `on_change` callback. Bursts of
//! store changes between two flushes are delivered as one change carrying
//! the latest snapshot, and a change made while a callback runs (a render
//! pass that navigates) is delivered by the next flush instead of
//! re-entering the callbacks.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::scheduler::TaskQueue;
use crate::traits::{ExternalStore, Unsubscribe};

type ChangeCallback<T> = Rc<dyn Fn(&Rc<T>)>;

/// Keeps render-side consumers in step with an external store.
pub struct SyncExternalStore<S: ExternalStore + 'static> {
    inner: Rc<BridgeInner<S>>,
}

struct BridgeInner<S: ExternalStore + 'static> {
    store: S,
    queue: TaskQueue,
    delivered: RefCell<Rc<S::State>>,
    scheduled: Cell<bool>,
    deliveries: Cell<u64>,
    callbacks: RefCell<Vec<ChangeCallback<S::State>>>,
    unsubscribe: RefCell<Unsubscribe>,
}

impl<S: ExternalStore + 'static> SyncExternalStore<S> {
    /// Subscribe to `store`, deferring deliveries onto `queue`.
    pub fn new(store: S, queue: TaskQueue) -> Self {
        let initial = store.snapshot();
        let inner = Rc::new(BridgeInner {
            store,
            queue,
            delivered: RefCell::new(initial),
            scheduled: Cell::new(false),
            deliveries: Cell::new(0),
            callbacks: RefCell::new(Vec::new()),
            unsubscribe: RefCell::new(Unsubscribe::noop()),
        });

        let weak = Rc::downgrade(&inner);
        let unsubscribe = inner.store.subscribe(Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                BridgeInner::schedule_flush(&inner);
            }
        }));
        *inner.unsubscribe.borrow_mut() = unsubscribe;

        Self { inner }
    }

    /// Register a callback run with each delivered snapshot.
    pub fn on_change(&self, callback: impl Fn(&Rc<S::State>) + 'static) {
        self.inner.callbacks.borrow_mut().push(Rc::new(callback));
    }

    /// The live store snapshot.
    pub fn snapshot(&self) -> Rc<S::State> {
        self.inner.store.snapshot()
    }

    /// The last snapshot handed to the callbacks.
    pub fn delivered(&self) -> Rc<S::State> {
        self.inner.delivered.borrow().clone()
    }

    /// Whether the store changed since the last delivery.
    pub fn is_dirty(&self) -> bool {
        !Rc::ptr_eq(&self.inner.delivered.borrow(), &self.inner.store.snapshot())
    }

    /// Number of deliveries so far.
    pub fn deliveries(&self) -> u64 {
        self.inner.deliveries.get()
    }

    /// Deliver now instead of waiting for the queue. Returns whether a new
    /// snapshot was delivered.
    pub fn flush(&self) -> bool {
        self.inner.flush()
    }

    pub fn store(&self) -> &S {
        &self.inner.store
    }

    pub fn queue(&self) -> &TaskQueue {
        &self.inner.queue
    }
}

impl<S: ExternalStore + 'static> BridgeInner<S> {
    fn schedule_flush(this: &Rc<Self>) {
        if this.scheduled.replace(true) {
            return;
        }
        let weak: Weak<Self> = Rc::downgrade(this);
        this.queue.schedule(move || {
            if let Some(inner) = weak.upgrade() {
                inner.flush();
            }
        });
    }

    fn flush(&self) -> bool {
        self.scheduled.set(false);
        let current = self.store.snapshot();
        if Rc::ptr_eq(&self.delivered.borrow(), &current) {
            return false;
        }
        *self.delivered.borrow_mut() = current.clone();
        self.deliveries.set(self.deliveries.get() + 1);

        let callbacks: Vec<ChangeCallback<S::State>> = self.callbacks.borrow().clone();
        trace!(callbacks = callbacks.len(), "delivering store change");
        for callback in callbacks {
            callback(&current);
        }
        true
    }
}

impl<S: ExternalStore + 'static> Drop for BridgeInner<S> {
    fn drop(&mut self) {
        self.unsubscribe.get_mut().unsubscribe();
    }
}

impl<S: ExternalStore + 'static> fmt::Debug for SyncExternalStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncExternalStore")
            .field("deliveries", &self.deliveries())
            .field("scheduled", &self.inner.scheduled.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NavigateOptions, Router, RouterConfig, RouterState};

    fn setup() -> (Router, TaskQueue, SyncExternalStore<Router>) {
        let router = Router::new(RouterConfig::default()).unwrap();
        let queue = TaskQueue::new();
        let bridge = SyncExternalStore::new(router.clone(), queue.clone());
        (router, queue, bridge)
    }

    #[test]
    fn delivery_is_deferred_to_the_queue() {
        let (router, queue, bridge) = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        bridge.on_change(move |state: &Rc<RouterState>| {
            s.borrow_mut().push(state.location.pathname.clone())
        });

        router.navigate("/a", NavigateOptions::push()).unwrap();
        assert!(seen.borrow().is_empty());
        assert!(bridge.is_dirty());
        // The live snapshot is already current.
        assert_eq!(bridge.snapshot().location.pathname, "/a");

        queue.run_until_idle();
        assert_eq!(*seen.borrow(), vec!["/a"]);
        assert!(!bridge.is_dirty());
    }

    #[test]
    fn bursts_are_coalesced() {
        let (router, queue, bridge) = setup();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        bridge.on_change(move |_: &Rc<RouterState>| c.set(c.get() + 1));

        router.navigate("/a", NavigateOptions::push()).unwrap();
        router.navigate("/b", NavigateOptions::push()).unwrap();
        assert_eq!(queue.pending(), 1);

        queue.run_until_idle();
        assert_eq!(count.get(), 1);
        assert_eq!(bridge.delivered().location.pathname, "/b");
        assert_eq!(bridge.deliveries(), 1);
    }

    #[test]
    fn navigation_inside_a_callback_is_delivered_next_flush() {
        let (router, queue, bridge) = setup();
        let nav = router.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        bridge.on_change(move |state: &Rc<RouterState>| {
            s.borrow_mut().push(state.location.pathname.clone());
            if state.location.pathname == "/old" {
                nav.navigate("/new", NavigateOptions::replace()).unwrap();
            }
        });

        router.navigate("/old", NavigateOptions::push()).unwrap();
        queue.run_until_idle();
        assert_eq!(*seen.borrow(), vec!["/old", "/new"]);
    }

    #[test]
    fn manual_flush_without_change_delivers_nothing() {
        let (_router, _queue, bridge) = setup();
        assert!(!bridge.flush());
        assert_eq!(bridge.deliveries(), 0);
    }

    #[test]
    fn dropping_the_bridge_unsubscribes() {
        let (router, queue, bridge) = setup();
        assert_eq!(router.listener_count(), 1);
        drop(bridge);
        assert_eq!(router.listener_count(), 0);

        router.navigate("/a", NavigateOptions::push()).unwrap();
        assert_eq!(queue.run_until_idle(), 0);
    }
}
