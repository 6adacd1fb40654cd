//! The navigation store.
//!
//! `Router` is the single writer of navigation state. It owns a memory
//! history stack, the blocker registry and the listener list, and publishes
//! an immutable [`RouterState`] snapshot after every change.
//!
//! Blocker functions and listeners are always called with no internal
//! borrow held, so they may call back into the router (navigate, delete
//! their own blocker, proceed, reset, subscribe).

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::blocker::{
    BlockerFunctionArgs, BlockerFn, BlockerHandle, BlockerKey, BlockerPolicy, BlockerState,
};
use crate::config::RouterConfig;
use crate::error::{Error, PredicateError, Result};
use crate::location::{create_key, Action, Location, DEFAULT_KEY};
use crate::path::{join_basename, resolve_to, To};
use crate::traits::{ExternalStore, Unsubscribe};

/// A state-change listener.
pub type Listener = Rc<dyn Fn(&Rc<RouterState>)>;

/// Immutable snapshot of the router.
#[derive(Debug, Clone, PartialEq)]
pub struct RouterState {
    /// How `location` was reached.
    pub history_action: Action,
    /// The current location.
    pub location: Location,
    /// Blockers that are not idle.
    pub blockers: BTreeMap<BlockerKey, BlockerState>,
    /// The held transition, if any.
    pub pending: Option<PendingTransition>,
    /// Increases by one with every published snapshot.
    pub version: u64,
}

impl RouterState {
    /// State of one blocker; unknown keys are idle.
    pub fn blocker(&self, key: &BlockerKey) -> BlockerState {
        self.blockers.get(key).cloned().unwrap_or(BlockerState::Idle)
    }

    /// Whether a transition is being held by at least one blocker.
    pub fn is_held(&self) -> bool {
        self.pending.is_some()
    }
}

/// A transition held by one or more blockers.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTransition {
    pub location: Location,
    pub action: Action,
    /// Blockers still denying the transition.
    pub blocked: Vec<BlockerKey>,
    /// Blockers that denied and have since proceeded.
    pub proceeding: Vec<BlockerKey>,
}

/// Options for [`Router::navigate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigateOptions {
    /// Replace the current entry instead of pushing a new one.
    pub replace: bool,
    /// State attached to the new location.
    pub state: Option<Value>,
}

impl NavigateOptions {
    pub fn push() -> Self {
        Self::default()
    }

    pub fn replace() -> Self {
        Self {
            replace: true,
            state: None,
        }
    }

    pub fn with_state(mut self, state: Value) -> Self {
        self.state = Some(state);
        self
    }
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    /// The transition committed; this is the new location.
    Committed(Location),
    /// At least one blocker denied; the transition is held.
    Blocked,
    /// A blocker with [`BlockerPolicy::Cancel`] denied; nothing changed.
    Cancelled(BlockerKey),
    /// A navigation started from inside a blocker replaced this one.
    Superseded,
    /// The target index is the current one; nothing to do.
    Unchanged,
}

impl Navigation {
    pub fn is_committed(&self) -> bool {
        matches!(self, Navigation::Committed(_))
    }
}

/// Cheaply cloneable handle to the navigation store.
#[derive(Clone)]
pub struct Router {
    inner: Rc<RouterInner>,
}

/// A non-owning router handle.
#[derive(Clone)]
pub struct WeakRouter {
    inner: Weak<RouterInner>,
}

impl WeakRouter {
    pub fn upgrade(&self) -> Option<Router> {
        self.inner.upgrade().map(Router::from_inner)
    }
}

pub(crate) struct RouterInner {
    basename: String,
    stack: RefCell<HistoryStack>,
    action: Cell<Action>,
    registrations: RefCell<Vec<Registration>>,
    held: RefCell<Option<Held>>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener_id: Cell<u64>,
    navigation_seq: Cell<u64>,
    state: RefCell<Rc<RouterState>>,
}

struct HistoryStack {
    entries: Vec<Location>,
    index: usize,
}

impl HistoryStack {
    fn current(&self) -> &Location {
        &self.entries[self.index]
    }
}

struct Registration {
    key: BlockerKey,
    f: BlockerFn,
    policy: BlockerPolicy,
}

#[derive(Debug, Clone, Copy)]
enum HistoryOp {
    Push,
    Replace,
    Go(usize),
}

struct Held {
    transition: PendingTransition,
    op: HistoryOp,
}

impl Router {
    /// Create a router over a memory history built from `config`.
    pub fn new(config: RouterConfig) -> Result<Self> {
        let mut entries = Vec::with_capacity(config.initial_entries.len().max(1));
        for (index, entry) in config.initial_entries.iter().enumerate() {
            let path = resolve_to(&To::from(entry.as_str()), "/")
                .map_err(|source| Error::InvalidEntry { index, source })?;
            let key = if index == 0 {
                DEFAULT_KEY.to_string()
            } else {
                create_key()
            };
            entries.push(Location::with_key(path, Value::Null, key));
        }
        if entries.is_empty() {
            entries.push(Location::default());
        }

        let last = entries.len() - 1;
        let index = config.initial_index.unwrap_or(last).min(last);
        let state = RouterState {
            history_action: Action::Pop,
            location: entries[index].clone(),
            blockers: BTreeMap::new(),
            pending: None,
            version: 0,
        };

        debug!(
            basename = %config.basename,
            entries = entries.len(),
            index,
            "router created"
        );

        Ok(Self {
            inner: Rc::new(RouterInner {
                basename: config.basename,
                stack: RefCell::new(HistoryStack { entries, index }),
                action: Cell::new(Action::Pop),
                registrations: RefCell::new(Vec::new()),
                held: RefCell::new(None),
                listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(0),
                navigation_seq: Cell::new(0),
                state: RefCell::new(Rc::new(state)),
            }),
        })
    }

    pub(crate) fn from_inner(inner: Rc<RouterInner>) -> Self {
        Self { inner }
    }

    pub fn downgrade(&self) -> WeakRouter {
        WeakRouter {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether two handles refer to the same router.
    pub fn same_router(&self, other: &Router) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn basename(&self) -> &str {
        &self.inner.basename
    }

    /// The current snapshot.
    pub fn state(&self) -> Rc<RouterState> {
        self.inner.state.borrow().clone()
    }

    pub fn location(&self) -> Location {
        self.inner.state.borrow().location.clone()
    }

    /// All memory history entries.
    pub fn entries(&self) -> Vec<Location> {
        self.inner.stack.borrow().entries.clone()
    }

    /// Index of the current entry.
    pub fn index(&self) -> usize {
        self.inner.stack.borrow().index
    }

    /// Number of memory history entries.
    pub fn len(&self) -> usize {
        self.inner.stack.borrow().entries.len()
    }

    /// Always false: a router has at least one entry.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Register a listener called with every new snapshot.
    pub fn subscribe(&self, listener: impl Fn(&Rc<RouterState>) + 'static) -> Unsubscribe {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        trace!(id, "listener subscribed");

        let weak = Rc::downgrade(&self.inner);
        Unsubscribe::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.borrow_mut().retain(|(i, _)| *i != id);
                trace!(id, "listener unsubscribed");
            }
        })
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Format a target as an href, including the basename.
    pub fn create_href(&self, to: impl Into<To>) -> Result<String> {
        let to = to.into();
        let path = resolve_to(&to, &self.location().pathname)?;
        Ok(join_basename(&self.inner.basename, &path))
    }

    /// Navigate to `to`, pushing a new entry or replacing the current one.
    pub fn navigate(&self, to: impl Into<To>, options: NavigateOptions) -> Result<Navigation> {
        let to = to.into();
        let path = resolve_to(&to, &self.location().pathname)?;
        let next = Location::new(path, options.state.unwrap_or(Value::Null));
        let (action, op) = if options.replace {
            (Action::Replace, HistoryOp::Replace)
        } else {
            (Action::Push, HistoryOp::Push)
        };
        self.transition(next, action, op)
    }

    /// Move through the history stack by `delta` entries (a POP).
    ///
    /// The target index is clamped to the stack.
    pub fn go(&self, delta: isize) -> Result<Navigation> {
        let (target, next) = {
            let stack = self.inner.stack.borrow();
            let last = stack.entries.len() as isize - 1;
            let target = (stack.index as isize + delta).clamp(0, last) as usize;
            if target == stack.index {
                return Ok(Navigation::Unchanged);
            }
            (target, stack.entries[target].clone())
        };
        self.transition(next, Action::Pop, HistoryOp::Go(target))
    }

    pub fn back(&self) -> Result<Navigation> {
        self.go(-1)
    }

    pub fn forward(&self) -> Result<Navigation> {
        self.go(1)
    }

    /// Register a holding blocker under `key`, or replace its function.
    ///
    /// Replacing keeps the blocker's current state, so a transition it holds
    /// stays held. `blocker_fn` returns `Ok(true)` to block.
    pub fn get_blocker<F>(&self, key: impl Into<BlockerKey>, blocker_fn: F) -> BlockerHandle
    where
        F: Fn(&BlockerFunctionArgs<'_>) -> std::result::Result<bool, PredicateError> + 'static,
    {
        self.get_blocker_with_policy(key, blocker_fn, BlockerPolicy::Hold)
    }

    /// Register a blocker with an explicit denial policy.
    pub fn get_blocker_with_policy<F>(
        &self,
        key: impl Into<BlockerKey>,
        blocker_fn: F,
        policy: BlockerPolicy,
    ) -> BlockerHandle
    where
        F: Fn(&BlockerFunctionArgs<'_>) -> std::result::Result<bool, PredicateError> + 'static,
    {
        let key = key.into();
        let f: BlockerFn = Rc::new(blocker_fn);
        {
            let mut registrations = self.inner.registrations.borrow_mut();
            match registrations.iter_mut().find(|r| r.key == key) {
                Some(existing) => {
                    existing.f = f;
                    existing.policy = policy;
                    debug!(%key, ?policy, "blocker function replaced");
                }
                None => {
                    registrations.push(Registration {
                        key: key.clone(),
                        f,
                        policy,
                    });
                    debug!(%key, ?policy, "blocker registered");
                }
            }
        }
        self.blocker(key)
    }

    /// A handle for `key`, whether or not it is registered.
    pub fn blocker(&self, key: impl Into<BlockerKey>) -> BlockerHandle {
        BlockerHandle::new(Rc::downgrade(&self.inner), key.into())
    }

    pub fn has_blocker(&self, key: &BlockerKey) -> bool {
        self.inner
            .registrations
            .borrow()
            .iter()
            .any(|r| &r.key == key)
    }

    pub fn blocker_count(&self) -> usize {
        self.inner.registrations.borrow().len()
    }

    /// Remove a blocker.
    ///
    /// If it was blocking the held transition its veto is withdrawn; the
    /// transition commits when no veto remains. Unknown keys are ignored.
    pub fn delete_blocker(&self, key: &BlockerKey) {
        let removed = {
            let mut registrations = self.inner.registrations.borrow_mut();
            let before = registrations.len();
            registrations.retain(|r| &r.key != key);
            before != registrations.len()
        };
        if !removed {
            return;
        }
        debug!(%key, "blocker deleted");

        let (changed, ready) = {
            let mut held = self.inner.held.borrow_mut();
            let (changed, ready) = match held.as_mut() {
                None => (false, false),
                Some(h) => {
                    let t = &mut h.transition;
                    let before = t.blocked.len() + t.proceeding.len();
                    t.blocked.retain(|k| k != key);
                    t.proceeding.retain(|k| k != key);
                    (
                        before != t.blocked.len() + t.proceeding.len(),
                        t.blocked.is_empty(),
                    )
                }
            };
            (changed, if ready { held.take() } else { None })
        };

        match ready {
            Some(h) => self.commit(h.transition.location, h.transition.action, h.op),
            None if changed => self.publish(),
            None => {}
        }
    }

    pub(crate) fn proceed_blocker(&self, key: &BlockerKey) {
        let ready = {
            let mut held = self.inner.held.borrow_mut();
            let all_clear = match held.as_mut() {
                Some(h) => match h.transition.blocked.iter().position(|k| k == key) {
                    Some(pos) => {
                        let k = h.transition.blocked.remove(pos);
                        h.transition.proceeding.push(k);
                        h.transition.blocked.is_empty()
                    }
                    None => return,
                },
                None => return,
            };
            if all_clear {
                held.take()
            } else {
                None
            }
        };

        debug!(%key, "blocker proceeding");
        match ready {
            Some(h) => self.commit(h.transition.location, h.transition.action, h.op),
            None => self.publish(),
        }
    }

    pub(crate) fn reset_blocker(&self, key: &BlockerKey) {
        let discarded = {
            let mut held = self.inner.held.borrow_mut();
            let blocked_here = held
                .as_ref()
                .map(|h| h.transition.blocked.contains(key))
                .unwrap_or(false);
            if blocked_here {
                held.take()
            } else {
                None
            }
        };

        if let Some(h) = discarded {
            debug!(
                %key,
                pathname = %h.transition.location.pathname,
                "held transition reset"
            );
            self.publish();
        }
    }

    fn transition(&self, next: Location, action: Action, op: HistoryOp) -> Result<Navigation> {
        if self.inner.held.borrow_mut().take().is_some() {
            debug!("held transition discarded by a new navigation");
            self.publish();
        }

        let seq = self.inner.navigation_seq.get() + 1;
        self.inner.navigation_seq.set(seq);

        let current = self.location();
        let participants: Vec<(BlockerKey, BlockerFn, BlockerPolicy)> = self
            .inner
            .registrations
            .borrow()
            .iter()
            .map(|r| (r.key.clone(), r.f.clone(), r.policy))
            .collect();

        let mut denied = Vec::new();
        for (key, f, policy) in participants {
            // An earlier blocker function may have removed this one.
            if !self.has_blocker(&key) {
                continue;
            }
            let args = BlockerFunctionArgs {
                current_location: &current,
                next_location: &next,
                history_action: action,
            };
            let verdict = f(&args);

            if self.inner.navigation_seq.get() != seq {
                debug!(pathname = %next.pathname, "transition superseded");
                return Ok(Navigation::Superseded);
            }

            match verdict {
                Ok(false) => {}
                // A blocker that removed itself withdraws its veto.
                Ok(true) if !self.has_blocker(&key) => {}
                Ok(true) if policy == BlockerPolicy::Cancel => {
                    debug!(%key, pathname = %next.pathname, "transition cancelled");
                    return Ok(Navigation::Cancelled(key));
                }
                Ok(true) => denied.push(key),
                Err(source) => {
                    warn!(%key, error = %source, "blocker failed, transition aborted");
                    return Err(Error::Blocker { key, source });
                }
            }
        }

        denied.retain(|k| self.has_blocker(k));
        if denied.is_empty() {
            self.commit(next.clone(), action, op);
            return Ok(Navigation::Committed(next));
        }

        debug!(
            pathname = %next.pathname,
            %action,
            blockers = denied.len(),
            "transition held"
        );
        *self.inner.held.borrow_mut() = Some(Held {
            transition: PendingTransition {
                location: next,
                action,
                blocked: denied,
                proceeding: Vec::new(),
            },
            op,
        });
        self.publish();
        Ok(Navigation::Blocked)
    }

    fn commit(&self, next: Location, action: Action, op: HistoryOp) {
        {
            let mut stack = self.inner.stack.borrow_mut();
            match op {
                HistoryOp::Push => {
                    let keep = stack.index + 1;
                    stack.entries.truncate(keep);
                    stack.entries.push(next.clone());
                    stack.index = stack.entries.len() - 1;
                }
                HistoryOp::Replace => {
                    let index = stack.index;
                    stack.entries[index] = next.clone();
                }
                HistoryOp::Go(target) => stack.index = target,
            }
        }
        self.inner.action.set(action);
        *self.inner.held.borrow_mut() = None;

        debug!(pathname = %next.pathname, %action, key = %next.key, "transition committed");
        self.publish();
    }

    fn publish(&self) {
        let snapshot = {
            let stack = self.inner.stack.borrow();
            let held = self.inner.held.borrow();
            let version = self.inner.state.borrow().version + 1;

            let mut blockers = BTreeMap::new();
            if let Some(h) = held.as_ref() {
                let location = &h.transition.location;
                for key in &h.transition.blocked {
                    blockers.insert(
                        key.clone(),
                        BlockerState::Blocked {
                            location: location.clone(),
                        },
                    );
                }
                for key in &h.transition.proceeding {
                    blockers.insert(
                        key.clone(),
                        BlockerState::Proceeding {
                            location: location.clone(),
                        },
                    );
                }
            }

            Rc::new(RouterState {
                history_action: self.inner.action.get(),
                location: stack.current().clone(),
                blockers,
                pending: held.as_ref().map(|h| h.transition.clone()),
                version,
            })
        };
        *self.inner.state.borrow_mut() = snapshot.clone();

        let listeners: Vec<(u64, Listener)> = self.inner.listeners.borrow().clone();
        trace!(
            version = snapshot.version,
            listeners = listeners.len(),
            "notifying listeners"
        );
        for (id, listener) in listeners {
            let still_subscribed = self.inner.listeners.borrow().iter().any(|(i, _)| *i == id);
            if still_subscribed {
                listener(&snapshot);
            }
        }
    }
}

impl ExternalStore for Router {
    type State = RouterState;

    fn subscribe(&self, listener: Rc<dyn Fn()>) -> Unsubscribe {
        Router::subscribe(self, move |_| listener())
    }

    fn snapshot(&self) -> Rc<RouterState> {
        self.state()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Router")
            .field("basename", &self.inner.basename)
            .field("location", &state.location.href())
            .field("action", &state.history_action)
            .field("version", &state.version)
            .field("blockers", &self.blocker_count())
            .finish()
    }
}
