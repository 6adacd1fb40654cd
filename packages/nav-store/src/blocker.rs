//! Navigation blockers.
//!
//! A blocker is a registered function that is asked about every transition
//! before it commits. Each blocker moves through three states:
//!
//! ```text
//!            deny                     proceed (last veto lifted)
//!   Idle ───────────▶ Blocked ───────────▶ Proceeding ──▶ Idle (commit)
//!    ▲                  │
//!    └──────────────────┘ reset (transition discarded)
//! ```
//!
//! With several blockers active a transition commits only once every one of
//! them has allowed it or proceeded.

use std::fmt;
use std::rc::{Rc, Weak};

use uuid::Uuid;

use crate::error::PredicateError;
use crate::location::{Action, Location};
use crate::router::{Router, RouterInner};

/// Opaque identity of a registered blocker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockerKey(String);

impl BlockerKey {
    /// Create a new random key.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BlockerKey {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for BlockerKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BlockerKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for BlockerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a blocker with respect to the held transition.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockerState {
    /// No transition is waiting on this blocker.
    Idle,
    /// This blocker denied the held transition to `location`.
    Blocked { location: Location },
    /// This blocker lifted its veto; the transition to `location` commits
    /// once no other blocker is still blocked.
    Proceeding { location: Location },
}

impl BlockerState {
    pub fn is_idle(&self) -> bool {
        matches!(self, BlockerState::Idle)
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, BlockerState::Blocked { .. })
    }

    pub fn is_proceeding(&self) -> bool {
        matches!(self, BlockerState::Proceeding { .. })
    }

    /// The target of the held transition, if any.
    pub fn location(&self) -> Option<&Location> {
        match self {
            BlockerState::Idle => None,
            BlockerState::Blocked { location } | BlockerState::Proceeding { location } => {
                Some(location)
            }
        }
    }
}

/// What happens when a blocker denies a transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlockerPolicy {
    /// Hold the transition until the blocker proceeds or resets.
    #[default]
    Hold,
    /// Discard the transition immediately.
    Cancel,
}

/// Arguments passed to a blocker function.
#[derive(Debug, Clone, Copy)]
pub struct BlockerFunctionArgs<'a> {
    pub current_location: &'a Location,
    pub next_location: &'a Location,
    pub history_action: Action,
}

/// A blocker function: `Ok(true)` blocks the transition.
pub type BlockerFn = Rc<dyn Fn(&BlockerFunctionArgs<'_>) -> Result<bool, PredicateError>>;

/// Handle to a registered blocker.
///
/// The handle does not keep the router alive. Every operation on a handle
/// whose router or registration is gone is a no-op.
#[derive(Clone)]
pub struct BlockerHandle {
    router: Weak<RouterInner>,
    key: BlockerKey,
}

impl BlockerHandle {
    pub(crate) fn new(router: Weak<RouterInner>, key: BlockerKey) -> Self {
        Self { router, key }
    }

    pub fn key(&self) -> &BlockerKey {
        &self.key
    }

    /// Current state of this blocker.
    pub fn state(&self) -> BlockerState {
        match self.router() {
            Some(router) => router.state().blocker(&self.key),
            None => BlockerState::Idle,
        }
    }

    /// Whether the blocker is still registered with a live router.
    pub fn is_registered(&self) -> bool {
        self.router()
            .map(|router| router.has_blocker(&self.key))
            .unwrap_or(false)
    }

    /// Lift this blocker's veto on the held transition.
    pub fn proceed(&self) {
        if let Some(router) = self.router() {
            router.proceed_blocker(&self.key);
        }
    }

    /// Discard the held transition this blocker denied.
    pub fn reset(&self) {
        if let Some(router) = self.router() {
            router.reset_blocker(&self.key);
        }
    }

    fn router(&self) -> Option<Router> {
        self.router.upgrade().map(Router::from_inner)
    }
}

impl fmt::Debug for BlockerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockerHandle")
            .field("key", &self.key)
            .field("state", &self.state())
            .finish()
    }
}
