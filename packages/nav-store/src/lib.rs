//! navbridge-store: the navigation store.
//!
//! This crate is the single source of truth for navigation state:
//! - [`Router`]: memory history, guarded transitions and listeners
//! - [`Location`] / [`Action`]: what the current position is and how it was
//!   reached
//! - Blockers ([`BlockerHandle`], [`BlockerState`]): predicates that can hold
//!   or cancel a transition until it is explicitly resolved
//! - [`SyncExternalStore`] / [`TaskQueue`]: deferred, coalesced change
//!   delivery for render loops
//!
//! Everything is single-threaded (`Rc`, `RefCell`); a router and everything
//! derived from it live on one thread.
//!
//! # Example
//!
//! ```rust
//! use navbridge_store::{NavigateOptions, Navigation, Router, RouterConfig};
//!
//! let router = Router::new(RouterConfig::default())?;
//! let guard = router.get_blocker("draft", |args: &navbridge_store::BlockerFunctionArgs<'_>| {
//!     Ok(args.next_location.pathname != "/")
//! });
//!
//! assert_eq!(router.navigate("/a", NavigateOptions::push())?, Navigation::Blocked);
//! guard.proceed();
//! assert_eq!(router.location().pathname, "/a");
//! # Ok::<(), navbridge_store::Error>(())
//! ```

mod blocker;
mod config;
mod error;
mod location;
mod path;
mod router;
mod scheduler;
mod sync_store;
mod traits;

pub use blocker::{
    BlockerFn, BlockerFunctionArgs, BlockerHandle, BlockerKey, BlockerPolicy, BlockerState,
};
pub use config::RouterConfig;
pub use error::{Error, PredicateError, Result};
pub use location::{create_key, Action, Location, DEFAULT_KEY};
pub use path::{join_basename, parse_path, resolve_to, PartialPath, Path, PathError, To};
pub use router::{
    Listener, NavigateOptions, Navigation, PendingTransition, Router, RouterState, WeakRouter,
};
pub use scheduler::{TaskQueue, MAX_TASKS_PER_RUN};
pub use sync_store::SyncExternalStore;
pub use traits::{ExternalStore, Unsubscribe};
