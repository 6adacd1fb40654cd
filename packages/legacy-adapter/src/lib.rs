//! navbridge-legacy-adapter: the legacy history API over the navigation
//! store.
//!
//! Legacy components are written against [`History`]. Two implementations
//! are provided:
//! - [`StoreHistory`] projects the API over a [`Router`]: it owns no state,
//!   forwards every call, and turns `block` predicates into store blockers
//! - [`MemoryHistory`] is a native in-memory history with working listeners
//!
//! # Usage
//!
//! ```rust
//! use navbridge_legacy_adapter::{History, Predicate, StoreHistory};
//! use navbridge_store::{Action, Location, Router, RouterConfig};
//!
//! let router = Router::new(RouterConfig::default())?;
//! let history = StoreHistory::new(router.clone());
//!
//! let unblock = history.block(Predicate::positional(|next: &Location, _: Action| {
//!     next.pathname != "/admin"
//! }));
//! history.push("/admin".into(), None)?;
//! assert_eq!(router.location().pathname, "/");
//!
//! unblock.unblock();
//! history.push("/admin".into(), None)?;
//! assert_eq!(router.location().pathname, "/admin");
//! # Ok::<(), navbridge_legacy_adapter::Error>(())
//! ```

mod confirm;
mod error;
mod history;
mod memory;
mod predicate;
mod store_history;
mod unblock;

pub use confirm::{AlwaysConfirm, Confirm, ScriptedConfirm};
pub use error::{Error, Result};
pub use history::{History, HistoryListener, Unlisten};
pub use memory::MemoryHistory;
pub use predicate::{BlockArgs, Convention, Predicate};
pub use store_history::{AdapterConfig, StoreHistory};
pub use unblock::Unblock;

// Re-export the store types the History API speaks in
pub use navbridge_store::{Action, Location, PartialPath, Router, To};
