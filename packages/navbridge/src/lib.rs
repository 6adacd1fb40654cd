//! navbridge: one navigation store behind two routing APIs.
//!
//! A modern router is the single source of truth. A legacy history API is
//! projected over it, so code written against either API can live in the
//! same view tree while it is migrated:
//! - [`store`]: the router, blockers and the subscription bridge
//! - [`legacy`]: the legacy `History` trait, its projection over the router
//!   and a standalone memory history
//! - [`view`]: components that consume either routing context, or both
//!
//! ```rust
//! use navbridge::legacy::{History, Predicate, StoreHistory};
//! use navbridge::store::{Router, RouterConfig};
//!
//! let router = Router::new(RouterConfig::default())?;
//! let history = StoreHistory::new(router.clone());
//!
//! let unblock = history.block(Predicate::positional(|next, _| next.pathname != "/admin"));
//! history.push("/admin".into(), None)?;
//! assert_eq!(router.location().pathname, "/");
//!
//! unblock.unblock();
//! history.push("/admin".into(), None)?;
//! assert_eq!(router.location().pathname, "/admin");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use navbridge_legacy_adapter as legacy;
pub use navbridge_store as store;
pub use navbridge_view as view;
