//! navbridge-view: a view tree mixing legacy and modern routing.
//!
//! Components render inside a [`Scope`] that carries a modern routing
//! context, a legacy one, or both:
//! - modern routing: [`RouteObject`] trees, [`Routes`], [`Outlet`]
//! - legacy routing: [`Switch`], [`LegacyRoute`], and [`CompatRoute`], which
//!   opens a modern context inside a legacy subtree
//! - [`UniversalRouter`] opens a legacy context inside a modern subtree,
//!   projecting a fresh [`StoreHistory`](navbridge_legacy_adapter::StoreHistory)
//!   over the snapshot being rendered
//!
//! [`DualModeApp`] ties a router, its subscription bridge and a route tree
//! together and re-renders whenever the bridge delivers a change.

mod app;
mod component;
mod effects;
mod element;
mod error;
mod legacy;
mod matcher;
mod routes;
mod scope;
mod universal;

pub use app::DualModeApp;
pub use component::{component, constant, render_all, Child, Component};
pub use effects::{Cleanup, CommitSummary, EffectRegistry};
pub use element::Element;
pub use error::{RenderError, Result};
pub use legacy::{CompatRoute, LegacyRoute, Switch, SwitchArm};
pub use matcher::{compute_root_match, match_path, Match, MatchOptions, Params};
pub use routes::{match_routes, OutletSlot, Outlet, RouteMatch, RouteObject, Routes};
pub use scope::{LegacyContext, ModernContext, Navigator, Scope};
pub use universal::UniversalRouter;

pub use navbridge_legacy_adapter::{Confirm, ScriptedConfirm};
