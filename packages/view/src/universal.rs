//! The bridge from a modern route tree into a legacy subtree.

use std::rc::Rc;

use navbridge_legacy_adapter::{AdapterConfig, StoreHistory};
use serde_json::Value;
use tracing::trace;

use crate::component::{Child, Component};
use crate::element::Element;
use crate::error::Result;
use crate::matcher::compute_root_match;
use crate::scope::{LegacyContext, Scope};

/// Provides a legacy context to `app`, projected from the modern one.
///
/// Every render builds a fresh [`StoreHistory`] over the snapshot being
/// rendered, so legacy consumers never hold a handle older than what they
/// display.
#[derive(Clone)]
pub struct UniversalRouter {
    app: Child,
    config: Rc<AdapterConfig>,
    static_context: Option<Value>,
}

impl UniversalRouter {
    pub fn new(app: Child) -> Self {
        Self {
            app,
            config: Rc::new(AdapterConfig::default()),
            static_context: None,
        }
    }

    pub fn with_config(mut self, config: Rc<AdapterConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn with_static_context(mut self, static_context: Value) -> Self {
        self.static_context = Some(static_context);
        self
    }
}

impl Component for UniversalRouter {
    fn render(&self, cx: &Scope) -> Result<Element> {
        let modern = cx.require_modern("UniversalRouter")?;
        let history = StoreHistory::from_snapshot(
            modern.router.clone(),
            modern.state.clone(),
            self.config.clone(),
        );
        let location = modern.state.location.clone();
        trace!(pathname = %location.pathname, version = modern.state.version, "legacy history projected");

        let ctx = LegacyContext {
            history: Rc::new(history),
            route_match: compute_root_match(&location.pathname),
            location,
            static_context: self.static_context.clone(),
        };
        self.app.render(&cx.with_legacy(ctx))
    }
}
