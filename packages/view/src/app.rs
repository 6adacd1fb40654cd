//! The application root.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use navbridge_store::{Router, RouterState, SyncExternalStore, TaskQueue};
use tracing::{debug, warn};

use crate::component::Component;
use crate::effects::EffectRegistry;
use crate::element::Element;
use crate::error::{RenderError, Result};
use crate::routes::{RouteObject, Routes};
use crate::scope::{ModernContext, Scope};

/// Owns a router, its subscription bridge, a route tree and the effects of
/// its render passes, and re-renders on every delivered store change.
#[derive(Clone)]
pub struct DualModeApp {
    inner: Rc<AppInner>,
}

struct AppInner {
    router: Router,
    bridge: SyncExternalStore<Router>,
    routes: Routes,
    effects: EffectRegistry,
    last: RefCell<Option<Element>>,
    last_error: RefCell<Option<String>>,
    renders: Cell<u64>,
    rendering: Cell<bool>,
}

impl DualModeApp {
    pub fn new(router: Router, queue: TaskQueue, routes: impl IntoIterator<Item = RouteObject>) -> Self {
        let bridge = SyncExternalStore::new(router.clone(), queue);
        let inner = Rc::new(AppInner {
            router,
            bridge,
            routes: Routes::new(routes),
            effects: EffectRegistry::new(),
            last: RefCell::new(None),
            last_error: RefCell::new(None),
            renders: Cell::new(0),
            rendering: Cell::new(false),
        });

        let weak = Rc::downgrade(&inner);
        inner.bridge.on_change(move |state: &Rc<RouterState>| {
            if let Some(inner) = weak.upgrade() {
                if let Err(error) = inner.render_state(state.clone()) {
                    warn!(%error, "re-render after store change failed");
                }
            }
        });

        Self { inner }
    }

    /// Render the live snapshot now and commit its effects.
    pub fn render(&self) -> Result<Element> {
        self.inner.render_state(self.inner.bridge.snapshot())
    }

    /// The output of the last successful render.
    pub fn last_render(&self) -> Option<Element> {
        self.inner.last.borrow().clone()
    }

    /// The error of the last render, if it failed.
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error.borrow().clone()
    }

    pub fn render_count(&self) -> u64 {
        self.inner.renders.get()
    }

    pub fn router(&self) -> &Router {
        &self.inner.router
    }

    pub fn bridge(&self) -> &SyncExternalStore<Router> {
        &self.inner.bridge
    }

    pub fn queue(&self) -> &TaskQueue {
        self.inner.bridge.queue()
    }

    pub fn effects(&self) -> &EffectRegistry {
        &self.inner.effects
    }

    /// Run queued deliveries (and the re-renders they cause) to completion.
    pub fn settle(&self) -> usize {
        self.queue().run_until_idle()
    }

    /// Clean up every effect, as if the tree were removed.
    pub fn unmount(&self) {
        let cleaned = self.inner.effects.unmount_all();
        *self.inner.last.borrow_mut() = None;
        debug!(cleaned, "app unmounted");
    }
}

impl AppInner {
    fn render_state(&self, state: Rc<RouterState>) -> Result<Element> {
        if self.rendering.replace(true) {
            return Err(RenderError::component("render pass started inside another"));
        }
        self.effects.begin();
        let version = state.version;
        let cx = Scope::new(self.effects.clone())
            .with_modern(ModernContext::root(self.router.clone(), state));
        let result = self.routes.render(&cx);
        self.rendering.set(false);

        match result {
            Ok(element) => {
                let summary = self.effects.commit();
                self.renders.set(self.renders.get() + 1);
                debug!(version, cleaned = summary.cleaned, ran = summary.ran, "rendered");
                *self.last.borrow_mut() = Some(element.clone());
                *self.last_error.borrow_mut() = None;
                Ok(element)
            }
            Err(error) => {
                self.effects.begin();
                *self.last_error.borrow_mut() = Some(error.to_string());
                Err(error)
            }
        }
    }
}

impl Drop for AppInner {
    fn drop(&mut self) {
        self.effects.unmount_all();
    }
}

impl fmt::Debug for DualModeApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DualModeApp")
            .field("renders", &self.render_count())
            .field("location", &self.inner.router.location().href())
            .field("effects", &self.inner.effects)
            .finish()
    }
}
