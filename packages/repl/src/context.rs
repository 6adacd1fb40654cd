//! Shell context: the router, the demo app on top of it, and the draft
//! text of the blocker page.

use std::cell::RefCell;
use std::rc::Rc;

use navbridge_legacy_adapter::{AdapterConfig, Confirm, StoreHistory};
use navbridge_store::{Router, RouterConfig, RouterState, TaskQueue};
use navbridge_view::{DualModeApp, Element};
use tracing::debug;

use crate::demo::{self, Draft};

/// What changed on screen after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    /// The tree differs from the last one shown.
    Rendered(Element),
    /// The last render pass failed.
    Failed(String),
    Unchanged,
}

/// Owns everything a shell session acts on.
pub struct ShellContext {
    app: DualModeApp,
    draft: Draft,
    adapter: Rc<AdapterConfig>,
    shown: Option<Element>,
    failed: Option<String>,
}

impl ShellContext {
    /// Build the demo app over a fresh router.
    pub fn new(config: RouterConfig, confirm: Rc<dyn Confirm>) -> navbridge_store::Result<Self> {
        let router = Router::new(config)?;
        let draft: Draft = Rc::new(RefCell::new(String::new()));
        let routes = demo::routes(draft.clone(), confirm.clone());
        let app = DualModeApp::new(router, TaskQueue::new(), routes);
        Ok(Self {
            app,
            draft,
            adapter: Rc::new(AdapterConfig::default().with_shared_confirm(confirm)),
            shown: None,
            failed: None,
        })
    }

    pub fn app(&self) -> &DualModeApp {
        &self.app
    }

    pub fn router(&self) -> &Router {
        self.app.router()
    }

    pub fn state(&self) -> Rc<RouterState> {
        self.app.router().state()
    }

    /// A legacy history projected over the current snapshot.
    pub fn history(&self) -> StoreHistory {
        StoreHistory::with_config(self.router().clone(), self.adapter.clone())
    }

    pub fn draft(&self) -> String {
        self.draft.borrow().clone()
    }

    /// Replace the draft text. The page reads it on its next render.
    pub fn set_draft(&self, text: impl Into<String>) {
        *self.draft.borrow_mut() = text.into();
    }

    /// Render now, regardless of pending store changes.
    pub fn render(&mut self) -> navbridge_view::Result<Element> {
        match self.app.render() {
            Ok(element) => {
                self.shown = Some(element.clone());
                self.failed = None;
                Ok(element)
            }
            Err(error) => {
                self.failed = self.app.last_error();
                Err(error)
            }
        }
    }

    /// Render after a change the store does not know about. The next
    /// [`settle`](Self::settle) reports the new tree.
    pub fn rerender(&mut self) -> navbridge_view::Result<()> {
        self.app.render().map(|_| ())
    }

    /// Deliver queued store changes (re-rendering as needed) and report
    /// whether the tree differs from what was last shown.
    pub fn settle(&mut self) -> ViewUpdate {
        let ran = self.app.settle();
        debug!(ran, "settled");
        match self.app.last_error() {
            Some(error) if self.failed.as_ref() == Some(&error) => return ViewUpdate::Unchanged,
            Some(error) => {
                self.failed = Some(error.clone());
                return ViewUpdate::Failed(error);
            }
            None => self.failed = None,
        }
        match self.app.last_render() {
            Some(element) if self.shown.as_ref() != Some(&element) => {
                self.shown = Some(element.clone());
                ViewUpdate::Rendered(element)
            }
            _ => ViewUpdate::Unchanged,
        }
    }
}
