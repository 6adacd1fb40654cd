//! The legacy history projected over the navigation store.
//!
//! A `StoreHistory` holds no navigation state of its own. Reads come from
//! the router snapshot it was built over, writes go straight to the router,
//! and blocks become router blockers under fresh UUID keys.

use std::fmt;
use std::rc::Rc;

use navbridge_store::{
    Action, BlockerFunctionArgs, BlockerKey, BlockerPolicy, Location, NavigateOptions,
    PredicateError, Router, RouterState, To, Unsubscribe,
};
use serde_json::Value;
use tracing::{debug, trace};

use crate::confirm::{AlwaysConfirm, Confirm};
use crate::error::Result;
use crate::history::{History, HistoryListener, Unlisten};
use crate::predicate::Predicate;
use crate::unblock::Unblock;

/// How store-backed histories evaluate and enforce blocks.
#[derive(Clone)]
pub struct AdapterConfig {
    /// Answers prompt-string predicates.
    pub confirm: Rc<dyn Confirm>,
    /// What a denial does to the transition. Legacy blocks are final, so
    /// the default is [`BlockerPolicy::Cancel`].
    pub denial: BlockerPolicy,
}

impl AdapterConfig {
    pub fn with_confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.confirm = Rc::new(confirm);
        self
    }

    pub fn with_shared_confirm(mut self, confirm: Rc<dyn Confirm>) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn with_denial(mut self, denial: BlockerPolicy) -> Self {
        self.denial = denial;
        self
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            confirm: Rc::new(AlwaysConfirm),
            denial: BlockerPolicy::Cancel,
        }
    }
}

impl fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("denial", &self.denial)
            .finish_non_exhaustive()
    }
}

/// A [`History`] whose every method forwards to a [`Router`].
#[derive(Clone)]
pub struct StoreHistory {
    router: Router,
    snapshot: Rc<RouterState>,
    config: Rc<AdapterConfig>,
}

impl StoreHistory {
    pub fn new(router: Router) -> Self {
        Self::with_config(router, Rc::new(AdapterConfig::default()))
    }

    pub fn with_config(router: Router, config: Rc<AdapterConfig>) -> Self {
        let snapshot = router.state();
        Self::from_snapshot(router, snapshot, config)
    }

    /// Build over a snapshot already delivered to the caller.
    pub fn from_snapshot(
        router: Router,
        snapshot: Rc<RouterState>,
        config: Rc<AdapterConfig>,
    ) -> Self {
        Self {
            router,
            snapshot,
            config,
        }
    }

    /// A handle over the router's current snapshot.
    pub fn refreshed(&self) -> Self {
        Self::with_config(self.router.clone(), self.config.clone())
    }

    /// Whether the router published a newer snapshot than this handle's.
    pub fn is_stale(&self) -> bool {
        self.router.state().version != self.snapshot.version
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn snapshot(&self) -> &Rc<RouterState> {
        &self.snapshot
    }

    pub fn config(&self) -> &Rc<AdapterConfig> {
        &self.config
    }

    fn navigate(&self, to: To, replace: bool, state: Option<Value>) -> Result<()> {
        let options = NavigateOptions { replace, state };
        let outcome = self.router.navigate(to, options)?;
        trace!(?outcome, replace, "legacy navigation");
        Ok(())
    }
}

/// Turn a legacy "may we leave?" predicate into a store "should block?"
/// function.
fn adapt(
    predicate: Predicate,
    confirm: Rc<dyn Confirm>,
) -> impl Fn(&BlockerFunctionArgs<'_>) -> std::result::Result<bool, PredicateError> + 'static {
    move |args: &BlockerFunctionArgs<'_>| {
        predicate
            .allows(args.next_location, args.history_action, confirm.as_ref())
            .map(|allow| !allow)
    }
}

impl History for StoreHistory {
    fn action(&self) -> Action {
        self.snapshot.history_action
    }

    fn location(&self) -> Location {
        self.snapshot.location.clone()
    }

    fn length(&self) -> usize {
        self.router.len()
    }

    fn create_href(&self, to: To) -> Result<String> {
        Ok(self.router.create_href(to)?)
    }

    fn push(&self, to: To, state: Option<Value>) -> Result<()> {
        self.navigate(to, false, state)
    }

    fn replace(&self, to: To, state: Option<Value>) -> Result<()> {
        self.navigate(to, true, state)
    }

    fn go(&self, delta: isize) -> Result<()> {
        self.router.go(delta)?;
        Ok(())
    }

    fn block(&self, predicate: Predicate) -> Unblock {
        let key = BlockerKey::new();
        let policy = self.config.denial;
        let confirm = self.config.confirm.clone();
        debug!(%key, convention = ?predicate.convention(), "legacy block registered");
        self.router
            .get_blocker_with_policy(key.clone(), adapt(predicate, confirm.clone()), policy);

        let release_router = self.router.downgrade();
        let release_key = key.clone();
        let rebind_router = self.router.downgrade();

        Unblock::new(move || {
            let Some(router) = release_router.upgrade() else {
                return;
            };
            let handle = router.blocker(release_key.clone());
            handle.proceed();
            handle.reset();
            router.delete_blocker(&release_key);
            debug!(key = %release_key, "legacy block released");
        })
        .with_rebind(move |predicate: Predicate| {
            let Some(router) = rebind_router.upgrade() else {
                return false;
            };
            if !router.has_blocker(&key) {
                return false;
            }
            router.get_blocker_with_policy(key.clone(), adapt(predicate, confirm.clone()), policy);
            true
        })
    }

    fn listen(&self, _listener: HistoryListener) -> Unlisten {
        debug!("listen is not supported on a store-backed history; subscribe to the router");
        Unsubscribe::noop()
    }
}

impl fmt::Debug for StoreHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreHistory")
            .field("location", &self.snapshot.location)
            .field("version", &self.snapshot.version)
            .field("stale", &self.is_stale())
            .finish()
    }
}
