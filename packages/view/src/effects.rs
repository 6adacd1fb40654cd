//! Render-pass effects.
//!
//! Components declare effects while rendering; nothing runs until the pass
//! commits. A commit first cleans up effects whose component did not render
//! this pass or whose dependencies changed, then runs the new setups, all
//! in one synchronous step. No navigation can interleave between retiring
//! an old effect and installing its replacement.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::{trace, warn};

/// Undo an effect.
pub type Cleanup = Box<dyn FnOnce()>;

type Setup = Box<dyn FnOnce() -> Option<Cleanup>>;

/// Tracks effects across render passes.
#[derive(Clone, Default)]
pub struct EffectRegistry {
    inner: Rc<RefCell<Effects>>,
}

#[derive(Default)]
struct Effects {
    mounted: BTreeMap<String, Mounted>,
    pending: Vec<Pending>,
    seen: BTreeSet<String>,
}

struct Mounted {
    deps: Value,
    cleanup: Option<Cleanup>,
}

struct Pending {
    id: String,
    deps: Value,
    setup: Setup,
}

/// What a commit did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub cleaned: usize,
    pub ran: usize,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a render pass, forgetting declarations from an uncommitted one.
    pub fn begin(&self) {
        let mut effects = self.inner.borrow_mut();
        effects.pending.clear();
        effects.seen.clear();
    }

    /// Declare an effect for the current pass.
    ///
    /// `setup` runs at commit when `id` is new or `deps` differ from the
    /// mounted effect's; the cleanup it returns runs before the next setup
    /// for `id` or when `id` is not declared in a later pass.
    pub fn use_effect(
        &self,
        id: impl Into<String>,
        deps: Value,
        setup: impl FnOnce() -> Option<Cleanup> + 'static,
    ) {
        let id = id.into();
        let mut effects = self.inner.borrow_mut();
        if !effects.seen.insert(id.clone()) {
            warn!(%id, "effect declared twice in one pass; the later one wins");
            effects.pending.retain(|p| p.id != id);
        }
        effects.pending.push(Pending {
            id,
            deps,
            setup: Box::new(setup),
        });
    }

    /// Apply the current pass's declarations.
    pub fn commit(&self) -> CommitSummary {
        let (cleanups, setups) = {
            let mut effects = self.inner.borrow_mut();
            let Effects {
                mounted,
                pending,
                seen,
            } = &mut *effects;

            let mut cleanups: Vec<Cleanup> = Vec::new();
            let gone: Vec<String> = mounted
                .keys()
                .filter(|id| !seen.contains(*id))
                .cloned()
                .collect();
            for id in gone {
                if let Some(cleanup) = mounted.remove(&id).and_then(|m| m.cleanup) {
                    cleanups.push(cleanup);
                }
            }

            let mut setups = Vec::new();
            for p in pending.drain(..) {
                match mounted.get(&p.id) {
                    Some(m) if m.deps == p.deps => {}
                    _ => {
                        if let Some(cleanup) = mounted.remove(&p.id).and_then(|m| m.cleanup) {
                            cleanups.push(cleanup);
                        }
                        setups.push(p);
                    }
                }
            }
            seen.clear();
            (cleanups, setups)
        };

        let summary = CommitSummary {
            cleaned: cleanups.len(),
            ran: setups.len(),
        };
        for cleanup in cleanups {
            cleanup();
        }
        for Pending { id, deps, setup } in setups {
            let cleanup = setup();
            self.inner
                .borrow_mut()
                .mounted
                .insert(id, Mounted { deps, cleanup });
        }
        trace!(cleaned = summary.cleaned, ran = summary.ran, "effects committed");
        summary
    }

    /// Clean up every mounted effect.
    pub fn unmount_all(&self) -> usize {
        let cleanups: Vec<Cleanup> = {
            let mut effects = self.inner.borrow_mut();
            effects.pending.clear();
            effects.seen.clear();
            std::mem::take(&mut effects.mounted)
                .into_values()
                .filter_map(|m| m.cleanup)
                .collect()
        };
        let count = cleanups.len();
        for cleanup in cleanups {
            cleanup();
        }
        count
    }

    pub fn is_mounted(&self, id: &str) -> bool {
        self.inner.borrow().mounted.contains_key(id)
    }

    /// Ids of mounted effects, sorted.
    pub fn mounted(&self) -> Vec<String> {
        self.inner.borrow().mounted.keys().cloned().collect()
    }
}

impl fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectRegistry")
            .field("mounted", &self.mounted())
            .finish()
    }
}
