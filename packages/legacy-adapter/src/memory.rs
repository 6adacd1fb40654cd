//! A native in-memory legacy history.
//!
//! Unlike [`StoreHistory`](crate::StoreHistory) this owns its entries and
//! its listeners fire. Blocking follows the legacy single-prompt model: at
//! most one predicate is installed, and a denied transition simply does not
//! happen.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use navbridge_store::{resolve_to, Action, Location, To, Unsubscribe};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::confirm::{AlwaysConfirm, Confirm};
use crate::error::Result;
use crate::history::{History, HistoryListener, Unlisten};
use crate::predicate::Predicate;
use crate::unblock::Unblock;

type SharedListener = Rc<dyn Fn(&Location, Action)>;

/// A legacy history over an in-memory stack of entries.
#[derive(Clone)]
pub struct MemoryHistory {
    inner: Rc<MemoryInner>,
}

struct MemoryInner {
    entries: RefCell<Vec<Location>>,
    index: Cell<usize>,
    action: Cell<Action>,
    prompt: RefCell<Option<(u64, Predicate)>>,
    listeners: RefCell<Vec<(u64, SharedListener)>>,
    next_id: Cell<u64>,
    confirm: Rc<dyn Confirm>,
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Push,
    Replace,
    Go(usize),
}

impl MemoryHistory {
    /// A history with a single entry at `/`.
    pub fn new() -> Self {
        Self::build(vec![Location::default()], 0, Rc::new(AlwaysConfirm))
    }

    /// A history over `entries`, positioned at `index` (default: the last
    /// entry). Prompt strings are answered by `confirm`.
    pub fn from_entries<I, S>(
        entries: I,
        index: Option<usize>,
        confirm: Rc<dyn Confirm>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut locations = Vec::new();
        for entry in entries {
            let path = resolve_to(&To::from(entry.as_ref()), "/")?;
            locations.push(Location::new(path, Value::Null));
        }
        if locations.is_empty() {
            locations.push(Location::default());
        }
        let last = locations.len() - 1;
        let index = index.unwrap_or(last).min(last);
        Ok(Self::build(locations, index, confirm))
    }

    fn build(entries: Vec<Location>, index: usize, confirm: Rc<dyn Confirm>) -> Self {
        Self {
            inner: Rc::new(MemoryInner {
                entries: RefCell::new(entries),
                index: Cell::new(index),
                action: Cell::new(Action::Pop),
                prompt: RefCell::new(None),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                confirm,
            }),
        }
    }

    pub fn entries(&self) -> Vec<Location> {
        self.inner.entries.borrow().clone()
    }

    pub fn index(&self) -> usize {
        self.inner.index.get()
    }

    /// Whether a prompt is installed.
    pub fn is_blocked(&self) -> bool {
        self.inner.prompt.borrow().is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn next_id(&self) -> u64 {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        id
    }

    fn resolve(&self, to: &To, state: Option<Value>) -> Result<Location> {
        let current = self.location();
        let path = resolve_to(to, &current.pathname)?;
        Ok(Location::new(path, state.unwrap_or(Value::Null)))
    }

    /// Ask the installed prompt, if any, whether `next` may be reached.
    fn allowed(&self, next: &Location, action: Action) -> Result<bool> {
        let prompt = self
            .inner
            .prompt
            .borrow()
            .as_ref()
            .map(|(id, predicate)| (*id, predicate.clone()));
        let Some((id, predicate)) = prompt else {
            return Ok(true);
        };
        if predicate.allows(next, action, self.inner.confirm.as_ref())? {
            return Ok(true);
        }
        // A prompt released while deciding no longer vetoes.
        let installed = matches!(self.inner.prompt.borrow().as_ref(), Some((current, _)) if *current == id);
        Ok(!installed)
    }

    fn transition(&self, next: Location, action: Action, op: Op) -> Result<()> {
        if !self.allowed(&next, action)? {
            debug!(pathname = %next.pathname, %action, "transition denied by prompt");
            return Ok(());
        }

        {
            let mut entries = self.inner.entries.borrow_mut();
            let index = self.inner.index.get();
            match op {
                Op::Push => {
                    entries.truncate(index + 1);
                    entries.push(next.clone());
                    self.inner.index.set(entries.len() - 1);
                }
                Op::Replace => entries[index] = next.clone(),
                Op::Go(target) => self.inner.index.set(target),
            }
        }
        self.inner.action.set(action);

        let listeners: Vec<SharedListener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        trace!(listeners = listeners.len(), pathname = %next.pathname, "notifying history listeners");
        for listener in listeners {
            listener(&next, action);
        }
        Ok(())
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl History for MemoryHistory {
    fn action(&self) -> Action {
        self.inner.action.get()
    }

    fn location(&self) -> Location {
        self.inner.entries.borrow()[self.inner.index.get()].clone()
    }

    fn length(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    fn create_href(&self, to: To) -> Result<String> {
        Ok(resolve_to(&to, &self.location().pathname)?.to_string())
    }

    fn push(&self, to: To, state: Option<Value>) -> Result<()> {
        let next = self.resolve(&to, state)?;
        self.transition(next, Action::Push, Op::Push)
    }

    fn replace(&self, to: To, state: Option<Value>) -> Result<()> {
        let next = self.resolve(&to, state)?;
        self.transition(next, Action::Replace, Op::Replace)
    }

    /// Moves to the clamped target; staying on the current entry is a no-op.
    fn go(&self, delta: isize) -> Result<()> {
        let (target, next) = {
            let entries = self.inner.entries.borrow();
            let index = self.inner.index.get();
            let last = entries.len() as isize - 1;
            let target = (index as isize + delta).clamp(0, last) as usize;
            if target == index {
                return Ok(());
            }
            (target, entries[target].clone())
        };
        self.transition(next, Action::Pop, Op::Go(target))
    }

    fn block(&self, predicate: Predicate) -> Unblock {
        let id = self.next_id();
        let previous = self.inner.prompt.replace(Some((id, predicate)));
        if previous.is_some() {
            warn!("a history supports only one prompt at a time; the previous one was replaced");
        }

        let release = Rc::downgrade(&self.inner);
        let rebind = Rc::downgrade(&self.inner);
        Unblock::new(move || {
            if let Some(inner) = release.upgrade() {
                let mut prompt = inner.prompt.borrow_mut();
                if matches!(prompt.as_ref(), Some((current, _)) if *current == id) {
                    *prompt = None;
                }
            }
        })
        .with_rebind(move |predicate: Predicate| {
            let Some(inner) = rebind.upgrade() else {
                return false;
            };
            let mut prompt = inner.prompt.borrow_mut();
            match prompt.as_mut() {
                Some((current, installed)) if *current == id => {
                    *installed = predicate;
                    true
                }
                _ => false,
            }
        })
    }

    fn listen(&self, listener: HistoryListener) -> Unlisten {
        let id = self.next_id();
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::from(listener)));

        let weak = Rc::downgrade(&self.inner);
        Unsubscribe::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.borrow_mut().retain(|(i, _)| *i != id);
            }
        })
    }
}

impl fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryHistory")
            .field("location", &self.location().href())
            .field("index", &self.index())
            .field("length", &self.length())
            .field("blocked", &self.is_blocked())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::ScriptedConfirm;

    fn at(entries: &[&str], index: Option<usize>) -> MemoryHistory {
        MemoryHistory::from_entries(entries.iter().copied(), index, Rc::new(AlwaysConfirm)).unwrap()
    }

    #[test]
    fn starts_at_the_last_entry_by_default() {
        let history = at(&["/a", "/b", "/c"], None);
        assert_eq!(history.location().pathname, "/c");
        assert_eq!(history.action(), Action::Pop);
        assert_eq!(at(&["/a", "/b"], Some(9)).index(), 1);
    }

    #[test]
    fn push_truncates_forward_entries() {
        let history = at(&["/a", "/b", "/c"], Some(0));
        history.push("/d".into(), None).unwrap();
        let paths: Vec<String> = history.entries().into_iter().map(|l| l.pathname).collect();
        assert_eq!(paths, vec!["/a", "/d"]);
        assert_eq!(history.index(), 1);
    }

    #[test]
    fn listeners_fire_until_unlistened() {
        let history = MemoryHistory::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let mut unlisten = history.listen(Box::new(move |l: &Location, a: Action| {
            s.borrow_mut().push(format!("{} {}", a, l.pathname))
        }));

        history.push("/a".into(), None).unwrap();
        history.go_back().unwrap();
        unlisten.unsubscribe();
        history.go_forward().unwrap();

        assert_eq!(*seen.borrow(), vec!["PUSH /a", "POP /"]);
        assert_eq!(history.listener_count(), 0);
    }

    #[test]
    fn denied_prompt_leaves_everything_alone() {
        let confirm = Rc::new(ScriptedConfirm::new([false]));
        let history = MemoryHistory::from_entries(["/"], None, confirm.clone()).unwrap();
        let _unblock = history.block("Discard changes?".into());

        history.push("/a".into(), None).unwrap();
        assert_eq!(history.location().pathname, "/");
        assert_eq!(history.length(), 1);
        assert_eq!(confirm.asked(), vec!["Discard changes?"]);
    }

    #[test]
    fn a_second_block_replaces_the_first() {
        let history = MemoryHistory::new();
        let first = history.block(Predicate::positional(|_: &Location, _: Action| false));
        let _second = history.block(Predicate::positional(|_: &Location, _: Action| true));

        // Releasing the replaced prompt must not remove the current one.
        first.unblock();
        assert!(history.is_blocked());
        assert!(!first.rebind(Predicate::message("x")));

        history.push("/a".into(), None).unwrap();
        assert_eq!(history.location().pathname, "/a");
    }
}
