use std::cell::{Cell, RefCell};
use std::rc::Rc;

use navbridge_store::{
    Action, BlockerFunctionArgs, BlockerKey, BlockerState, NavigateOptions, Navigation,
    PredicateError, Router, RouterConfig, RouterState, SyncExternalStore, TaskQueue,
};

type Verdict = Result<bool, PredicateError>;

fn router() -> Router {
    Router::new(RouterConfig::default()).unwrap()
}

/// A listener that answers a held transition the way a confirmation dialog
/// would, from inside the notification.
fn confirm_on_block(router: &Router, key: &str, answers: Vec<bool>) -> Rc<Cell<usize>> {
    let asked = Rc::new(Cell::new(0));
    let answers = Rc::new(RefCell::new(answers));
    let handle = router.blocker(key);
    let a = asked.clone();
    let _subscription = router.subscribe(move |state: &Rc<RouterState>| {
        if let BlockerState::Blocked { .. } = state.blocker(handle.key()) {
            a.set(a.get() + 1);
            let yes = answers.borrow_mut().remove(0);
            if yes {
                handle.proceed();
            } else {
                handle.reset();
            }
        }
    });
    asked
}

#[test]
fn confirm_dialog_resolves_the_originally_held_transition() {
    let r = router();
    let draft = Rc::new(RefCell::new(String::from("unsaved")));
    let d = draft.clone();
    r.get_blocker("draft", move |_: &BlockerFunctionArgs<'_>| -> Verdict {
        Ok(!d.borrow().is_empty())
    });
    let asked = confirm_on_block(&r, "draft", vec![false, true]);

    // Declined: stays put, nothing held.
    assert_eq!(r.navigate("/a", NavigateOptions::push()).unwrap(), Navigation::Blocked);
    assert_eq!(r.location().pathname, "/");
    assert!(!r.state().is_held());

    // Accepted: the held transition to /a commits as a PUSH.
    r.navigate("/a", NavigateOptions::push()).unwrap();
    assert_eq!(r.location().pathname, "/a");
    assert_eq!(r.state().history_action, Action::Push);
    assert_eq!(asked.get(), 2);

    // Empty draft: no dialog.
    draft.borrow_mut().clear();
    r.navigate("/b", NavigateOptions::push()).unwrap();
    assert_eq!(r.location().pathname, "/b");
    assert_eq!(asked.get(), 2);
}

#[test]
fn and_semantics_through_the_bridge() {
    let r = router();
    let queue = TaskQueue::new();
    let bridge = SyncExternalStore::new(r.clone(), queue.clone());

    let a = r.get_blocker("a", |_: &BlockerFunctionArgs<'_>| -> Verdict { Ok(true) });
    r.get_blocker("b", |_: &BlockerFunctionArgs<'_>| -> Verdict { Ok(false) });

    r.navigate("/x", NavigateOptions::push()).unwrap();
    queue.run_until_idle();
    let delivered = bridge.delivered();
    assert!(delivered.is_held());
    assert_eq!(
        delivered.pending.as_ref().map(|p| p.blocked.clone()),
        Some(vec![BlockerKey::from("a")])
    );

    a.proceed();
    queue.run_until_idle();
    assert_eq!(bridge.delivered().location.pathname, "/x");
    assert!(bridge.delivered().blockers.is_empty());
}

#[test]
fn versions_increase_by_one_per_snapshot() {
    let r = router();
    let versions = Rc::new(RefCell::new(Vec::new()));
    let v = versions.clone();
    let _subscription = r.subscribe(move |state: &Rc<RouterState>| v.borrow_mut().push(state.version));

    let guard = r.get_blocker("g", |_: &BlockerFunctionArgs<'_>| -> Verdict { Ok(true) });
    r.navigate("/a", NavigateOptions::push()).unwrap();
    guard.proceed();
    r.navigate("/b", NavigateOptions::replace()).unwrap();
    guard.reset();

    assert_eq!(*versions.borrow(), vec![1, 2, 3, 4]);
    assert_eq!(r.location().pathname, "/a");
}
