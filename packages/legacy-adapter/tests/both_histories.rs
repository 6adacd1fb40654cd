//! Behaviour shared by the native and the store-backed history.

use std::cell::RefCell;
use std::rc::Rc;

use navbridge_legacy_adapter::{
    Action, AlwaysConfirm, History, Location, MemoryHistory, Predicate, StoreHistory, Unblock,
};
use navbridge_store::{Router, RouterConfig};

/// Each case gets a fresh history and a way to read its current state,
/// since a store-backed handle is a snapshot.
type Case = (Rc<dyn History>, Box<dyn Fn() -> (Location, Action, usize)>);

fn cases() -> Vec<(&'static str, Case)> {
    let memory = Rc::new(MemoryHistory::from_entries(["/"], None, Rc::new(AlwaysConfirm)).unwrap());
    let m = memory.clone();
    let memory_case: Case = (
        memory,
        Box::new(move || (m.location(), m.action(), m.length())),
    );

    let router = Router::new(RouterConfig::default()).unwrap();
    let store = Rc::new(StoreHistory::new(router.clone()));
    let store_case: Case = (
        store,
        Box::new(move || {
            let fresh = StoreHistory::new(router.clone());
            (fresh.location(), fresh.action(), fresh.length())
        }),
    );

    vec![("memory", memory_case), ("store", store_case)]
}

#[test]
fn push_replace_and_go() {
    for (name, (history, read)) in cases() {
        history.push("/a".into(), None).unwrap();
        history.push("b".into(), None).unwrap();
        let (location, action, length) = read();
        assert_eq!(location.pathname, "/a/b", "{name}");
        assert_eq!(action, Action::Push, "{name}");
        assert_eq!(length, 3, "{name}");

        history.replace("/c?q=1".into(), None).unwrap();
        let (location, action, length) = read();
        assert_eq!(location.href(), "/c?q=1", "{name}");
        assert_eq!(action, Action::Replace, "{name}");
        assert_eq!(length, 3, "{name}");

        history.go(-5).unwrap();
        let (location, action, _) = read();
        assert_eq!(location.pathname, "/", "{name}");
        assert_eq!(action, Action::Pop, "{name}");
    }
}

#[test]
fn a_denying_block_stops_the_transition_until_released() {
    for (name, (history, read)) in cases() {
        let unblock = history.block(Predicate::object(|args| args.location.pathname != "/x"));

        history.push("/x".into(), None).unwrap();
        assert_eq!(read().0.pathname, "/", "{name}");

        unblock.unblock();
        unblock.unblock();
        history.push("/x".into(), None).unwrap();
        assert_eq!(read().0.pathname, "/x", "{name}");
    }
}

#[test]
fn predicate_failures_surface_as_errors() {
    for (name, (history, read)) in cases() {
        let _unblock = history.block(Predicate::try_positional(|_, _| {
            Err(navbridge_store::PredicateError::new("cannot decide"))
        }));
        assert!(history.push("/x".into(), None).is_err(), "{name}");
        assert_eq!(read().0.pathname, "/", "{name}");
    }
}

#[test]
fn rebind_swaps_the_predicate_in_place() {
    for (name, (history, read)) in cases() {
        let unblock = history.block(Predicate::positional(|_, _| false));
        history.push("/a".into(), None).unwrap();
        assert_eq!(read().0.pathname, "/", "{name}");

        assert!(unblock.rebind(Predicate::positional(|_, _| true)), "{name}");
        history.push("/a".into(), None).unwrap();
        assert_eq!(read().0.pathname, "/a", "{name}");

        unblock.unblock();
        assert!(!unblock.rebind(Predicate::positional(|_, _| false)), "{name}");
    }
}

#[test]
fn a_guard_released_while_deciding_lets_the_transition_through() {
    for (name, (history, read)) in cases() {
        let slot: Rc<RefCell<Option<Unblock>>> = Rc::new(RefCell::new(None));
        let s = slot.clone();
        let unblock = history.block(Predicate::positional(move |_, _| {
            if let Some(unblock) = s.borrow().as_ref() {
                unblock.unblock();
            }
            false
        }));
        *slot.borrow_mut() = Some(unblock.clone());

        history.push("/a".into(), None).unwrap();
        assert_eq!(read().0.pathname, "/a", "{name}");
        assert!(!unblock.is_active(), "{name}");
    }
}
