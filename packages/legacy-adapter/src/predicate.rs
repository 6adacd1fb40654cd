//! Legacy block predicates.
//!
//! Legacy code hands `block` one of three shapes: a function of
//! `(location, action)`, a function of an argument object, or a prompt
//! string shown in a confirmation dialog. All of them answer "may we
//! leave?"; `true` allows the transition.

use std::fmt;
use std::rc::Rc;

use navbridge_store::{Action, Location, PredicateError};

use crate::confirm::Confirm;

type PositionalFn = dyn Fn(&Location, Action) -> Result<bool, PredicateError>;
type ObjectFn = dyn Fn(&BlockArgs<'_>) -> Result<bool, PredicateError>;

/// Argument object for the object convention.
#[derive(Debug, Clone, Copy)]
pub struct BlockArgs<'a> {
    /// Where the transition would go.
    pub location: &'a Location,
    pub action: Action,
}

/// The calling convention a predicate was written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    Positional,
    Object,
    Message,
}

/// A legacy block predicate.
#[derive(Clone)]
pub enum Predicate {
    Positional(Rc<PositionalFn>),
    Object(Rc<ObjectFn>),
    /// Ask a [`Confirm`] with this text.
    Message(String),
}

impl Predicate {
    pub fn positional(f: impl Fn(&Location, Action) -> bool + 'static) -> Self {
        Predicate::Positional(Rc::new(move |location: &Location, action: Action| {
            Ok(f(location, action))
        }))
    }

    pub fn try_positional(
        f: impl Fn(&Location, Action) -> Result<bool, PredicateError> + 'static,
    ) -> Self {
        Predicate::Positional(Rc::new(f))
    }

    pub fn object(f: impl Fn(&BlockArgs<'_>) -> bool + 'static) -> Self {
        Predicate::Object(Rc::new(move |args: &BlockArgs<'_>| Ok(f(args))))
    }

    pub fn try_object(
        f: impl Fn(&BlockArgs<'_>) -> Result<bool, PredicateError> + 'static,
    ) -> Self {
        Predicate::Object(Rc::new(f))
    }

    pub fn message(text: impl Into<String>) -> Self {
        Predicate::Message(text.into())
    }

    pub fn convention(&self) -> Convention {
        match self {
            Predicate::Positional(_) => Convention::Positional,
            Predicate::Object(_) => Convention::Object,
            Predicate::Message(_) => Convention::Message,
        }
    }

    /// Whether the transition to `next` may happen.
    pub fn allows(
        &self,
        next: &Location,
        action: Action,
        confirm: &dyn Confirm,
    ) -> Result<bool, PredicateError> {
        match self {
            Predicate::Positional(f) => f(next, action),
            Predicate::Object(f) => f(&BlockArgs {
                location: next,
                action,
            }),
            Predicate::Message(text) => Ok(confirm.confirm(text)),
        }
    }
}

impl From<&str> for Predicate {
    fn from(text: &str) -> Self {
        Predicate::message(text)
    }
}

impl From<String> for Predicate {
    fn from(text: String) -> Self {
        Predicate::message(text)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Positional(_) => f.write_str("Predicate::Positional(..)"),
            Predicate::Object(_) => f.write_str("Predicate::Object(..)"),
            Predicate::Message(text) => f.debug_tuple("Predicate::Message").field(text).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::{AlwaysConfirm, ScriptedConfirm};
    use navbridge_store::Path;
    use serde_json::Value;

    fn loc(pathname: &str) -> Location {
        Location::new(
            Path {
                pathname: pathname.to_string(),
                ..Path::root()
            },
            Value::Null,
        )
    }

    #[test]
    fn conventions_see_the_same_arguments() {
        let positional = Predicate::positional(|l: &Location, a: Action| {
            l.pathname == "/ok" && a == Action::Push
        });
        let object =
            Predicate::object(|args: &BlockArgs<'_>| args.location.pathname == "/ok");

        for predicate in [&positional, &object] {
            assert!(predicate.allows(&loc("/ok"), Action::Push, &AlwaysConfirm).unwrap());
            assert!(!predicate.allows(&loc("/no"), Action::Push, &AlwaysConfirm).unwrap());
        }
        assert_eq!(positional.convention(), Convention::Positional);
        assert_eq!(object.convention(), Convention::Object);
    }

    #[test]
    fn message_asks_the_confirm() {
        let confirm = ScriptedConfirm::new([false]);
        let predicate = Predicate::from("Leave?");
        assert!(!predicate.allows(&loc("/a"), Action::Pop, &confirm).unwrap());
        assert_eq!(confirm.asked(), vec!["Leave?"]);
    }

    #[test]
    fn fallible_predicates_propagate() {
        let predicate = Predicate::try_object(|_: &BlockArgs<'_>| Err(PredicateError::new("bad")));
        let err = predicate
            .allows(&loc("/a"), Action::Push, &AlwaysConfirm)
            .unwrap_err();
        assert_eq!(err.message(), "bad");
    }
}
