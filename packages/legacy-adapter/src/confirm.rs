//! Confirmation dialogs for prompt-string blockers.

use std::cell::RefCell;
use std::collections::VecDeque;

use tracing::trace;

/// Asks the user whether to leave the current page.
pub trait Confirm {
    /// Returns `true` to allow the transition.
    fn confirm(&self, message: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Always allows.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Answers from a prepared script, recording every question.
///
/// Once the script runs out, `fallback` is returned.
#[derive(Debug, Default)]
pub struct ScriptedConfirm {
    answers: RefCell<VecDeque<bool>>,
    asked: RefCell<Vec<String>>,
    fallback: bool,
}

impl ScriptedConfirm {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            asked: RefCell::new(Vec::new()),
            fallback: false,
        }
    }

    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Queue another answer.
    pub fn answer(&self, yes: bool) {
        self.answers.borrow_mut().push_back(yes);
    }

    /// Messages asked so far, oldest first.
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, message: &str) -> bool {
        self.asked.borrow_mut().push(message.to_string());
        let answer = self.answers.borrow_mut().pop_front().unwrap_or(self.fallback);
        trace!(message, answer, "scripted confirmation");
        answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_answers_in_order_then_fallback() {
        let confirm = ScriptedConfirm::new([true, false]).with_fallback(true);
        assert!(confirm.confirm("one"));
        assert!(!confirm.confirm("two"));
        assert!(confirm.confirm("three"));
        assert_eq!(confirm.asked(), vec!["one", "two", "three"]);
    }

    #[test]
    fn closures_confirm() {
        let confirm = |message: &str| message.ends_with('?');
        assert!(confirm.confirm("Leave?"));
        assert!(!Confirm::confirm(&confirm, "Leave"));
    }
}
