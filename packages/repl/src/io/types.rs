//! What the shell core and its host exchange.

use navbridge_store::RouterState;
use navbridge_view::Element;

/// Ctrl+C / Ctrl+D, as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Interrupt,
    Eof,
}

/// Kind of an output line. Hosts pick a style per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// A rendered view tree.
    Tree,
    /// The reply to a command.
    Reply,
    Error,
    /// Session chatter (goodbye, ^C hints).
    Notice,
    Banner,
}

/// One block of text written by the shell.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub kind: OutputKind,
    pub text: String,
}

impl Output {
    fn of(kind: OutputKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn tree(element: &Element) -> Self {
        Self::of(OutputKind::Tree, element.to_string())
    }

    pub fn reply(text: impl Into<String>) -> Self {
        Self::of(OutputKind::Reply, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::of(OutputKind::Error, text)
    }

    pub fn render_failed(message: &str) -> Self {
        Self::error(format!("Render failed: {message}"))
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Self::of(OutputKind::Notice, text)
    }

    pub fn banner(text: impl Into<String>) -> Self {
        Self::of(OutputKind::Banner, text)
    }
}

/// How guarded the current location is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Unguarded,
    Blockers(usize),
    /// A transition is waiting on proceed/reset.
    Held,
}

/// Router summary shown in the prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptState {
    pub location: String,
    pub blocker_count: usize,
    pub held: bool,
}

impl PromptState {
    pub fn of(state: &RouterState, blocker_count: usize) -> Self {
        Self {
            location: state.location.href(),
            blocker_count,
            held: state.is_held(),
        }
    }

    pub fn guard(&self) -> Guard {
        match (self.held, self.blocker_count) {
            (true, _) => Guard::Held,
            (false, 0) => Guard::Unguarded,
            (false, n) => Guard::Blockers(n),
        }
    }
}

/// Why the shell loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// `exit`, `quit` or `q`.
    UserExit,
    /// Ctrl+D, or the end of a script.
    Eof,
}
