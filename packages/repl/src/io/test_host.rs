//! A scripted host: queued lines, signals and y/N answers in, captured
//! output and prompts out.

use std::collections::VecDeque;
use std::rc::Rc;

use navbridge_legacy_adapter::{Confirm, ScriptedConfirm};

use super::{IoError, IoHost, Output, OutputKind, PromptState, Signal};

/// Runs the shell without a terminal. Once every queued line and signal is
/// consumed the host reports [`Signal::Eof`], so a script ends the session.
#[derive(Debug, Default)]
pub struct TestHost {
    lines: VecDeque<String>,
    signals: VecDeque<Signal>,
    written: Vec<Output>,
    prompts: Vec<PromptState>,
    flushes: usize,
    confirm: Rc<ScriptedConfirm>,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_input(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    pub fn queue_inputs(&mut self, lines: impl IntoIterator<Item = impl Into<String>>) {
        for line in lines {
            self.queue_input(line);
        }
    }

    pub fn queue_signal(&mut self, signal: Signal) {
        self.signals.push_back(signal);
    }

    /// Answer for the next confirmation. Unanswered questions decline.
    pub fn queue_confirm(&mut self, yes: bool) {
        self.confirm.answer(yes);
    }

    /// Confirmation messages shown so far.
    pub fn confirmations(&self) -> Vec<String> {
        self.confirm.asked()
    }

    pub fn output(&self) -> &[Output] {
        &self.written
    }

    /// Every output text, one per line.
    pub fn output_text(&self) -> String {
        self.written
            .iter()
            .map(|o| o.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn output_of(&self, kind: OutputKind) -> Vec<&str> {
        self.written
            .iter()
            .filter(|o| o.kind == kind)
            .map(|o| o.text.as_str())
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.output_of(OutputKind::Error)
    }

    /// Trees printed so far, oldest first.
    pub fn trees(&self) -> Vec<&str> {
        self.output_of(OutputKind::Tree)
    }

    pub fn last_prompt(&self) -> Option<&PromptState> {
        self.prompts.last()
    }

    pub fn prompts(&self) -> &[PromptState] {
        &self.prompts
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl IoHost for TestHost {
    fn wait_for_input(&mut self) -> Result<(), IoError> {
        Ok(())
    }

    fn read_input(&mut self) -> Result<Option<String>, IoError> {
        Ok(self.lines.pop_front())
    }

    fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
        if self.lines.is_empty() && self.signals.is_empty() {
            return Ok(Some(Signal::Eof));
        }
        Ok(self.signals.pop_front())
    }

    fn write_output(&mut self, output: Output) -> Result<(), IoError> {
        self.written.push(output);
        Ok(())
    }

    fn write_prompt(&mut self, prompt: PromptState) -> Result<(), IoError> {
        self.prompts.push(prompt);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        self.flushes += 1;
        Ok(())
    }

    fn confirmer(&self) -> Rc<dyn Confirm> {
        self.confirm.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_come_back_in_order_then_eof() {
        let mut host = TestHost::new();
        host.queue_inputs(["render", "state"]);

        assert!(host.read_signal().unwrap().is_none());
        assert_eq!(host.read_input().unwrap().as_deref(), Some("render"));
        assert_eq!(host.read_input().unwrap().as_deref(), Some("state"));
        assert!(host.read_input().unwrap().is_none());
        assert_eq!(host.read_signal().unwrap(), Some(Signal::Eof));
    }

    #[test]
    fn queued_signal_comes_before_eof() {
        let mut host = TestHost::new();
        host.queue_signal(Signal::Interrupt);
        assert_eq!(host.read_signal().unwrap(), Some(Signal::Interrupt));
        assert_eq!(host.read_signal().unwrap(), Some(Signal::Eof));
    }

    #[test]
    fn output_is_grouped_by_kind() {
        let mut host = TestHost::new();
        host.write_output(Output::reply("/a")).unwrap();
        host.write_output(Output::render_failed("no route")).unwrap();
        host.write_output(Output::notice("Goodbye!")).unwrap();

        assert_eq!(host.errors(), vec!["Render failed: no route"]);
        assert_eq!(host.output_of(OutputKind::Notice), vec!["Goodbye!"]);
        assert!(host.trees().is_empty());
        assert_eq!(host.output_text(), "/a\nRender failed: no route\nGoodbye!");
    }

    #[test]
    fn prompts_and_flushes_are_recorded() {
        let mut host = TestHost::new();
        host.write_prompt(PromptState::default()).unwrap();
        host.write_prompt(PromptState {
            location: "/a/blocker".to_string(),
            blocker_count: 1,
            held: false,
        })
        .unwrap();
        host.flush().unwrap();

        assert_eq!(host.prompts().len(), 2);
        assert_eq!(host.last_prompt().unwrap().blocker_count, 1);
        assert_eq!(host.flush_count(), 1);
    }

    #[test]
    fn confirmer_answers_from_the_queue() {
        let mut host = TestHost::new();
        host.queue_confirm(true);
        let confirm = host.confirmer();

        assert!(confirm.confirm("leave?"));
        assert!(!confirm.confirm("leave again?"));
        assert_eq!(host.confirmations(), vec!["leave?", "leave again?"]);
    }
}
