//! The boundary between the shell loop and whatever runs it.

use std::rc::Rc;

use navbridge_legacy_adapter::Confirm;

pub mod types;

#[cfg(test)]
pub mod test_host;

pub use types::*;

#[cfg(test)]
pub use test_host::TestHost;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("line editor failed: {0}")]
    Editor(String),
    #[error("terminal write failed: {0}")]
    Write(#[from] std::io::Error),
}

/// Where the shell reads commands and writes trees.
///
/// [`ReplCore`](crate::ReplCore) only talks to this trait, so the same loop
/// runs on a terminal and under a scripted host in tests.
pub trait IoHost {
    /// Block until a line or a signal is available. Scripted hosts return
    /// at once.
    fn wait_for_input(&mut self) -> Result<(), IoError>;

    /// The next command line, if one is ready.
    fn read_input(&mut self) -> Result<Option<String>, IoError>;

    /// A pending Ctrl+C or Ctrl+D. Checked before [`read_input`](Self::read_input).
    fn read_signal(&mut self) -> Result<Option<Signal>, IoError>;

    fn write_output(&mut self, output: Output) -> Result<(), IoError>;

    /// Router summary for the next prompt.
    fn write_prompt(&mut self, prompt: PromptState) -> Result<(), IoError>;

    fn flush(&mut self) -> Result<(), IoError> {
        Ok(())
    }

    /// The yes/no prompt used by guarded pages.
    ///
    /// Guards run while a command executes, so the host hands out a shared
    /// handle instead of being borrowed for each question.
    fn confirmer(&self) -> Rc<dyn Confirm>;
}
