//! Platform-independent shell session.
//!
//! This module contains the main shell logic, which interacts only through
//! the `IoHost` trait. This allows the same core to run in a terminal or
//! under a scripted host in tests.

use std::rc::Rc;

use navbridge_legacy_adapter::Confirm;
use navbridge_store::RouterConfig;

use crate::commands::{self, CommandResult};
use crate::context::{ShellContext, ViewUpdate};
use crate::io::{ExitReason, IoError, IoHost, Output, PromptState, Signal};

/// The platform-independent shell core.
pub struct ReplCore {
    ctx: ShellContext,
}

impl ReplCore {
    /// Create a shell over a router built from `config`. Guarded pages ask
    /// `confirm` before letting a navigation through.
    pub fn new(config: RouterConfig, confirm: Rc<dyn Confirm>) -> navbridge_store::Result<Self> {
        Ok(Self {
            ctx: ShellContext::new(config, confirm)?,
        })
    }

    /// Create a shell whose guarded pages ask through `io`.
    pub fn for_host(config: RouterConfig, io: &impl IoHost) -> navbridge_store::Result<Self> {
        Self::new(config, io.confirmer())
    }

    /// Run the shell loop, reading/writing through the provided I/O host.
    ///
    /// Returns the reason for exiting (user exit or EOF).
    pub fn run(&mut self, io: &mut impl IoHost) -> Result<ExitReason, IoError> {
        self.write_banner(io)?;

        match self.ctx.render() {
            Ok(element) => io.write_output(Output::tree(&element))?,
            Err(e) => io.write_output(Output::render_failed(&e.to_string()))?,
        }

        loop {
            self.update_prompt(io)?;
            io.wait_for_input()?;

            if let Some(signal) = io.read_signal()? {
                match signal {
                    Signal::Eof => {
                        io.write_output(Output::notice("Goodbye!"))?;
                        io.flush()?;
                        return Ok(ExitReason::Eof);
                    }
                    Signal::Interrupt => {
                        io.write_output(Output::notice("^C (use 'exit' to quit)"))?;
                        continue;
                    }
                }
            }

            let Some(line) = io.read_input()? else {
                continue;
            };

            match commands::execute(&line, &mut self.ctx) {
                CommandResult::Ok { display: None, .. } => {}
                CommandResult::Ok {
                    display: Some(output),
                    ..
                } => {
                    io.write_output(Output::reply(output))?;
                }
                CommandResult::Error(msg) => {
                    io.write_output(Output::error(msg))?;
                }
                CommandResult::Help => {
                    io.write_output(Output::reply(commands::format_help()))?;
                }
                CommandResult::Exit => {
                    io.write_output(Output::notice("Goodbye!"))?;
                    io.flush()?;
                    return Ok(ExitReason::UserExit);
                }
            }

            match self.ctx.settle() {
                ViewUpdate::Rendered(element) => io.write_output(Output::tree(&element))?,
                ViewUpdate::Failed(msg) => io.write_output(Output::render_failed(&msg))?,
                ViewUpdate::Unchanged => {}
            }

            io.flush()?;
        }
    }

    /// Get a reference to the shell context.
    pub fn context(&self) -> &ShellContext {
        &self.ctx
    }

    /// Get a mutable reference to the shell context.
    pub fn context_mut(&mut self) -> &mut ShellContext {
        &mut self.ctx
    }

    fn write_banner(&self, io: &mut impl IoHost) -> Result<(), IoError> {
        io.write_output(Output::banner(BANNER))
    }

    fn update_prompt(&self, io: &mut impl IoHost) -> Result<(), IoError> {
        io.write_prompt(PromptState::of(
            &self.ctx.state(),
            self.ctx.router().blocker_count(),
        ))
    }
}

const BANNER: &str = r#"
                 _           _     _
 _ __   __ ___ _| |__  _ __ (_) __| | __ _  ___
| '_ \ / _` \ V / '_ \| '__|| |/ _` |/ _` |/ _ \
| | | | (_| |\ /| |_) | |   | | (_| | (_| |  __/
|_| |_|\__,_| V |_.__/|_|   |_|\__,_|\__, |\___|
                                     |___/

Type 'help' for available commands, 'exit' to quit.
"#;
