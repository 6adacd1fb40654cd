//! Interactive entry point: the shell core on a terminal host.

use navbridge_store::RouterConfig;
use tracing::info;

use crate::error::ShellError;
use crate::host::TerminalHost;
use crate::io::ExitReason;
use crate::session::ReplCore;

/// Run the shell on the terminal until the user leaves.
pub fn run(config: RouterConfig) -> Result<ExitReason, ShellError> {
    let mut host = TerminalHost::new()?;
    let mut core = ReplCore::for_host(config, &host)?;
    let reason = core.run(&mut host)?;
    info!(?reason, "shell exited");
    Ok(reason)
}
