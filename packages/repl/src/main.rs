use std::path::PathBuf;

use clap::Parser;
use navbridge_repl::ShellError;
use navbridge_store::RouterConfig;
use tracing_subscriber::EnvFilter;

/// navbridge - shell for a router shared by legacy and modern views
#[derive(Parser, Debug)]
#[command(name = "navbridge")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Router configuration as JSON (basename, initialEntries, initialIndex)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Prefix for every href
    #[arg(long)]
    basename: Option<String>,

    /// Initial history entry; repeat for several, the last one is current
    #[arg(long = "entry")]
    entries: Vec<String>,

    /// Force vi editing mode
    #[arg(long)]
    vi: bool,

    /// Force emacs editing mode
    #[arg(long)]
    emacs: bool,
}

fn router_config(args: &Args) -> Result<RouterConfig, ShellError> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| ShellError::Config(format!("{}: {}", path.display(), e)))?;
            RouterConfig::from_json(&json)
                .map_err(|e| ShellError::Config(format!("{}: {}", path.display(), e)))?
        }
        None => RouterConfig::default(),
    };
    if let Some(basename) = &args.basename {
        config = config.with_basename(basename.clone());
    }
    if !args.entries.is_empty() {
        config = config.with_entries(args.entries.iter().cloned());
        config.initial_index = None;
    }
    Ok(config)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("NAVBRIDGE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Set edit mode override if specified
    if args.vi {
        std::env::set_var("NAVBRIDGE_EDIT_MODE", "vi");
    } else if args.emacs {
        std::env::set_var("NAVBRIDGE_EDIT_MODE", "emacs");
    }

    let result = router_config(&args).and_then(navbridge_repl::run);
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
