//! selfup CLI entry point
//!
//! Parses arguments, sets up logging, runs the command and renders any error
//! with details and a suggestion before exiting with status 1.

use clap::Parser;
use selfup_cli::cli;
use selfup_cli::core::user_friendly_error;
use tracing_subscriber::EnvFilter;

/// Log to stderr. `RUST_LOG` wins over the level derived from the flags.
fn init_logging(level: Option<&str>) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match level {
            Some(level) => EnvFilter::new(level),
            None => return,
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let config = cli.build_config();
    init_logging(config.log_level.as_deref());

    if let Err(e) = cli.execute_with_config(config).await {
        let error_ctx = user_friendly_error(e);
        error_ctx.display();
        std::process::exit(1);
    }
}
