use clap::Parser;
use dotenv::dotenv;
use rusty_agenda::prelude::{Cli, run_app};
use std::process::exit;
use tracing_subscriber::EnvFilter;

fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    if let Err(e) = run_app(&cli) {
        tracing::error!(error = %e, "fatal");
        eprintln!("Error: {e}");
        exit(1);
    }
}

// Logs go to stderr so the menu owns stdout.
fn init_logging(log_level: &str) {
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .try_init();
}
