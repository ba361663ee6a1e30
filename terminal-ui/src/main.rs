use std::{
    io::{self, BufReader},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use terminal_ui::TerminalUi;
use tracing_subscriber::EnvFilter;

/// Play a board game at the terminal, two people taking turns
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON description of the variant to play; standard chess if left out
    #[arg(long)]
    variant: Option<PathBuf>,
    /// Log filter, in the same syntax as `RUST_LOG`
    #[arg(long)]
    log: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let filter = match &args.log {
        Some(filter) => EnvFilter::new(filter),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let result = terminal_ui::load_game(args.variant.as_deref()).and_then(|game| {
        let mut ui = TerminalUi::new(game, BufReader::new(io::stdin()), io::stdout());
        Ok(ui.run()?)
    });
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "game failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
