use std::io;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "logstreak-cli", version, about = "Daily login streak tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a login and print the updated streak
    Check {
        /// Evaluate as of this day (M/D/YYYY) instead of now
        #[arg(long)]
        date: Option<String>,
        /// Print the evaluation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the stored streak without recording a login
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Delete the stored streak
    Clear,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Log to stderr, filtered by RUST_LOG (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Check { date, json } => commands::streak::clock_for(date.as_deref())
            .and_then(|clock| commands::streak::check(clock.as_ref(), json)),
        Commands::Show { json } => commands::streak::show(json),
        Commands::Clear => commands::streak::clear(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
