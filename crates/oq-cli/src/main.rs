//! CLI frontend for the OathQuest hero game.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "oathquest",
    about = "OathQuest: a hero that grows with your habits",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding save files
    #[arg(long, global = true, default_value = ".oathquest")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless autopilot session and save the result
    Simulate {
        /// Oath the hero belongs to
        #[arg(long)]
        oath: String,

        /// Willpower accrued by the oath
        #[arg(long, default_value = "0")]
        willpower: f64,

        /// Simulated seconds of play
        #[arg(long, default_value = "120")]
        seconds: u64,

        /// RNG seed for deterministic rosters and loot
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Print every notable event
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the hero sheet and exploration progress
    Status {
        /// Oath the hero belongs to
        #[arg(long)]
        oath: String,

        /// Willpower accrued by the oath
        #[arg(long, default_value = "0")]
        willpower: f64,
    },

    /// Travel to an overworld node
    Travel {
        /// Oath the hero belongs to
        #[arg(long)]
        oath: String,

        /// Destination node id (e.g. whispering_woods)
        node: String,
    },

    /// Spend skill points on a skill
    Unlock {
        /// Oath the hero belongs to
        #[arg(long)]
        oath: String,

        /// Skill id (e.g. power_strike)
        skill: String,
    },

    /// Print or write the raw save record
    Export {
        /// Oath the hero belongs to
        #[arg(long)]
        oath: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the save record with one read from a file
    Import {
        /// Oath the hero belongs to
        #[arg(long)]
        oath: String,

        /// File holding an exported record
        file: PathBuf,
    },

    /// Delete saved progress
    Reset {
        /// Oath whose save is deleted
        #[arg(long, required_unless_present = "all")]
        oath: Option<String>,

        /// Delete every save in the store
        #[arg(long, conflicts_with = "oath")]
        all: bool,
    },

    /// List every save in the store
    Saves,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = cli.store.as_path();

    let result = match cli.command {
        Commands::Simulate {
            oath,
            willpower,
            seconds,
            seed,
            verbose,
        } => commands::simulate::run(store, &oath, willpower, seconds, seed, verbose),
        Commands::Status { oath, willpower } => commands::status::run(store, &oath, willpower),
        Commands::Travel { oath, node } => commands::travel::run(store, &oath, &node),
        Commands::Unlock { oath, skill } => commands::unlock::run(store, &oath, &skill),
        Commands::Export { oath, output } => {
            commands::transfer::export(store, &oath, output.as_deref())
        }
        Commands::Import { oath, file } => commands::transfer::import(store, &oath, &file),
        Commands::Reset { oath, all } => commands::reset::run(store, oath.as_deref(), all),
        Commands::Saves => commands::saves::run(store),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
