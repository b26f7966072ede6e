use clap::{Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "leaguestat-cli", version, about = "Leaguestat CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Event ingestion
    Event {
        #[command(subcommand)]
        action: commands::event::EventAction,
    },
    /// Reference data seeding
    Seed {
        #[command(subcommand)]
        action: commands::seed::SeedAction,
    },
    /// Game inspection
    Game {
        #[command(subcommand)]
        action: commands::game::GameAction,
    },
    /// Per-player statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Event { action } => commands::event::run(action),
        Commands::Seed { action } => commands::seed::run(action),
        Commands::Game { action } => commands::game::run(action),
        Commands::Stats { action } => commands::stats::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
