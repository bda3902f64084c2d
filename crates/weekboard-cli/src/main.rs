use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "weekboard", version, about = "Terminal weekly schedule dashboard")]
struct Cli {
    /// Config file (defaults to ~/.config/weekboard/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Render one frame to stdout and exit
    #[arg(long)]
    once: bool,
    /// Seed for flavor phrase selection
    #[arg(long)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// When to leave for a given time
    Depart {
        /// Target time, e.g. "13:00" or "1:00 PM"
        time: String,
    },
    /// Configuration inspection
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let config = cli.config.as_deref();
    let result = match cli.command {
        None => commands::dashboard::run(commands::dashboard::DashboardOptions {
            config,
            once: cli.once,
            seed: cli.seed,
        }),
        Some(Commands::Depart { time }) => commands::depart::run(config, &time),
        Some(Commands::Config { action }) => commands::config::run(config, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
