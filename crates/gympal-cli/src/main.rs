use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use gympal_core::export::EXPORT_FILE_NAME;

mod commands;

#[derive(Parser)]
#[command(name = "gympal-cli", version, about = "GymPal CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the local user and the default exercise library
    Init,
    /// Log one set as a new workout
    Log(commands::workout::LogArgs),
    /// List recent workouts
    Workouts {
        /// Number of workouts to show (defaults to workouts.recent_limit)
        #[arg(long)]
        limit: Option<usize>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List known exercises
    Exercises {
        #[arg(long)]
        json: bool,
    },
    /// Weekly best e1RM series and trend forecast for an exercise
    Metrics(commands::metrics::MetricsArgs),
    /// Export every logged set as CSV
    Export {
        /// Write to this file instead of stdout (`gympal_export.csv` if no name is given)
        #[arg(long, short, num_args = 0..=1, default_missing_value = EXPORT_FILE_NAME)]
        output: Option<std::path::PathBuf>,
    },
    /// Insert ten weeks of demo Squat workouts
    Seed {
        /// RNG seed for reproducible dates
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Check that the database answers
    Health,
    /// Print the database schema
    Schema {
        #[arg(long, short)]
        output: Option<std::path::PathBuf>,
    },
    /// Show the tail of the log file
    Logs,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "gympal-cli", &mut std::io::stdout());
        return;
    }

    let result = commands::init_logging().and_then(|()| match cli.command {
        Commands::Init => commands::workout::init(),
        Commands::Log(args) => commands::workout::log(args),
        Commands::Workouts { limit, json } => commands::workout::list(limit, json),
        Commands::Exercises { json } => commands::workout::exercises(json),
        Commands::Metrics(args) => commands::metrics::run(args),
        Commands::Export { output } => commands::export::csv(output),
        Commands::Seed { seed } => commands::workout::seed_demo(seed),
        Commands::Health => commands::diagnostics::health(),
        Commands::Schema { output } => commands::diagnostics::schema(output),
        Commands::Logs => commands::diagnostics::logs(),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { .. } => Ok(()),
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
