use clap::{Parser, Subcommand};
use lessontable_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "lessontable", version, about = "Lessontable class timetable CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a JSON timetable, replacing stored courses
    Import(commands::import::ImportArgs),
    /// List stored courses
    Courses(commands::courses::CoursesArgs),
    /// Show the course grid for a week
    Grid(commands::grid::GridArgs),
    /// Show the current teaching week
    Week(commands::week::WeekArgs),
    /// Term start date and period times
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Whether a timetable has been imported
    Status,
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_logging(&config);

    let result = match cli.command {
        Commands::Import(args) => commands::import::run(args, &config),
        Commands::Courses(args) => commands::courses::run(args),
        Commands::Grid(args) => commands::grid::run(args, &config),
        Commands::Week(args) => commands::week::run(args, &config),
        Commands::Settings { action } => commands::settings::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
        Commands::Status => commands::status::run(&config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
