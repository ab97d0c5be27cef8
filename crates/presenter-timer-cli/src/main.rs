use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "presenter-timer", version, about = "Presenter countdown timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a live countdown, printing every frame
    Run(commands::run::RunArgs),
    /// Classify a remaining time into an alert tier
    Classify(commands::classify::ClassifyArgs),
    /// Compute font sizes for a surface
    Size {
        #[command(subcommand)]
        action: commands::size::SizeAction,
    },
    /// User settings management
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Predefined message list
    Messages {
        #[command(subcommand)]
        action: commands::messages::MessagesAction,
    },
    /// Background image selection
    Image {
        #[command(subcommand)]
        action: commands::image::ImageAction,
    },
    /// Shell configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init();

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Classify(args) => commands::classify::run(args),
        Commands::Size { action } => commands::size::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Messages { action } => commands::messages::run(action),
        Commands::Image { action } => commands::image::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
