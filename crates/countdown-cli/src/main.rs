use clap::{CommandFactory, Parser, Subcommand};
use countdown_core::Config;

mod audio;
mod commands;
mod logging;
mod render;

#[derive(Parser)]
#[command(name = "countdown", version, about = "New Year countdown")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the live countdown until it reaches zero
    Run(commands::run::RunArgs),
    /// Print the current countdown state as JSON
    Status(commands::TargetArgs),
    /// Sound and theme preferences
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Custom celebration wishes
    Wish {
        #[command(subcommand)]
        action: commands::wish::WishAction,
    },
    /// List available themes
    Themes,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(&Config::load_or_default().log.filter);

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Status(args) => commands::run::status(args),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Wish { action } => commands::wish::run(action),
        Commands::Themes => commands::settings::list_themes(),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "countdown", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
