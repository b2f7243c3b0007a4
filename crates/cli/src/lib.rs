pub mod commands;

use clap::{Parser, Subcommand};
use parlor_core::config::{AppConfig, LogFormat};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "parlor",
    about = "Parlor order desk CLI",
    long_about = "Talk to the parlor assistant, and manage the data service schema and configuration.",
    after_help = "Examples:\n  parlor ask \"What flavors do you have?\"\n  parlor chat\n  parlor migrate\n  parlor config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Send one message to the assistant and print its reply")]
    Ask {
        #[arg(required = true, num_args = 1.., help = "The request, in plain words")]
        query: Vec<String>,
    },
    #[command(about = "Start an interactive session with the assistant")]
    Chat,
    #[command(about = "Create the inventory, feedback and report tables")]
    Migrate,
    #[command(about = "Drop and recreate the managed tables, deleting all rows")]
    Reset {
        #[arg(long, help = "Confirm that every stored row may be deleted")]
        yes: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Ask { query } => commands::ask::run(&query.join(" ")),
        Command::Chat => commands::chat::run(),
        Command::Migrate => commands::migrate::run(),
        Command::Reset { yes } => commands::reset::run(yes),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so replies on stdout stay clean. Returns whether this call
/// installed the subscriber; a later call keeps the first one.
pub(crate) fn init_logging(config: &AppConfig) -> bool {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::WARN);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let installed = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    match installed {
        Ok(()) => true,
        Err(error) => {
            tracing::debug!(
                event_name = "cli.logging.already_initialized",
                error = %error,
                "keeping existing log subscriber"
            );
            false
        }
    }
}
