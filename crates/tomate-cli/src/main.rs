mod client;
mod commands;
mod daemon_launcher;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{NoteCommand, Period, SettingsCommand, TaskCommand};
use tomate_protocol::TimerMode;

#[derive(Parser)]
#[command(name = "tomate", version)]
#[command(about = "Tomate - pomodoro timer for the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start or resume the timer, launching the daemon if needed
    Start,
    /// Pause the timer
    Pause,
    /// Stop the timer and refill the current mode
    Reset,
    /// Switch to another mode (focus, short-break, long-break)
    Switch { mode: TimerMode },
    /// Show the timer status
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Show completed pomodoro statistics
    Stats {
        #[arg(short, long, value_enum, default_value_t = Period::Today)]
        period: Period,
        #[arg(long)]
        json: bool,
    },
    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
    /// Manage notes
    Note {
        #[command(subcommand)]
        command: NoteCommand,
    },
    /// Show or change timer settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
    /// Create the configuration file interactively
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Show or set the interface language
    Lang { code: Option<String> },
    /// Launch the background daemon
    Daemon,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start => commands::start().await,
        Commands::Pause => commands::pause().await,
        Commands::Reset => commands::reset().await,
        Commands::Switch { mode } => commands::switch(mode).await,
        Commands::Status { json } => commands::status(json).await,
        Commands::Stats { period, json } => commands::stats(period, json).await,
        Commands::Task { command } => commands::task(command).await,
        Commands::Note { command } => commands::note(command),
        Commands::Settings { command } => commands::settings(command).await,
        Commands::Init { force } => commands::init(force),
        Commands::Lang { code } => commands::lang(code),
        Commands::Daemon => commands::daemon().await,
    }
}
