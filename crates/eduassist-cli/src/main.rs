use anyhow::Result;
use clap::{Parser, Subcommand};
use eduassist_application::AppContext;
use eduassist_infrastructure::EduPaths;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod commands;
mod console;

use commands::{auth, chat, config, dashboard, student};

#[derive(Parser)]
#[command(name = "eduassist")]
#[command(about = "EduAssist - teacher dashboard and assistant from the terminal", long_about = None)]
struct Cli {
    /// Keep config and session files in this directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in as a teacher
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create a teacher account
    Register(auth::RegisterArgs),
    /// Sign out
    Logout,
    /// Resolve a client route against the current session
    Route { path: String },
    /// Talk to the scripted task assistant
    Chat,
    /// Talk to the backend AI assistant
    Assistant {
        #[command(subcommand)]
        action: chat::AssistantAction,
    },
    /// Ask the simple chatbot
    Chatbot {
        /// Single message; opens a prompt when omitted
        message: Option<String>,
        /// Forget the stored chatbot history
        #[arg(long)]
        clear: bool,
    },
    /// Show events for a month
    Calendar {
        /// Month as YYYY-MM (defaults to the current month)
        #[arg(long)]
        month: Option<String>,
    },
    /// Performance analytics
    Performance {
        #[command(subcommand)]
        action: dashboard::PerformanceAction,
    },
    /// Section rosters
    Students(dashboard::StudentsArgs),
    /// Bulk communication
    Bulk {
        #[command(subcommand)]
        action: dashboard::BulkAction,
    },
    /// Student portal
    Student {
        #[command(subcommand)]
        action: student::StudentAction,
    },
    /// Client configuration
    Config {
        #[command(subcommand)]
        action: config::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = EduPaths::new(cli.data_dir.as_deref());

    if let Commands::Config { action } = &cli.command {
        return config::run(&paths, action);
    }

    let ctx = AppContext::bootstrap(
        &paths,
        Arc::new(console::ConsoleNavigator::default()),
        Arc::new(console::ConsoleNotifier),
    )?;

    match cli.command {
        Commands::Login { email, password } => auth::login(&ctx, &email, password).await?,
        Commands::Register(args) => auth::register(&ctx, args).await?,
        Commands::Logout => auth::logout(&ctx)?,
        Commands::Route { path } => auth::route(&ctx, &path)?,
        Commands::Chat => chat::scripted(&ctx).await?,
        Commands::Assistant { action } => chat::assistant(&ctx, action).await?,
        Commands::Chatbot { message, clear } => chat::chatbot(&ctx, message, clear).await?,
        Commands::Calendar { month } => dashboard::calendar(&ctx, month.as_deref()).await?,
        Commands::Performance { action } => dashboard::performance(&ctx, action).await?,
        Commands::Students(args) => dashboard::students(&ctx, args).await?,
        Commands::Bulk { action } => dashboard::bulk(&ctx, action).await?,
        Commands::Student { action } => student::run(&ctx, action).await?,
        Commands::Config { .. } => {}
    }

    Ok(())
}
