use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use studyhelper_common::{logger, AppConfig};

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "studyhelper")]
#[command(about = "StudyHelper - summaries, study questions, word lists, OCR and PDF notes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to (overrides SERVER_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides SERVER_PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Log level (overrides LOG_LEVEL)
        #[arg(long)]
        log_level: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv_from_project_root();
    let mut config = AppConfig::from_env()?;

    if let Some(Commands::Serve {
        host,
        port,
        log_level,
    }) = cli.command
    {
        if let Some(host) = host {
            config.server_host = host;
        }
        if let Some(port) = port {
            config.server_port = port;
        }
        if let Some(level) = log_level {
            config.log_level = level;
        }
    }

    logger::setup_logging(&config.log_dir, &config.log_level)?;
    config.validate()?;

    tracing::info!("StudyHelper starting...");
    tracing::info!("Configuration loaded: {:?}", config.llm);

    // A missing API key fails here, before the socket is bound
    studyhelper_server::start_server(config).await?;

    Ok(())
}
