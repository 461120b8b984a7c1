use std::fs::File;
use std::io;
use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use finchat::backend::{ChatBackend, HttpBackend};
use finchat::core::config::{self, CliOverrides, ResolvedConfig};
use finchat::core::conversation::ChatSession;
use finchat::core::grouping::format_transcript;
use finchat::tui;

#[derive(Parser)]
#[command(name = "finchat", about = "Terminal client for the FinChat personal-finance assistant")]
struct Args {
    /// Backend base URL (overrides FINCHAT_BASE_URL and the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Session ID sent with every chat message
    #[arg(long, conflicts_with = "new_session")]
    session_id: Option<String>,

    /// Start with a freshly generated session ID
    #[arg(long)]
    new_session: bool,

    /// Read settings from this file instead of ~/.finchat/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reject new messages while a reply is still pending
    #[arg(long)]
    single_flight: bool,

    /// Log level written to finchat.log
    #[arg(long, default_value = "debug")]
    log_level: LevelFilter,

    /// Print the stored conversation and exit
    #[arg(long, conflicts_with_all = ["ask", "check"])]
    print_history: bool,

    /// Send one message, print the conversation and exit
    #[arg(long, value_name = "TEXT", conflicts_with = "check")]
    ask: Option<String>,

    /// Check that the backend is reachable and exit
    #[arg(long)]
    check: bool,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        let session_id = if self.new_session {
            Some(config::new_session_id())
        } else {
            self.session_id.clone()
        };
        CliOverrides {
            base_url: self.base_url.clone(),
            session_id,
            single_flight: self.single_flight,
        }
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to finchat.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("finchat.log") {
        let _ = WriteLogger::init(args.log_level, log_config, log_file);
    }

    let file_config = match &args.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };
    let file_config = file_config.unwrap_or_else(|e| {
        eprintln!("Warning: {e}. Using defaults.");
        log::warn!("Config error: {}", e);
        Default::default()
    });
    let resolved = config::resolve(&file_config, &args.overrides());

    log::info!(
        "FinChat starting up: backend={}, session={:?}, single_flight={}",
        resolved.base_url,
        resolved.session_id,
        resolved.single_flight
    );

    if args.check {
        return check(&resolved).await;
    }
    if args.print_history || args.ask.is_some() {
        return one_shot(&resolved, args.ask.as_deref()).await;
    }

    tui::run(resolved)
}

async fn check(config: &ResolvedConfig) -> io::Result<()> {
    let backend = HttpBackend::new(config.base_url.clone());
    let banner = backend.health().await.map_err(io::Error::other)?;
    println!("{}: {}", backend.location(), banner);
    Ok(())
}

async fn one_shot(config: &ResolvedConfig, ask: Option<&str>) -> io::Result<()> {
    let backend = HttpBackend::new(config.base_url.clone());
    let mut session = ChatSession::new(&backend, config.session_id.clone());

    if let Err(e) = session.hydrate().await {
        eprintln!("Could not load history: {e}");
    }
    if let Some(text) = ask
        && session.send(text).await.is_none()
    {
        eprintln!("Nothing to send: message is blank");
    }

    print!(
        "{}",
        format_transcript(session.conversation().messages(), &Local)
    );
    Ok(())
}
