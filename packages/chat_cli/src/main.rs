use anyhow::Result;
use chat_session::{SessionRegistry, WsConnector};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::prelude::*;

mod config;
mod console;
mod terminal;

use terminal::TerminalPresenter;

#[derive(Parser, Debug)]
#[command(name = "chat", about = "Multi-window chat client", version)]
struct Cli {
    /// Config file (missing file is fine, defaults apply)
    #[arg(long, default_value = "chat.toml")]
    config: PathBuf,

    /// Relay endpoint; overrides the config file and CHAT_CLIENT__ENDPOINT
    #[arg(long)]
    endpoint: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Print plain text without ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Open a window for NAME at startup (repeatable)
    #[arg(short, long = "join", value_name = "NAME")]
    join: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they stay out of the chat transcript.
    let default_directive = if cli.debug {
        "chat=debug,chat_session=debug,info"
    } else {
        "chat=info,chat_session=info,warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();

    let figment = config::load_config(&cli.config);
    let session_config = config::resolve(&figment, cli.endpoint)?;
    info!("Relay endpoint: {}", session_config.endpoint);

    let presenter = Arc::new(TerminalPresenter::new(!cli.no_color));
    let registry = SessionRegistry::new(session_config, Arc::new(WsConnector), presenter);

    console::run_console(&registry, cli.join).await
}
