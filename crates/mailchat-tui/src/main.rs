use anyhow::{Context, Result};
use clap::Parser;
use mailchat_core::{ChatController, Config, LabelsClient};
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, TICK_RATE};

#[derive(Parser)]
#[command(name = "mailchat")]
#[command(version, about = "Chat with an assistant about your emails and schedule")]
struct Cli {
    /// Endpoint returning the mailbox labels as a JSON array
    #[arg(long, env = "MAILCHAT_LABELS_URL")]
    labels_url: Option<String>,

    /// Where to write logs (the terminal belongs to the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long)]
    debug: bool,
}

fn default_log_path() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir().context("Could not determine cache directory")?;
    Ok(cache_dir.join("mailchat").join("mailchat.log"))
}

fn init_logging(cli: &Cli) -> Result<()> {
    let path = match &cli.log_file {
        Some(path) => path.clone(),
        None => default_log_path()?,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(&path)
        .with_context(|| format!("Could not open log file {}", path.display()))?;

    let default_filter = if cli.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = Config::load().context("Could not load config")?;
    let labels_url = config.labels_url(cli.labels_url.as_deref());
    info!(%labels_url, "starting mailchat");

    let client = LabelsClient::with_timeout(&labels_url, config.request_timeout())
        .context("Could not build HTTP client")?;
    let mut app = App::new(ChatController::start(client));

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;

    app.controller.shutdown();
    tui::restore()?;
    info!("mailchat exited");
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new(TICK_RATE);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }
    Ok(())
}
