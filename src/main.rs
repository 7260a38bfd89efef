use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    fs::OpenOptions,
    io,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::mpsc;
use tracing::{info, warn};

use noticetui::api::NoticeClient;
use noticetui::auth::AuthClient;
use noticetui::config::{get_debug_log_path, Config};
use noticetui::logic::ui::ToastKind;
use noticetui::model;
use noticetui::services::{spawn_api_service, ApiRequest, ApiResponse};
use noticetui::session::SessionStore;
use noticetui::transport::ReqwestTransport;

mod app;
mod handlers;
mod ui;

/// Notice board terminal client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging to <temp>/noticetui-debug.log
    #[arg(short, long)]
    debug: bool,

    /// Enable vim keybindings (j/k, g/G)
    #[arg(long)]
    vim: bool,

    /// Path to config file (default: platform-specific, see docs)
    #[arg(short, long)]
    config: Option<String>,

    /// Server address, overriding the config file
    #[arg(long)]
    base_url: Option<String>,
}

pub struct App {
    pub model: model::Model,

    api_tx: mpsc::UnboundedSender<ApiRequest>,
    api_rx: mpsc::UnboundedReceiver<ApiResponse>,

    pub base_url: String,
}

impl App {
    /// Build the HTTP stack, start the API worker and restore a stored session
    fn new(config: &Config) -> Result<Self> {
        let store = SessionStore::open(config.session_db.as_deref())
            .context("failed to open session store")?;
        let transport = ReqwestTransport::new(Duration::from_secs(config.request_timeout_secs))
            .context("failed to build HTTP client")?;
        let auth = AuthClient::new(Arc::new(transport), Arc::new(store), config.base_url.clone());
        let client = NoticeClient::new(auth);

        let stored = client.stored_session().context("failed to read stored session")?;
        let (api_tx, api_rx) = spawn_api_service(client);

        let mut app = Self::from_parts(config.vim_mode, config.base_url.clone(), api_tx, api_rx);
        if let Some(session) = stored {
            info!(user = ?session.user_name, "found stored session, verifying");
            app.restore_session();
        }
        Ok(app)
    }

    fn from_parts(
        vim_mode: bool,
        base_url: String,
        api_tx: mpsc::UnboundedSender<ApiRequest>,
        api_rx: mpsc::UnboundedReceiver<ApiResponse>,
    ) -> Self {
        Self {
            model: model::Model::new(vim_mode),
            api_tx,
            api_rx,
            base_url,
        }
    }

    /// Queue a request on the API worker
    pub(crate) fn send(&self, request: ApiRequest) {
        if self.api_tx.send(request).is_err() {
            warn!("api worker stopped; request dropped");
        }
    }

    pub(crate) fn toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.model.show_toast(message, kind);
    }

    fn handle_api_response(&mut self, response: ApiResponse) {
        handlers::handle_api_response(self, response);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        handlers::handle_key(self, key);
    }
}

/// Install the file logger; without --debug nothing is recorded
fn init_tracing(debug: bool) -> Result<()> {
    if !debug {
        return Ok(());
    }
    let path = get_debug_log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open debug log at {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug)?;

    let (mut config, config_path) = Config::load(args.config.as_deref())?;
    info!(path = ?config_path, "configuration loaded");

    // CLI flags win over the file
    if args.vim {
        config.vim_mode = true;
    }
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }

    let mut app = App::new(&config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if app.model.ui.should_dismiss_toast() {
            app.model.ui.dismiss_toast();
        }

        if app.model.ui.should_quit {
            break;
        }

        // Process API responses (non-blocking)
        while let Ok(response) = app.api_rx.try_recv() {
            app.handle_api_response(response);
        }

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    Ok(())
}
