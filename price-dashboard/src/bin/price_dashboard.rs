/// Price Dashboard
///
/// Uploads a housing dataset to the prediction backend and explores the
/// returned predictions. Backend URL comes from `API_URL`; logs go to
/// `price-dashboard.log`, filtered by `RUST_LOG`.
use std::{
    error::Error,
    fs::OpenOptions,
    io,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use price_dashboard::shared::runtime::{
    spawn_export, spawn_health_poll, spawn_model_info_fetch, spawn_single_prediction, spawn_upload,
};
use price_dashboard::{
    handle_key, render_dashboard, ApiClient, AppEvent, Command, Dashboard, DashboardConfig,
    PredictionBackend,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{info, warn};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

/// Initialize logging into `path`; the terminal itself is owned by the UI
fn init_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = DashboardConfig::from_env();
    init_logging(&config.log_file)?;
    info!("Starting price dashboard against {}", config.api_url);

    let backend: Arc<dyn PredictionBackend> = Arc::new(ApiClient::new(config.clone())?);

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let (tx, rx) = mpsc::channel::<AppEvent>(64);
    let health = spawn_health_poll(Arc::clone(&backend), config.health_interval, tx.clone());
    spawn_model_info_fetch(Arc::clone(&backend), tx.clone());

    let outcome = run(&mut terminal, &config, backend, tx, rx).await;

    health.abort();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &outcome {
        warn!("Dashboard exited with error: {}", e);
    }
    info!("Dashboard closed");
    outcome
}

async fn run(
    terminal: &mut Term,
    config: &DashboardConfig,
    backend: Arc<dyn PredictionBackend>,
    tx: mpsc::Sender<AppEvent>,
    mut rx: mpsc::Receiver<AppEvent>,
) -> Result<(), Box<dyn Error>> {
    let tick_rate = Duration::from_millis(100);
    let mut dashboard = Dashboard::new();

    loop {
        while let Ok(event) = rx.try_recv() {
            dashboard.apply(event);
        }

        terminal.draw(|f| render_dashboard(f, &dashboard))?;

        if !event::poll(tick_rate)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match handle_key(&mut dashboard, key) {
            Some(Command::Quit) => break,
            Some(Command::Upload { path, generation }) => {
                info!("Uploading {} (generation {})", path.display(), generation);
                spawn_upload(Arc::clone(&backend), path, generation, tx.clone());
            }
            Some(Command::PredictSingle(draft)) => {
                spawn_single_prediction(Arc::clone(&backend), draft, tx.clone());
            }
            Some(Command::Export(kind)) => {
                if let Some(result) = dashboard.result.clone() {
                    spawn_export(kind, result, config.export_dir.clone(), tx.clone());
                }
            }
            None => {}
        }

        if dashboard.should_quit {
            break;
        }
    }

    Ok(())
}
