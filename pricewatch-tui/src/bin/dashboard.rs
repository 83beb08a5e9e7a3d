/// Live market dashboard
///
/// Streams trades from the price-tracker backend into a bounded table and
/// renders candlestick history fetched from its candle endpoint. Tab
/// switches between the two pages; the chart page cycles symbol and period
/// with s/p and refreshes with r.
use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pricewatch_data::{
    Candle, CandleClient, ConnectionConfig, ConnectionManager, DataError, Period, Symbol,
    TradeBuffer, TradeSummary,
};
use pricewatch_tui::{config, ui, App, ChartOptions};
use ratatui::{backend::CrosstermBackend, Terminal};
use rustls::crypto::ring::default_provider;
use tokio::sync::{mpsc, Mutex};
use url::Url;

/// A completed candle fetch, tagged with the generation that issued it.
struct FetchOutcome {
    generation: u64,
    result: Result<Vec<Candle>, DataError>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logging()?;
    let _ = default_provider().install_default();

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Live trade ingestion: the stream task pushes into the shared buffer
    let buffer = Arc::new(Mutex::new(TradeBuffer::new()));
    let manager = ConnectionManager::new(
        ConnectionConfig::new(config::ws_url()),
        Arc::clone(&buffer),
    );
    let state_rx = manager.state_rx();
    manager.connect();

    let candles = CandleClient::new(Url::parse(&config::api_url())?);
    let (fetch_tx, mut fetch_rx) = mpsc::channel::<FetchOutcome>(8);

    let mut app = App::new();
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        // Deliver completed fetches before drawing; stale generations are
        // discarded inside the chart view
        while let Ok(outcome) = fetch_rx.try_recv() {
            app.chart.complete_fetch(outcome.generation, outcome.result);
        }

        if last_tick.elapsed() >= tick_rate {
            let rows = {
                let guard = buffer.lock().await;
                guard.snapshot()
            };
            let summary = TradeSummary::of(&rows);
            let connection = *state_rx.borrow();
            terminal.draw(|f| ui::render(f, &app, &rows, &summary, connection))?;
            last_tick = Instant::now();
        }

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Tab => {
                        let size = terminal.size()?;
                        let options = ChartOptions {
                            width: size.width,
                            height: size.height,
                        };
                        if let Some(generation) = app.toggle_page(options) {
                            spawn_fetch(&candles, &fetch_tx, generation, app.symbol(), app.period());
                        }
                    }
                    KeyCode::Char('s') => {
                        if let Some(generation) = app.next_symbol() {
                            spawn_fetch(&candles, &fetch_tx, generation, app.symbol(), app.period());
                        }
                    }
                    KeyCode::Char('p') => {
                        if let Some(generation) = app.next_period() {
                            spawn_fetch(&candles, &fetch_tx, generation, app.symbol(), app.period());
                        }
                    }
                    KeyCode::Char('r') => {
                        if let Some(generation) = app.refresh() {
                            spawn_fetch(&candles, &fetch_tx, generation, app.symbol(), app.period());
                        }
                    }
                    _ => {}
                },
                Event::Resize(width, height) => app.on_resize(width, height),
                _ => {}
            }
        }
    }

    manager.disconnect();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run one candle fetch on its own task. There is no cancellation: a
/// superseded request simply resolves into a stale generation and is
/// ignored at delivery.
fn spawn_fetch(
    client: &CandleClient,
    tx: &mpsc::Sender<FetchOutcome>,
    generation: u64,
    symbol: Symbol,
    period: Period,
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.fetch(symbol, period).await;
        let _ = tx.send(FetchOutcome { generation, result }).await;
    });
}

fn init_logging() -> Result<(), Box<dyn Error>> {
    // The TUI owns stdout, so logs go to a file
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(config::log_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
