/// Pricewatch TUI - Terminal Dashboard
///
/// Presents the live market view served by the price-tracker backend:
/// - Trades page: streaming trade table with summary cards
/// - Chart page: candlestick history for a (symbol, period) selection
///
/// The library includes:
/// - Chart lifecycle management (creation, data replacement, disposal)
/// - A candlestick widget painting straight into the terminal buffer
/// - Application state and page rendering for the dashboard binary
pub mod app;
pub mod chart;
pub mod config;
pub mod ui;

// Re-export commonly used types for convenience
pub use app::{App, Page};
pub use chart::surface::{CandleSeries, ChartHandle, ChartInstance, ChartOptions};
pub use chart::view::{ChartView, FetchState, ViewState};
pub use chart::widget::CandleChartWidget;
