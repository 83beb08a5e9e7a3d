//! Dashboard application state and controls.

use pricewatch_data::{Period, Symbol};

use crate::chart::surface::ChartOptions;
use crate::chart::view::ChartView;

/// Dashboard pages, toggled with Tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Trades,
    Chart,
}

/// Top-level dashboard state.
///
/// Methods that change the chart selection return the fetch generation to
/// issue, or `None` when nothing should be fetched; the binary spawns the
/// actual request.
#[derive(Debug, Default)]
pub struct App {
    pub page: Page,
    pub chart: ChartView,
    symbol_idx: usize,
    period_idx: usize,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbol(&self) -> Symbol {
        Symbol::ALL[self.symbol_idx]
    }

    pub fn period(&self) -> Period {
        Period::ALL[self.period_idx]
    }

    /// Switch between the two pages.
    ///
    /// Entering the chart page mounts the chart and issues a fetch.
    /// Leaving tears the chart down; an in-flight fetch keeps running and
    /// its completion lands on the disposed view, where it is ignored.
    pub fn toggle_page(&mut self, options: ChartOptions) -> Option<u64> {
        match self.page {
            Page::Trades => {
                self.page = Page::Chart;
                self.chart.initialize(options);
                Some(self.chart.begin_fetch())
            }
            Page::Chart => {
                self.page = Page::Trades;
                self.chart.dispose();
                None
            }
        }
    }

    /// Cycle to the next symbol; fetches only while the chart is showing.
    pub fn next_symbol(&mut self) -> Option<u64> {
        self.symbol_idx = (self.symbol_idx + 1) % Symbol::ALL.len();
        self.fetch_if_charting()
    }

    /// Cycle to the next period; fetches only while the chart is showing.
    pub fn next_period(&mut self) -> Option<u64> {
        self.period_idx = (self.period_idx + 1) % Period::ALL.len();
        self.fetch_if_charting()
    }

    /// Re-fetch the current selection. Doubles as the retry affordance
    /// after a failed fetch.
    pub fn refresh(&mut self) -> Option<u64> {
        self.fetch_if_charting()
    }

    pub fn on_resize(&mut self, width: u16, height: u16) {
        self.chart.on_resize(width, height);
    }

    fn fetch_if_charting(&mut self) -> Option<u64> {
        (self.page == Page::Chart).then(|| self.chart.begin_fetch())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::view::ViewState;
    use pricewatch_data::Candle;

    fn options() -> ChartOptions {
        ChartOptions {
            width: 80,
            height: 24,
        }
    }

    fn candles_closing_at(close: f64) -> Vec<Candle> {
        vec![Candle {
            open_time: 1_718_971_200,
            open: close,
            high: close,
            low: close,
            close,
        }]
    }

    #[test]
    fn test_toggle_mounts_and_disposes_the_chart() {
        let mut app = App::new();
        assert_eq!(app.page, Page::Trades);

        let generation = app.toggle_page(options());
        assert_eq!(app.page, Page::Chart);
        assert!(generation.is_some());
        assert_eq!(app.chart.state(), ViewState::Ready);

        let generation = app.toggle_page(options());
        assert_eq!(app.page, Page::Trades);
        assert!(generation.is_none());
        assert_eq!(app.chart.state(), ViewState::Disposed);

        // Entering again remounts
        app.toggle_page(options());
        assert_eq!(app.chart.state(), ViewState::Ready);
    }

    #[test]
    fn test_selection_cycles_wrap_around() {
        let mut app = App::new();
        let first = app.symbol();
        for _ in 0..Symbol::ALL.len() {
            app.next_symbol();
        }
        assert_eq!(app.symbol(), first);

        let first = app.period();
        for _ in 0..Period::ALL.len() {
            app.next_period();
        }
        assert_eq!(app.period(), first);
    }

    #[test]
    fn test_no_fetch_issued_from_the_trades_page() {
        let mut app = App::new();
        assert!(app.next_symbol().is_none());
        assert!(app.next_period().is_none());
        assert!(app.refresh().is_none());
    }

    #[test]
    fn test_symbol_change_supersedes_pending_fetch() {
        let mut app = App::new();
        let first = app.toggle_page(options()).unwrap();
        let second = app.next_symbol().unwrap();
        assert!(second > first);

        // The second selection resolves first; the slow first response
        // must not overwrite it.
        app.chart.complete_fetch(second, Ok(candles_closing_at(2000.0)));
        app.chart.complete_fetch(first, Ok(candles_closing_at(40000.0)));
        assert_eq!(app.chart.candles()[0].close, 2000.0);
    }

    #[test]
    fn test_fetch_completion_after_leaving_chart_page() {
        let mut app = App::new();
        let generation = app.toggle_page(options()).unwrap();
        app.toggle_page(options());

        app.chart
            .complete_fetch(generation, Ok(candles_closing_at(100.0)));
        assert_eq!(app.chart.state(), ViewState::Disposed);
        assert!(app.chart.candles().is_empty());
    }
}
