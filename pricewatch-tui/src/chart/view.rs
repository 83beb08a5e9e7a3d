//! Lifecycle of the chart rendering objects.
//!
//! Closes the two races inherent to an event-driven dashboard: a candle
//! fetch resolving after the view was torn down, and a resize event firing
//! after disposal. Liveness is checked at the point of use via an explicit
//! state flag, and overlapping fetches are arbitrated by a generation
//! counter compared where the data would land.

use pricewatch_data::{Candle, DataError};
use tracing::debug;

use super::surface::{ChartHandle, ChartOptions};

/// Where the view is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Uninitialized,
    Ready,
    Disposed,
}

/// What the chart has to show, for the presentation layer.
///
/// `Failed` is a retryable error state, deliberately distinct from a
/// successful fetch that returned no candles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Owns the one live chart per view.
///
/// All operations tolerate being called against a disposed view; the
/// worst case is a debug log line, never a panic or a resurrected chart.
#[derive(Debug, Default)]
pub struct ChartView {
    state: ViewState,
    handle: Option<ChartHandle>,
    generation: u64,
    fetch: FetchState,
}

impl ChartView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the rendering instance and its series, retiring any prior
    /// handle first. Retiring twice is a no-op, so reinitialization is
    /// always safe.
    pub fn initialize(&mut self, options: ChartOptions) {
        self.retire();
        self.handle = Some(ChartHandle::create(options));
        self.state = ViewState::Ready;
    }

    fn retire(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.retire();
        }
    }

    /// Stamp a new fetch as the one whose result may reach the chart.
    /// Completions carrying an older generation are discarded on arrival.
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.fetch = FetchState::Loading;
        self.generation
    }

    /// Deliver a completed fetch.
    ///
    /// Last-issued-wins: a slower response from an earlier request must not
    /// overwrite a faster later one, so anything but the newest generation
    /// is dropped here regardless of arrival order.
    pub fn complete_fetch(&mut self, generation: u64, result: Result<Vec<Candle>, DataError>) {
        if generation != self.generation {
            debug!(
                generation,
                latest = self.generation,
                "discarding stale candle fetch"
            );
            return;
        }
        match result {
            Ok(candles) => {
                self.set_data(candles);
                self.fetch = FetchState::Loaded;
            }
            Err(e) => {
                self.fetch = FetchState::Failed(e.to_string());
            }
        }
    }

    /// Replace the series contents, iff the view is still live.
    ///
    /// A disposed view makes this a silent no-op rather than an error;
    /// staleness is detected here, not trusted to the caller.
    pub fn set_data(&mut self, candles: Vec<Candle>) {
        match (self.state, self.handle.as_mut()) {
            (ViewState::Ready, Some(handle)) => handle.series.set_data(candles),
            _ => debug!("set_data on a non-ready chart view, ignoring"),
        }
    }

    /// Reapply the container dimensions. No-op once disposed.
    pub fn on_resize(&mut self, width: u16, height: u16) {
        if self.state != ViewState::Ready {
            return;
        }
        if let Some(handle) = self.handle.as_mut() {
            handle.instance.apply_options(ChartOptions { width, height });
        }
    }

    /// Tear down the rendering instance. Idempotent.
    pub fn dispose(&mut self) {
        self.retire();
        self.state = ViewState::Disposed;
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ViewState::Ready
    }

    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch
    }

    /// The displayed series; empty when no handle is live.
    pub fn candles(&self) -> &[Candle] {
        self.handle
            .as_ref()
            .map(|handle| handle.series.data())
            .unwrap_or(&[])
    }

    /// Layout options of the live instance, if any.
    pub fn options(&self) -> Option<ChartOptions> {
        self.handle.as_ref().map(|handle| handle.instance.options())
    }
}
