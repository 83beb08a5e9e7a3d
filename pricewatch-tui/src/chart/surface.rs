//! Retained rendering objects for the candlestick chart.
//!
//! The chart is consumed through a small retained surface: an instance is
//! created with options, its series receives wholesale data replacements,
//! options are reapplied on resize, and removal consumes the instance.
//! Ownership of a live chart is the explicit two-field [`ChartHandle`].

use pricewatch_data::Candle;

/// Options applied to a chart instance at creation and on resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    /// Drawing surface width in terminal cells.
    pub width: u16,
    /// Drawing surface height in terminal rows.
    pub height: u16,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 80,
            height: 20,
        }
    }
}

/// One created chart. Holds the layout options its surface is drawn with.
#[derive(Debug)]
pub struct ChartInstance {
    options: ChartOptions,
}

impl ChartInstance {
    pub fn create(options: ChartOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ChartOptions {
        self.options
    }

    /// Reapply layout options, as on a container resize.
    pub fn apply_options(&mut self, options: ChartOptions) {
        self.options = options;
    }

    /// Tear the instance down. Consumes self: a removed instance cannot
    /// be touched again.
    pub fn remove(self) {}
}

/// Data series attached to a chart instance.
///
/// Contents are replaced wholesale per fetch, never merged incrementally.
#[derive(Debug, Default)]
pub struct CandleSeries {
    data: Vec<Candle>,
}

impl CandleSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data(&mut self, candles: Vec<Candle>) {
        self.data = candles;
    }

    pub fn data(&self) -> &[Candle] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Exclusive ownership of one live chart: the rendering instance and its
/// attached data series as two explicit fields.
#[derive(Debug)]
pub struct ChartHandle {
    pub instance: ChartInstance,
    pub series: CandleSeries,
}

impl ChartHandle {
    pub fn create(options: ChartOptions) -> Self {
        Self {
            instance: ChartInstance::create(options),
            series: CandleSeries::new(),
        }
    }

    /// Retire the handle, removing its instance. Series data dies with it.
    pub fn retire(self) {
        self.instance.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_options_replaces_layout() {
        let mut instance = ChartInstance::create(ChartOptions {
            width: 100,
            height: 30,
        });
        instance.apply_options(ChartOptions {
            width: 60,
            height: 30,
        });
        assert_eq!(instance.options().width, 60);
    }

    #[test]
    fn test_series_replaced_wholesale() {
        let mut series = CandleSeries::new();
        assert!(series.is_empty());

        let first = vec![Candle {
            open_time: 1,
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
        }];
        series.set_data(first);
        assert_eq!(series.len(), 1);

        series.set_data(Vec::new());
        assert!(series.is_empty());
    }
}
