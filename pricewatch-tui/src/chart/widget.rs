//! Candlestick painting for the chart pane.

use pricewatch_data::Candle;
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

// Up/down palette matching the web dashboard's chart options
const C_UP: Color = Color::Rgb(38, 166, 154);
const C_DOWN: Color = Color::Rgb(239, 83, 80);
const C_GRID: Color = Color::Rgb(60, 60, 60);
const C_SCALE: Color = Color::Rgb(120, 120, 120);

/// Candlestick chart: one column per candle, wick plus body, newest at the
/// right edge. The price scale is derived from the visible candles.
pub struct CandleChartWidget<'a> {
    candles: &'a [Candle],
}

impl<'a> CandleChartWidget<'a> {
    pub fn new(candles: &'a [Candle]) -> Self {
        Self { candles }
    }
}

impl Widget for CandleChartWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.candles.is_empty() || area.width < 12 || area.height < 3 {
            return;
        }

        // Reserve a right-hand gutter for price labels
        let label_width: u16 = 10;
        let plot_width = (area.width - label_width) as usize;
        let height = area.height as i32;

        // Newest candles win the visible window
        let visible = self.candles.len().min(plot_width);
        let start = self.candles.len() - visible;
        let candles = &self.candles[start..];

        let y_min = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let y_max = candles
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let span = (y_max - y_min).max(1e-9);

        let row_min = area.y as i32;
        let row_max = area.y as i32 + height - 1;
        let map_price_to_row = |price: f64| -> i32 {
            let ratio = ((price - y_min) / span).clamp(0.0, 1.0);
            let rel = (ratio * (height as f64 - 1.0)).round() as i32;
            row_max - rel
        };

        // Horizontal grid with price labels in the gutter
        let grid_lines = 4;
        for i in 0..=grid_lines {
            let price = y_min + span * i as f64 / grid_lines as f64;
            let row = map_price_to_row(price).clamp(row_min, row_max) as u16;
            for x in area.x..area.x + plot_width as u16 {
                if let Some(cell) = buf.cell_mut((x, row)) {
                    if cell.symbol() == " " {
                        cell.set_symbol("─").set_fg(C_GRID);
                    }
                }
            }
            let label = format!("{:>9.2}", price);
            buf.set_string(
                area.x + plot_width as u16 + 1,
                row,
                label,
                ratatui::style::Style::default().fg(C_SCALE),
            );
        }

        // Candles: wick column with the open/close body over it
        for (i, candle) in candles.iter().enumerate() {
            let x = area.x + i as u16;
            let color = if candle.close >= candle.open {
                C_UP
            } else {
                C_DOWN
            };

            let high_row = map_price_to_row(candle.high);
            let low_row = map_price_to_row(candle.low);
            let open_row = map_price_to_row(candle.open);
            let close_row = map_price_to_row(candle.close);

            let wick_top = high_row.min(low_row).max(row_min);
            let wick_bottom = high_row.max(low_row).min(row_max);
            for y in wick_top..=wick_bottom {
                if let Some(cell) = buf.cell_mut((x, y as u16)) {
                    cell.set_symbol("│").set_fg(color);
                }
            }

            let body_top = open_row.min(close_row).max(row_min);
            let body_bottom = open_row.max(close_row).min(row_max);
            for y in body_top..=body_bottom {
                if let Some(cell) = buf.cell_mut((x, y as u16)) {
                    cell.set_symbol("█").set_fg(color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(open_time: i64, open: f64, close: f64) -> Candle {
        Candle {
            open_time,
            open,
            close,
            high: open.max(close) + 1.0,
            low: open.min(close) - 1.0,
        }
    }

    fn rendered_symbols(candles: &[Candle], area: Rect) -> Vec<String> {
        let mut buf = Buffer::empty(area);
        CandleChartWidget::new(candles).render(area, &mut buf);
        buf.content
            .iter()
            .map(|cell| cell.symbol().to_string())
            .collect()
    }

    #[test]
    fn test_empty_series_renders_nothing() {
        let area = Rect::new(0, 0, 40, 10);
        let symbols = rendered_symbols(&[], area);
        assert!(symbols.iter().all(|s| s == " "));
    }

    #[test]
    fn test_candles_paint_bodies_and_wicks() {
        let candles = vec![
            candle(0, 100.0, 110.0),
            candle(60, 110.0, 105.0),
            candle(120, 105.0, 120.0),
        ];
        let area = Rect::new(0, 0, 40, 12);
        let symbols = rendered_symbols(&candles, area);

        assert!(symbols.iter().any(|s| s == "█"));
        assert!(symbols.iter().any(|s| s == "│"));
    }

    #[test]
    fn test_tiny_area_is_skipped() {
        let candles = vec![candle(0, 100.0, 110.0)];
        let area = Rect::new(0, 0, 5, 2);
        let symbols = rendered_symbols(&candles, area);
        assert!(symbols.iter().all(|s| s == " "));
    }
}
