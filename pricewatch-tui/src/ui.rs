//! Page rendering for the dashboard.

use chrono::DateTime;
use pricewatch_data::{ConnectionState, TradeEvent, TradeSummary};
use rust_decimal::Decimal;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, Page};
use crate::chart::view::FetchState;
use crate::chart::widget::CandleChartWidget;

pub fn render(
    f: &mut Frame,
    app: &App,
    trades: &[TradeEvent],
    summary: &TradeSummary,
    connection: ConnectionState,
) {
    match app.page {
        Page::Trades => render_trades_page(f, trades, summary, connection),
        Page::Chart => render_chart_page(f, app, connection),
    }
}

fn render_trades_page(
    f: &mut Frame,
    trades: &[TradeEvent],
    summary: &TradeSummary,
    connection: ConnectionState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(5),
        ])
        .split(f.area());

    render_header(
        f,
        chunks[0],
        " LIVE TRADES ",
        "[Tab] Charts  [Q] Quit",
        connection,
    );
    render_trades_table(f, chunks[1], trades, connection);
    render_summary_cards(f, chunks[2], summary);
}

fn render_header(f: &mut Frame, area: Rect, title: &str, help: &str, connection: ConnectionState) {
    let (status_symbol, status_color) = if connection.is_connected() {
        ("●", Color::Green)
    } else {
        ("○", Color::Red)
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} {} ", status_symbol, connection.label()),
            Style::default()
                .fg(status_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", title.trim()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {} ", help), Style::default().fg(Color::DarkGray)),
    ]);

    let paragraph = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn render_trades_table(f: &mut Frame, area: Rect, trades: &[TradeEvent], connection: ConnectionState) {
    let block = Block::default().borders(Borders::ALL).title(" TRADES ");

    if trades.is_empty() {
        let message = if connection.is_connected() {
            "Waiting for trade data..."
        } else {
            "Connecting to server..."
        };
        let waiting = Paragraph::new(Span::styled(
            message,
            Style::default().fg(Color::DarkGray),
        ))
        .block(block)
        .alignment(Alignment::Center);
        f.render_widget(waiting, area);
        return;
    }

    let header = Row::new(
        ["Symbol", "Price", "Quantity", "Time", "Trade ID"].map(|h| {
            Cell::from(h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        }),
    )
    .height(1);

    let rows = trades.iter().enumerate().map(|(i, trade)| {
        // Previous trade of the same symbol sits directly below in
        // presentation order (newest-first within a symbol)
        let previous = trades
            .get(i + 1)
            .filter(|prev| prev.symbol == trade.symbol)
            .map(|prev| prev.price);
        let price_style = price_direction_style(trade.price, previous);

        Row::new(vec![
            Cell::from(trade.symbol.as_str().to_string()).style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Cell::from(format!("${:.2}", trade.price)).style(price_style),
            Cell::from(format!("{:.4}", trade.quantity)),
            Cell::from(trade.trade_time.format("%H:%M:%S").to_string()),
            Cell::from(trade.trade_id.to_string()),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(block);

    f.render_widget(table, area);
}

/// Green on an uptick, red on a downtick, neutral without a same-symbol
/// predecessor to compare against.
fn price_direction_style(price: Decimal, previous: Option<Decimal>) -> Style {
    match previous {
        Some(prev) if price > prev => Style::default().fg(Color::Green),
        Some(prev) if price < prev => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::Gray),
    }
}

fn render_summary_cards(f: &mut Frame, area: Rect, summary: &TradeSummary) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(area);

    let latest = summary
        .latest_trade_time
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "N/A".to_string());

    render_card(f, cards[0], " Total Trades ", &summary.total_trades.to_string());
    render_card(f, cards[1], " Active Symbols ", &summary.active_symbols.to_string());
    render_card(f, cards[2], " Latest Update ", &latest);
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: &str) {
    let paragraph = Paragraph::new(Span::styled(
        value.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().borders(Borders::ALL).title(title))
    .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn render_chart_page(f: &mut Frame, app: &App, connection: ConnectionState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(f.area());

    render_header(
        f,
        chunks[0],
        " PRICE CHARTS ",
        "[S] Symbol  [P] Period  [R] Refresh  [Tab] Trades  [Q] Quit",
        connection,
    );
    render_chart_cards(f, chunks[1], app);
    render_chart_pane(f, chunks[2], app);
}

fn render_chart_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let candles = app.chart.candles();
    let last_update = candles
        .last()
        .and_then(|c| DateTime::from_timestamp(c.open_time, 0))
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "N/A".to_string());

    render_card(f, cards[0], " Symbol ", app.symbol().base());
    render_card(f, cards[1], " Period ", app.period().label());
    render_card(f, cards[2], " Data Points ", &candles.len().to_string());
    render_card(f, cards[3], " Last Update ", &last_update);
}

fn render_chart_pane(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} / {} ", app.symbol().base(), app.period().label()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    match app.chart.fetch_state() {
        FetchState::Loading => {
            let loading = Paragraph::new(Span::styled(
                "Loading chart data...",
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Center);
            f.render_widget(loading, inner);
        }
        FetchState::Failed(reason) => {
            let lines = vec![
                Line::from(Span::styled(
                    format!("Failed to load chart data: {}", reason),
                    Style::default().fg(Color::Red),
                )),
                Line::from(Span::styled(
                    "Press r to try again",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            let error = Paragraph::new(lines).alignment(Alignment::Center);
            f.render_widget(error, inner);
        }
        FetchState::Idle | FetchState::Loaded => {
            let candles = app.chart.candles();
            if candles.is_empty() {
                let empty = Paragraph::new(vec![
                    Line::from(Span::styled(
                        "No chart data available",
                        Style::default().fg(Color::DarkGray),
                    )),
                    Line::from(Span::styled(
                        "Try a different symbol or period",
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
                .alignment(Alignment::Center);
                f.render_widget(empty, inner);
            } else {
                f.render_widget(CandleChartWidget::new(candles), inner);
            }
        }
    }
}
