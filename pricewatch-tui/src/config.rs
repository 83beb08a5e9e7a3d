//! Environment-backed settings for the dashboard binary.

/// Trade stream endpoint (`WS_URL`).
pub fn ws_url() -> String {
    std::env::var("WS_URL").unwrap_or_else(|_| "ws://127.0.0.1:8080/ws/trades".to_string())
}

/// Candle endpoint base (`API_URL`).
pub fn api_url() -> String {
    std::env::var("API_URL").unwrap_or_else(|_| "http://127.0.0.1:8080/".to_string())
}

/// Log file destination (`DASHBOARD_LOG`). The TUI owns the screen, so
/// log lines go to a file instead of stdout.
pub fn log_path() -> String {
    std::env::var("DASHBOARD_LOG").unwrap_or_else(|_| "pricewatch-dashboard.log".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse_as_urls() {
        assert!(url::Url::parse(&api_url()).is_ok());
        assert!(url::Url::parse(&ws_url()).is_ok());
    }
}
