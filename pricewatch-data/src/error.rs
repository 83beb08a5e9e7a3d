use thiserror::Error;

/// All errors generated in `pricewatch-data`.
#[derive(Debug, Error)]
pub enum DataError {
    /// Connection-level failure on the trade stream. Never fatal: the
    /// connection manager transitions to `Errored` and reconnects.
    #[error("stream transport error: {0}")]
    Transport(String),

    /// One malformed message or response unit. The offending unit is
    /// dropped and the surrounding operation continues.
    #[error("malformed payload: {0}")]
    Parse(String),

    /// Candle request failed outright or returned an unusable body.
    /// Surfaced to the chart as a retryable error state.
    #[error("candle fetch failed: {0}")]
    Fetch(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for DataError {
    fn from(value: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

impl From<reqwest::Error> for DataError {
    fn from(value: reqwest::Error) -> Self {
        Self::Fetch(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DataError::Fetch("http status 502".to_string());
        assert_eq!(error.to_string(), "candle fetch failed: http status 502");
    }

    #[test]
    fn test_parse_error_from_serde() {
        let inner = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = DataError::from(inner);
        assert!(matches!(error, DataError::Parse(_)));
    }
}
