/// WebSocket client for the live trade stream
///
/// Maintains one logical connection to the backend's trade feed, publishes
/// state transitions on a watch channel, and reconnects on a fixed delay
/// without operator intervention.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::StreamExt;
use tokio::sync::{watch, Mutex};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::buffer::TradeBuffer;
use crate::error::DataError;
use crate::types::{ConnectionState, TradeMessage};

/// Streaming connection configuration
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Trade stream URL
    pub url: String,
    /// Delay before the single reconnection attempt scheduled per disconnect
    pub reconnect_delay: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8080/ws/trades".to_string(),
            reconnect_delay: Duration::from_secs(3),
        }
    }
}

impl ConnectionConfig {
    /// Create a new configuration with a custom URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the reconnection delay
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }
}

/// Owns the one logical streaming connection to the trade feed.
///
/// Well-formed trades are stamped with their ingestion time and pushed into
/// the shared buffer as a single step under its lock. Malformed frames are
/// logged and dropped; they never close the connection. The duplicate-socket
/// guard lives on this instance, scoped to its lifetime.
pub struct ConnectionManager {
    config: ConnectionConfig,
    buffer: Arc<Mutex<TradeBuffer>>,
    state_tx: watch::Sender<ConnectionState>,
    state_rx: watch::Receiver<ConnectionState>,
    shutdown_tx: watch::Sender<bool>,
    active: Arc<AtomicBool>,
}

impl ConnectionManager {
    pub fn new(config: ConnectionConfig, buffer: Arc<Mutex<TradeBuffer>>) -> Self {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            config,
            buffer,
            state_tx,
            state_rx,
            shutdown_tx,
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe to connection state transitions.
    pub fn state_rx(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Current state flag.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Whether a stream task currently owns the connection.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Establish the streaming connection unless one is already active.
    ///
    /// A second call while the stream is connecting or connected is a
    /// no-op, so duplicate sockets cannot exist. Never blocks: the
    /// connection runs on its own task.
    pub fn connect(&self) {
        if self.active.swap(true, Ordering::SeqCst) {
            debug!("connect() ignored, stream task already active");
            return;
        }
        let _ = self.shutdown_tx.send(false);

        let config = self.config.clone();
        let buffer = Arc::clone(&self.buffer);
        let state_tx = self.state_tx.clone();
        let shutdown_rx = self.shutdown_tx.subscribe();
        let active = Arc::clone(&self.active);

        tokio::spawn(async move {
            run_stream(config, buffer, state_tx, shutdown_rx).await;
            active.store(false, Ordering::SeqCst);
        });
    }

    /// Stop the stream task. The loop observes the signal between frames
    /// and before each retry. Safe to call when never connected.
    pub fn disconnect(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Connection loop: one attempt per pass, one fixed-delay retry per
/// disconnect, retrying indefinitely.
async fn run_stream(
    config: ConnectionConfig,
    buffer: Arc<Mutex<TradeBuffer>>,
    state_tx: watch::Sender<ConnectionState>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    info!("starting trade stream client for {}", config.url);

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        // The attempt is skipped when the stream was reestablished by
        // another path meanwhile; the state flag decides, not the timer.
        if !state_tx.borrow().is_connected() {
            connect_once(&config, &buffer, &state_tx, &mut shutdown_rx).await;
            // The socket is gone either way: the transport's close path is
            // what decides Disconnected.
            let _ = state_tx.send(ConnectionState::Disconnected);
        }

        if *shutdown_rx.borrow() {
            break;
        }

        debug!("waiting {:?} before reconnecting", config.reconnect_delay);
        tokio::time::sleep(config.reconnect_delay).await;
    }

    let _ = state_tx.send(ConnectionState::Disconnected);
    info!("trade stream client stopped");
}

/// One connection attempt: dial, then drain frames until the socket dies
/// or shutdown is signalled.
async fn connect_once(
    config: &ConnectionConfig,
    buffer: &Arc<Mutex<TradeBuffer>>,
    state_tx: &watch::Sender<ConnectionState>,
    shutdown_rx: &mut watch::Receiver<bool>,
) {
    let _ = state_tx.send(ConnectionState::Connecting);

    let ws_stream = match connect_async(&config.url).await {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => {
            error!("failed to connect to {}: {}", config.url, DataError::from(e));
            let _ = state_tx.send(ConnectionState::Errored);
            return;
        }
    };

    info!("connected to trade stream at {}", config.url);
    let _ = state_tx.send(ConnectionState::Connected);

    // Read half only: this client sends no frames.
    let (_, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            frame = read.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        handle_frame(&text, buffer).await;
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("server closed the trade stream");
                        return;
                    }
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {
                        // Heartbeat - tungstenite answers pings itself
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        // Transport fault. Not itself closure: the caller
                        // still performs the Disconnected transition.
                        error!("{}", DataError::from(e));
                        let _ = state_tx.send(ConnectionState::Errored);
                        return;
                    }
                    None => return,
                }
            }
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    info!("trade stream shutting down");
                    return;
                }
            }
        }
    }
}

/// Parse one text frame into a trade and push it into the buffer.
///
/// A single bad frame must never close the connection: parse failures are
/// logged and the frame is dropped.
async fn handle_frame(text: &str, buffer: &Arc<Mutex<TradeBuffer>>) {
    match serde_json::from_str::<TradeMessage>(text) {
        Ok(message) => {
            let event = message.received(Utc::now());
            buffer.lock().await.push(event);
        }
        Err(e) => {
            warn!("dropping malformed trade frame: {}", DataError::from(e));
            debug!("raw frame: {}", text);
        }
    }
}
