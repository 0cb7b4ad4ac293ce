//! Live performance stream over WebSocket.
//!
//! [`PerformanceFeed::run`] keeps one connection open, forwards decoded
//! events to a channel and reconnects after [`RECONNECT_DELAY`] whenever
//! the socket drops. It only returns when cancelled or when the receiver
//! goes away.

use crate::error::ApiError;
use eduassist_core::config::ClientConfig;
use eduassist_core::performance::{PerformanceEvent, RECONNECT_DELAY, performance_ws_path};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

/// Why a single connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    Closed,
    Cancelled,
    ReceiverGone,
}

#[derive(Debug, Clone)]
pub struct PerformanceFeed {
    url: String,
    reconnect_delay: Duration,
}

impl PerformanceFeed {
    pub fn new(config: &ClientConfig, educator_id: &str) -> Self {
        Self {
            url: config.ws_endpoint(&performance_ws_path(educator_id)),
            reconnect_delay: RECONNECT_DELAY,
        }
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn run(self, events: mpsc::Sender<PerformanceEvent>, cancel: CancellationToken) {
        tracing::info!("[PerformanceFeed] Connecting to {}", self.url);
        loop {
            match self.session(&events, &cancel).await {
                Ok(SessionEnd::Cancelled) => {
                    tracing::info!("[PerformanceFeed] Cancelled");
                    return;
                }
                Ok(SessionEnd::ReceiverGone) => {
                    tracing::debug!("[PerformanceFeed] Receiver dropped, stopping");
                    return;
                }
                Ok(SessionEnd::Closed) => {
                    tracing::info!("[PerformanceFeed] Connection closed by server");
                }
                Err(e) => {
                    tracing::warn!("[PerformanceFeed] {}", e);
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(self.reconnect_delay) => {
                    tracing::debug!("[PerformanceFeed] Reconnecting");
                }
            }
        }
    }

    async fn session(
        &self,
        events: &mpsc::Sender<PerformanceEvent>,
        cancel: &CancellationToken,
    ) -> Result<SessionEnd, ApiError> {
        let (mut stream, _) = tokio::select! {
            _ = cancel.cancelled() => return Ok(SessionEnd::Cancelled),
            connected = connect_async(self.url.as_str()) => {
                connected.map_err(|e| ApiError::Network(e.to_string()))?
            }
        };
        tracing::debug!("[PerformanceFeed] Connected");

        loop {
            let frame = tokio::select! {
                _ = cancel.cancelled() => {
                    let _ = stream.close(None).await;
                    return Ok(SessionEnd::Cancelled);
                }
                frame = stream.next() => frame,
            };

            match frame {
                Some(Ok(Message::Text(text))) => match PerformanceEvent::decode(&text) {
                    Ok(event) => {
                        tracing::debug!("[PerformanceFeed] {}", event.kind());
                        if events.send(event).await.is_err() {
                            return Ok(SessionEnd::ReceiverGone);
                        }
                    }
                    Err(e) => tracing::warn!("[PerformanceFeed] Ignoring frame: {}", e),
                },
                Some(Ok(Message::Close(_))) | None => return Ok(SessionEnd::Closed),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(ApiError::Network(e.to_string())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_url_follows_base_scheme() {
        let feed = PerformanceFeed::new(&ClientConfig::new("https://edu.example.org/"), "42");
        assert_eq!(feed.url(), "wss://edu.example.org/ws/performance/42");
        assert_eq!(feed.reconnect_delay, RECONNECT_DELAY);
    }

    #[tokio::test]
    async fn test_cancelled_feed_stops_without_connecting() {
        let feed = PerformanceFeed::new(&ClientConfig::new("http://127.0.0.1:9"), "1")
            .with_reconnect_delay(Duration::from_millis(10));
        let (tx, _rx) = mpsc::channel(4);
        let cancel = CancellationToken::new();
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), feed.run(tx, cancel))
            .await
            .unwrap();
    }
}
