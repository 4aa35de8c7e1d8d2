//! Realtime order change feed.
//!
//! Every write to the orders table is published on a broadcast channel and
//! pushed to the staff dashboards over a WebSocket, one JSON text frame per
//! change.

use std::time::Duration;

use api_types::order::{OrderChange, OrderChangeKind};
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use crate::server::ServerState;

const BROADCAST_CAPACITY: usize = 256;
const PING_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct OrderEvents {
    tx: broadcast::Sender<OrderChange>,
}

impl Default for OrderEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, kind: OrderChangeKind, order_id: &str) {
        let change = OrderChange {
            kind,
            order_id: order_id.to_string(),
        };
        // No subscribers is fine.
        let _ = self.tx.send(change);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OrderChange> {
        self.tx.subscribe()
    }
}

fn frame_for(change: &OrderChange) -> Option<Message> {
    match serde_json::to_string(change) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(err) => {
            tracing::error!("failed to encode order event: {err}");
            None
        }
    }
}

/// `GET /orders/events`
pub async fn stream(State(state): State<ServerState>, ws: WebSocketUpgrade) -> Response {
    // Subscribe before the upgrade so nothing published during the handshake is lost.
    let rx = state.events.subscribe();
    ws.on_upgrade(move |socket| forward(socket, rx))
}

async fn forward(socket: WebSocket, mut rx: broadcast::Receiver<OrderChange>) {
    tracing::debug!("order feed subscriber connected");
    let (mut sink, mut incoming) = socket.split();

    let mut ping = tokio::time::interval(PING_INTERVAL);
    ping.tick().await;

    loop {
        tokio::select! {
            change = rx.recv() => match change {
                Ok(change) => {
                    let Some(frame) = frame_for(&change) else {
                        continue;
                    };
                    if sink.send(frame).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "order feed subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    let _ = sink.close().await;
                    break;
                }
            },

            _ = ping.tick() => {
                if sink.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
            }

            msg = incoming.next() => match msg {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(err)) => {
                    tracing::debug!("order feed socket error: {err}");
                    break;
                }
                // Pings are answered by axum; clients send nothing else.
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::debug!("order feed subscriber disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_changes() {
        let events = OrderEvents::new();
        let mut a = events.subscribe();
        let mut b = events.subscribe();

        events.publish(OrderChangeKind::Insert, "o-1");

        let expected = OrderChange {
            kind: OrderChangeKind::Insert,
            order_id: "o-1".to_string(),
        };
        assert_eq!(a.recv().await.unwrap(), expected);
        assert_eq!(b.recv().await.unwrap(), expected);
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let events = OrderEvents::new();
        events.publish(OrderChangeKind::Delete, "gone");
    }

    #[test]
    fn changes_are_framed_as_json_text() {
        let change = OrderChange {
            kind: OrderChangeKind::Update,
            order_id: "o-7".to_string(),
        };
        let Some(Message::Text(text)) = frame_for(&change) else {
            panic!("expected a text frame");
        };
        assert_eq!(
            text.as_str(),
            r#"{"kind":"update","order_id":"o-7"}"#
        );
    }
}
