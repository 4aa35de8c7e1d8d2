//! Reader for the `GET /orders/events` WebSocket.

use api_types::order::OrderChange;
use futures::{SinkExt, StreamExt};
use reqwest::Url;
use tokio::{
    sync::mpsc::{self, error::TryRecvError},
    task::JoinHandle,
};
use tokio_tungstenite::tungstenite::{
    self, Message,
    client::IntoClientRequest,
    http::{HeaderValue, header::AUTHORIZATION},
};

use super::ClientError;

/// Live order changes. Dropping the feed closes the socket.
#[derive(Debug)]
pub struct OrderFeed {
    rx: mpsc::UnboundedReceiver<OrderChange>,
    task: Option<JoinHandle<()>>,
}

impl OrderFeed {
    pub fn try_recv(&mut self) -> Result<OrderChange, TryRecvError> {
        self.rx.try_recv()
    }

    /// A feed fed by hand, with no socket behind it.
    #[cfg(test)]
    pub(crate) fn from_channel(rx: mpsc::UnboundedReceiver<OrderChange>) -> Self {
        Self { rx, task: None }
    }
}

impl Drop for OrderFeed {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Connect in the background and forward every order change to the feed.
/// The feed disconnects when the socket ends or fails.
pub fn subscribe(url: Url, token: String) -> OrderFeed {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(async move {
        match forward(url, token, &tx).await {
            Ok(()) => tracing::debug!("order feed closed"),
            Err(err) => tracing::warn!(%err, "order feed failed"),
        }
    });
    OrderFeed {
        rx,
        task: Some(task),
    }
}

/// `http(s)://` base URLs become `ws(s)://`.
fn socket_url(mut url: Url) -> Result<Url, ClientError> {
    let scheme = match url.scheme() {
        "https" | "wss" => "wss",
        _ => "ws",
    };
    url.set_scheme(scheme)
        .map_err(|()| ClientError::Server(format!("cannot open a socket to {url}")))?;
    Ok(url)
}

async fn forward(
    url: Url,
    token: String,
    tx: &mpsc::UnboundedSender<OrderChange>,
) -> Result<(), ClientError> {
    let mut request = socket_url(url)?.as_str().into_client_request()?;
    let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| ClientError::Unauthorized)?;
    request.headers_mut().insert(AUTHORIZATION, bearer);

    let (socket, _) = match tokio_tungstenite::connect_async(request).await {
        Ok(connected) => connected,
        Err(tungstenite::Error::Http(res)) if res.status().as_u16() == 401 => {
            return Err(ClientError::Unauthorized);
        }
        Err(err) => return Err(err.into()),
    };
    tracing::debug!("order feed connected");
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            _ = tx.closed() => {
                let _ = sink.close().await;
                return Ok(());
            }

            msg = stream.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<OrderChange>(text.as_str()) {
                        Ok(change) => {
                            if tx.send(change).is_err() {
                                return Ok(());
                            }
                        }
                        Err(err) => {
                            tracing::warn!(%err, data = text.as_str(), "unreadable order event");
                        }
                    }
                }
                Some(Ok(Message::Ping(data))) => {
                    let _ = sink.send(Message::Pong(data)).await;
                }
                Some(Ok(Message::Close(_))) | None => return Ok(()),
                Some(Err(err)) => return Err(err.into()),
                // Binary, Pong
                Some(Ok(_)) => {}
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use api_types::order::OrderChangeKind;
    use tokio::net::TcpListener;

    use super::*;

    /// Accepts one socket and hands it to the test.
    async fn fake_feed() -> (
        Url,
        tokio::sync::oneshot::Receiver<tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>>,
    ) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let socket = tokio_tungstenite::accept_async(stream).await.unwrap();
            let _ = tx.send(socket);
        });
        let url = Url::parse(&format!("http://{addr}/orders/events")).unwrap();
        (url, rx)
    }

    async fn recv(feed: &mut OrderFeed) -> Option<OrderChange> {
        tokio::time::timeout(Duration::from_secs(5), feed.rx.recv())
            .await
            .unwrap()
    }

    #[test]
    fn http_urls_become_socket_urls() {
        let url = Url::parse("http://127.0.0.1:3000/orders/events").unwrap();
        assert_eq!(
            socket_url(url).unwrap().as_str(),
            "ws://127.0.0.1:3000/orders/events"
        );
        let url = Url::parse("https://resto.example/orders/events").unwrap();
        assert_eq!(socket_url(url).unwrap().scheme(), "wss");
    }

    #[tokio::test]
    async fn text_frames_become_changes() {
        let (url, server) = fake_feed().await;
        let mut feed = subscribe(url, "t".to_string());
        let mut socket = server.await.unwrap();

        socket.send(Message::Text("nope".into())).await.unwrap();
        socket.send(Message::Ping(Vec::new().into())).await.unwrap();
        socket
            .send(Message::Text(
                r#"{"kind":"insert","order_id":"a1"}"#.into(),
            ))
            .await
            .unwrap();

        assert_eq!(
            recv(&mut feed).await,
            Some(OrderChange {
                kind: OrderChangeKind::Insert,
                order_id: "a1".to_string(),
            })
        );

        socket.close(None).await.unwrap();
        assert_eq!(recv(&mut feed).await, None);
    }

    #[tokio::test]
    async fn dropping_the_feed_closes_the_socket() {
        let (url, server) = fake_feed().await;
        let feed = subscribe(url, "t".to_string());
        let mut socket = server.await.unwrap();

        drop(feed);

        // The server side must see the connection end without sending anything.
        let ended = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                match socket.next().await {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        })
        .await;
        assert!(ended.is_ok(), "socket still open after the feed was dropped");
    }

    #[tokio::test]
    async fn closing_the_receiver_alone_stops_the_task() {
        let (url, server) = fake_feed().await;
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move { forward(url, "t".to_string(), &tx).await });
        let mut socket = server.await.unwrap();

        drop(rx);

        let result = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
        assert!(matches!(
            socket.next().await,
            Some(Ok(Message::Close(_))) | Some(Err(_)) | None
        ));
    }
}
