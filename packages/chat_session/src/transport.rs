//! Message-oriented transport seam.
//!
//! A [`Connector`] turns an endpoint into a [`Transport`]: a pair of channels
//! carrying outbound text frames and inbound [`TransportEvent`]s. The
//! WebSocket implementation runs one pump task per connection; dropping the
//! outbound sender closes the socket.

use futures::future::BoxFuture;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};

use crate::error::SessionError;

const OUTBOUND_CAPACITY: usize = 64;
const INBOUND_CAPACITY: usize = 256;

/// Something that happened on the far side of a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// One inbound text frame, in delivery order.
    Frame(String),
    /// The peer closed the connection.
    Closed,
    /// The connection failed.
    Error(SessionError),
}

/// An established connection, owned by exactly one session.
pub struct Transport {
    outbound: mpsc::Sender<String>,
    inbound: mpsc::Receiver<TransportEvent>,
}

impl Transport {
    pub fn new(outbound: mpsc::Sender<String>, inbound: mpsc::Receiver<TransportEvent>) -> Self {
        Self { outbound, inbound }
    }

    /// Queue one text frame for the peer.
    pub async fn send(&self, frame: String) -> Result<(), SessionError> {
        self.outbound
            .send(frame)
            .await
            .map_err(|_| SessionError::Transport("connection is gone".into()))
    }

    /// Next inbound event. A vanished pump reads as [`TransportEvent::Closed`].
    pub async fn recv(&mut self) -> TransportEvent {
        self.inbound.recv().await.unwrap_or(TransportEvent::Closed)
    }
}

/// Opens transports to a peer endpoint.
pub trait Connector: Send + Sync + 'static {
    fn connect(&self, endpoint: &str) -> BoxFuture<'static, Result<Transport, SessionError>>;
}

/// WebSocket connector backed by tokio-tungstenite.
#[derive(Clone, Copy, Debug, Default)]
pub struct WsConnector;

impl Connector for WsConnector {
    fn connect(&self, endpoint: &str) -> BoxFuture<'static, Result<Transport, SessionError>> {
        let url = endpoint.to_string();
        Box::pin(async move {
            let (ws_stream, _) = tokio_tungstenite::connect_async(url.as_str())
                .await
                .map_err(|e| SessionError::Connect(e.to_string()))?;
            info!("WebSocket connected to {}", url);
            Ok(spawn_ws_pump(ws_stream))
        })
    }
}

/// Drive an established WebSocket on a background task.
pub fn spawn_ws_pump<S>(ws_stream: WebSocketStream<S>) -> Transport
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(OUTBOUND_CAPACITY);
    let (inbound_tx, inbound_rx) = mpsc::channel::<TransportEvent>(INBOUND_CAPACITY);

    tokio::spawn(async move {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                frame = outbound_rx.recv() => match frame {
                    Some(text) => {
                        if let Err(e) = ws_write.send(WsMessage::Text(text.into())).await {
                            warn!("WebSocket send failed: {}", e);
                            let _ = inbound_tx
                                .send(TransportEvent::Error(SessionError::from_tungstenite(e)))
                                .await;
                            break;
                        }
                    }
                    None => {
                        debug!("Session released its transport, closing socket");
                        let _ = ws_write.send(WsMessage::Close(None)).await;
                        break;
                    }
                },
                msg = ws_read.next() => match msg {
                    Some(Ok(WsMessage::Text(text))) => {
                        if inbound_tx.send(TransportEvent::Frame(text.as_str().to_owned())).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) | None => {
                        info!("WebSocket closed by peer");
                        let _ = inbound_tx.send(TransportEvent::Closed).await;
                        break;
                    }
                    Some(Ok(_)) => {
                        // Binary frames and control frames carry nothing for us
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        let _ = inbound_tx
                            .send(TransportEvent::Error(SessionError::from_tungstenite(e)))
                            .await;
                        break;
                    }
                },
            }
        }

        debug!("WebSocket pump exiting");
    });

    Transport::new(outbound_tx, inbound_rx)
}
