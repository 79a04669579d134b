//! Scripted transport for driving sessions from tests.

use futures::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use crate::codec::{self, Message};
use crate::error::SessionError;
use crate::presentation::{ChannelPresenter, PresenterEvent};
use crate::session::{SessionConfig, SessionContext};
use crate::transport::{Connector, Transport, TransportEvent};

/// A connect call the test has not answered yet.
pub(crate) struct PendingConnection {
    pub endpoint: String,
    respond_to: oneshot::Sender<Result<Transport, SessionError>>,
}

impl PendingConnection {
    /// Acknowledge the connection and return the peer's end of it.
    pub fn establish(self) -> RemotePeer {
        let (outbound_tx, outbound_rx) = mpsc::channel(64);
        let (inbound_tx, inbound_rx) = mpsc::channel(64);
        let _ = self
            .respond_to
            .send(Ok(Transport::new(outbound_tx, inbound_rx)));
        RemotePeer {
            outbound: outbound_rx,
            inbound: inbound_tx,
        }
    }

    /// Acknowledge with a transport whose write side is already gone.
    pub fn establish_unwritable(self) {
        let (outbound_tx, outbound_rx) = mpsc::channel(1);
        let (_inbound_tx, inbound_rx) = mpsc::channel(1);
        drop(outbound_rx);
        let _ = self
            .respond_to
            .send(Ok(Transport::new(outbound_tx, inbound_rx)));
    }

    pub fn fail(self, reason: &str) {
        let _ = self
            .respond_to
            .send(Err(SessionError::Connect(reason.to_string())));
    }
}

/// The far side of a scripted transport.
pub(crate) struct RemotePeer {
    outbound: mpsc::Receiver<String>,
    inbound: mpsc::Sender<TransportEvent>,
}

impl RemotePeer {
    /// Next frame the session wrote, or `None` once the session dropped
    /// its transport.
    pub async fn next_raw(&mut self) -> Option<String> {
        self.outbound.recv().await
    }

    pub async fn next_message(&mut self) -> Message {
        let frame = self.next_raw().await.expect("transport closed");
        codec::decode(&frame).expect("session wrote a malformed frame")
    }

    /// A frame that is already queued, without waiting.
    pub fn try_next(&mut self) -> Option<String> {
        self.outbound.try_recv().ok()
    }

    pub async fn deliver(&self, msg: &Message) {
        self.deliver_raw(&codec::encode(msg)).await;
    }

    pub async fn deliver_raw(&self, frame: &str) {
        self.inbound
            .send(TransportEvent::Frame(frame.to_string()))
            .await
            .expect("session dropped its transport");
    }

    pub async fn close(&self) {
        let _ = self.inbound.send(TransportEvent::Closed).await;
    }

    pub async fn fail(&self, reason: &str) {
        let _ = self
            .inbound
            .send(TransportEvent::Error(SessionError::Transport(
                reason.to_string(),
            )))
            .await;
    }
}

/// Connector whose connections are answered by the test.
pub(crate) struct ScriptedConnector {
    pending: mpsc::UnboundedSender<PendingConnection>,
}

impl ScriptedConnector {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<PendingConnection>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { pending: tx }), rx)
    }
}

impl Connector for ScriptedConnector {
    fn connect(&self, endpoint: &str) -> BoxFuture<'static, Result<Transport, SessionError>> {
        let (tx, rx) = oneshot::channel();
        let _ = self.pending.send(PendingConnection {
            endpoint: endpoint.to_string(),
            respond_to: tx,
        });
        Box::pin(async move {
            rx.await
                .unwrap_or_else(|_| Err(SessionError::Connect("test dropped connection".into())))
        })
    }
}

pub(crate) struct Harness {
    pub context: SessionContext,
    pub pending: mpsc::UnboundedReceiver<PendingConnection>,
    pub events: mpsc::UnboundedReceiver<PresenterEvent>,
}

pub(crate) fn harness() -> Harness {
    let (connector, pending) = ScriptedConnector::new();
    let (presenter, events) = ChannelPresenter::new();
    Harness {
        context: SessionContext {
            config: SessionConfig::default(),
            connector,
            presenter: Arc::new(presenter),
        },
        pending,
        events,
    }
}

/// Drain presenter events that are already queued.
pub(crate) fn drain(events: &mut mpsc::UnboundedReceiver<PresenterEvent>) -> Vec<PresenterEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

/// Let spawned tasks run until they park.
pub(crate) async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
