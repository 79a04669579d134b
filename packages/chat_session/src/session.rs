//! One chat session: an identity, its transport, and its heartbeat.
//!
//! The session runs as an actor task. It moves through
//! `Connecting -> Open -> Closed` and never leaves `Closed`; there is no
//! reconnection. Callers talk to it through a cloneable [`SessionHandle`].

use futures::future::BoxFuture;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::codec::{self, Message};
use crate::error::SessionError;
use crate::heartbeat::HeartbeatTimer;
use crate::identity::Identity;
use crate::presentation::{DisplayEvent, PresentationAdapter};
use crate::registry::Eviction;
use crate::transport::{Connector, Transport, TransportEvent};

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8080/websocket";
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(60);

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier for one session instance
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct SessionId(pub u64);

impl SessionId {
    fn next() -> Self {
        Self(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Open,
    Closed,
}

/// Runtime settings shared by every session.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Peer address, e.g. `ws://localhost:8080/websocket`
    pub endpoint: String,
    /// Time between keep-alive frames
    pub heartbeat_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
        }
    }
}

/// Collaborators a session is opened with.
#[derive(Clone)]
pub struct SessionContext {
    pub config: SessionConfig,
    pub connector: Arc<dyn Connector>,
    pub presenter: Arc<dyn PresentationAdapter>,
}

pub(crate) enum SessionCommand {
    SendChat {
        text: String,
        respond_to: oneshot::Sender<Result<(), SessionError>>,
    },
}

/// Handle to communicate with a session actor
#[derive(Clone, Debug)]
pub struct SessionHandle {
    id: SessionId,
    identity: Identity,
    sender: mpsc::Sender<SessionCommand>,
    state: watch::Receiver<SessionState>,
    shutdown: CancellationToken,
}

/// Handles are equal when they address the same session.
impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SessionHandle {}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Send a chat line as this session's identity. Nothing is echoed
    /// locally; the line shows up when the peer relays it back.
    pub async fn send_chat(&self, text: impl Into<String>) -> Result<(), SessionError> {
        match self.state() {
            SessionState::Connecting => return Err(SessionError::NotOpen),
            SessionState::Closed => return Err(SessionError::Closed),
            SessionState::Open => {}
        }

        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::SendChat {
                text: text.into(),
                respond_to: tx,
            })
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    /// Ask the session to tear down. Idempotent.
    pub fn close(&self) {
        self.shutdown.cancel();
    }

    /// Wait until the session has left `Connecting`, returning the new state.
    pub async fn opened(&self) -> SessionState {
        let mut state = self.state.clone();
        match state.wait_for(|s| *s != SessionState::Connecting).await {
            Ok(s) => *s,
            Err(_) => SessionState::Closed,
        }
    }

    /// Wait until the session is `Closed`.
    pub async fn closed(&self) {
        let mut state = self.state.clone();
        let _ = state.wait_for(|s| *s == SessionState::Closed).await;
    }
}

/// The session actor
pub struct Session {
    id: SessionId,
    identity: Identity,
    transport: Option<Transport>,
    heartbeat: HeartbeatTimer,
    presenter: Arc<dyn PresentationAdapter>,
    state: watch::Sender<SessionState>,
    receiver: mpsc::Receiver<SessionCommand>,
    shutdown: CancellationToken,
    eviction: Option<Eviction>,
}

impl Session {
    /// Start connecting `identity` and return a handle right away.
    pub fn open(identity: Identity, ctx: &SessionContext) -> SessionHandle {
        Self::spawn(identity, ctx, None)
    }

    pub(crate) fn spawn(
        identity: Identity,
        ctx: &SessionContext,
        eviction: Option<Eviction>,
    ) -> SessionHandle {
        let id = SessionId::next();
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (state_tx, state_rx) = watch::channel(SessionState::Connecting);
        let shutdown = CancellationToken::new();

        debug!(
            "Opening {} for {} to {}",
            id, identity, ctx.config.endpoint
        );
        let connect = ctx.connector.connect(&ctx.config.endpoint);

        let actor = Self {
            id,
            identity: identity.clone(),
            transport: None,
            heartbeat: HeartbeatTimer::new(ctx.config.heartbeat_interval),
            presenter: ctx.presenter.clone(),
            state: state_tx,
            receiver: msg_rx,
            shutdown: shutdown.clone(),
            eviction,
        };

        tokio::spawn(actor.run(connect));

        SessionHandle {
            id,
            identity,
            sender: msg_tx,
            state: state_rx,
            shutdown,
        }
    }

    async fn run(mut self, connect: BoxFuture<'static, Result<Transport, SessionError>>) {
        let connected = tokio::select! {
            _ = self.shutdown.cancelled() => {
                info!("{} closed while connecting", self.id);
                None
            }
            result = connect => match result {
                Ok(transport) => Some(transport),
                Err(e) => {
                    warn!("{} ({}) could not connect: {}", self.id, self.identity, e);
                    None
                }
            },
        };

        if let Some(transport) = connected {
            match self.establish(transport).await {
                Ok(()) => self.serve().await,
                Err(e) => warn!("{} failed to register: {}", self.id, e),
            }
        }

        self.teardown().await;
    }

    /// Transport is up: register, start the heartbeat, go `Open`. A session
    /// whose Register frame cannot be written never becomes `Open`.
    async fn establish(&mut self, transport: Transport) -> Result<(), SessionError> {
        let register = codec::encode(&Message::Register {
            id: self.identity.clone(),
        });
        transport.send(register).await?;
        self.transport = Some(transport);
        self.heartbeat.arm();
        self.state.send_replace(SessionState::Open);
        info!("{} registered as {}", self.id, self.identity);
        Ok(())
    }

    async fn serve(&mut self) {
        let Some(mut transport) = self.transport.take() else {
            return;
        };

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("{} close requested", self.id);
                    break;
                }
                cmd = self.receiver.recv() => match cmd {
                    Some(SessionCommand::SendChat { text, respond_to }) => {
                        let chat = Message::Chat {
                            sender: self.identity.clone(),
                            text,
                        };
                        let result = transport.send(codec::encode(&chat)).await;
                        let failed = result.is_err();
                        let _ = respond_to.send(result);
                        if failed {
                            break;
                        }
                    }
                    None => {
                        debug!("{} has no handles left", self.id);
                        break;
                    }
                },
                event = transport.recv() => match event {
                    TransportEvent::Frame(frame) => self.handle_frame(&frame),
                    TransportEvent::Closed => {
                        info!("{} transport closed", self.id);
                        break;
                    }
                    TransportEvent::Error(e) => {
                        warn!("{} transport failed: {}", self.id, e);
                        break;
                    }
                },
                _ = self.heartbeat.tick() => {
                    let beat = codec::encode(&Message::Heartbeat {
                        id: self.identity.clone(),
                    });
                    if let Err(e) = transport.send(beat).await {
                        warn!("{} heartbeat failed: {}", self.id, e);
                        break;
                    }
                    debug!("{} heartbeat sent", self.id);
                }
            }
        }

        self.transport = Some(transport);
    }

    fn handle_frame(&self, frame: &str) {
        match codec::decode_inbound(frame) {
            Ok(Message::Chat { sender, text }) => {
                let is_own = sender == self.identity;
                self.presenter.on_display(DisplayEvent {
                    session: self.identity.clone(),
                    sender,
                    text,
                    is_own,
                });
            }
            Ok(other) => {
                debug!("{} ignoring inbound {} frame", self.id, other.kind());
            }
            Err(e) => {
                warn!("{} dropping inbound frame: {} ({})", self.id, e, frame);
            }
        }
    }

    async fn teardown(&mut self) {
        if self.heartbeat.is_armed() {
            debug!("{} stopping heartbeat", self.id);
        }
        self.heartbeat.cancel();
        self.transport = None;

        if let Some(eviction) = self.eviction.take() {
            eviction.evict(&self.identity, self.id).await;
        }

        self.presenter.on_session_closed(&self.identity);
        self.state.send_replace(SessionState::Closed);
        info!("{} for {} closed", self.id, self.identity);
    }
}
