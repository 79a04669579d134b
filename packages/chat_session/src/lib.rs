//! Chat Session - connection and protocol core for a multi-session chat client
//!
//! Every session pairs one [`Identity`] with one transport connection and one
//! heartbeat timer. The [`SessionRegistry`] keeps at most one session per
//! identity and evicts sessions when their transport closes. Rendering is left
//! to a [`PresentationAdapter`] supplied by the embedding application.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chat_session::{ChannelPresenter, SessionConfig, SessionRegistry, WsConnector};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (presenter, mut events) = ChannelPresenter::new();
//!     let registry = SessionRegistry::new(
//!         SessionConfig::default(),
//!         Arc::new(WsConnector),
//!         Arc::new(presenter),
//!     );
//!
//!     let alice = registry.create_session("alice").await.unwrap();
//!     alice.opened().await;
//!     alice.send_chat("hello everyone").await.unwrap();
//!
//!     while let Some(event) = events.recv().await {
//!         println!("{:?}", event);
//!     }
//! }
//! ```

pub mod codec;
pub mod color;
mod error;
mod heartbeat;
mod identity;
pub mod presentation;
mod registry;
mod session;
#[cfg(test)]
mod test_helpers;
pub mod transport;

pub use codec::{Message, decode, decode_inbound, encode};
pub use color::{Hsl, color_of};
pub use error::{CreateError, DecodeError, SessionError};
pub use identity::Identity;
pub use presentation::{ChannelPresenter, DisplayEvent, PresentationAdapter, PresenterEvent};
pub use registry::SessionRegistry;
pub use session::{
    DEFAULT_ENDPOINT, DEFAULT_HEARTBEAT_INTERVAL, Session, SessionConfig, SessionContext,
    SessionHandle, SessionId, SessionState,
};
pub use transport::{Connector, Transport, TransportEvent, WsConnector};
