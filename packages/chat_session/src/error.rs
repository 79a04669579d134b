use tokio_tungstenite::tungstenite;

use crate::session::SessionHandle;

/// A single inbound frame could not be turned into a [`crate::Message`].
///
/// Frame errors are local to the frame: the session logs and drops it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
}

/// Connection-level and lifecycle errors for a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The transport could not be established.
    #[error("failed to connect: {0}")]
    Connect(String),

    /// The transport failed after it was established.
    #[error("transport error: {0}")]
    Transport(String),

    /// The session has not finished connecting yet.
    #[error("session is not open")]
    NotOpen,

    /// The session has been torn down.
    #[error("session is closed")]
    Closed,
}

impl SessionError {
    /// Map a failure on an established socket. Handshake failures are
    /// reported as [`SessionError::Connect`] by the connector instead.
    pub fn from_tungstenite(err: tungstenite::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Reasons the registry refuses to create a session. Both are no-ops.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreateError {
    #[error("identity must not be blank")]
    BlankIdentity,

    /// Carries the session already registered under the name.
    #[error("a session for {} already exists", .0.identity())]
    DuplicateIdentity(SessionHandle),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_reset_on_open_socket_is_a_transport_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = tungstenite::Error::Io(io);
        assert!(matches!(
            SessionError::from_tungstenite(err),
            SessionError::Transport(_)
        ));
    }

    #[test]
    fn from_tungstenite_io_other_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let err = tungstenite::Error::Io(io);
        assert!(matches!(
            SessionError::from_tungstenite(err),
            SessionError::Transport(_)
        ));
    }

    #[test]
    fn from_tungstenite_non_io_variant() {
        let err = tungstenite::Error::ConnectionClosed;
        assert!(matches!(
            SessionError::from_tungstenite(err),
            SessionError::Transport(_)
        ));
    }
}
