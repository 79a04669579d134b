//! Display events and the sink that renders them.

use tokio::sync::mpsc;

use crate::color::Hsl;
use crate::identity::Identity;

/// A chat line for one session's window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayEvent {
    /// The session whose window shows the line.
    pub session: Identity,
    pub sender: Identity,
    pub text: String,
    /// True when `sender` is the session's own identity.
    pub is_own: bool,
}

/// Rendering layer the core pushes into. Calls arrive from session tasks.
pub trait PresentationAdapter: Send + Sync + 'static {
    fn on_display(&self, event: DisplayEvent);

    fn on_session_created(&self, identity: &Identity, color_of: fn(&str) -> Hsl);

    fn on_session_closed(&self, _identity: &Identity) {}
}

/// Everything a [`ChannelPresenter`] forwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresenterEvent {
    Display(DisplayEvent),
    SessionCreated { identity: Identity, color: Hsl },
    SessionClosed { identity: Identity },
}

/// Adapter that forwards events to a channel, for consumers that prefer to
/// render from their own task.
pub struct ChannelPresenter {
    tx: mpsc::UnboundedSender<PresenterEvent>,
}

impl ChannelPresenter {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PresenterEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl PresentationAdapter for ChannelPresenter {
    fn on_display(&self, event: DisplayEvent) {
        let _ = self.tx.send(PresenterEvent::Display(event));
    }

    fn on_session_created(&self, identity: &Identity, color_of: fn(&str) -> Hsl) {
        let _ = self.tx.send(PresenterEvent::SessionCreated {
            identity: identity.clone(),
            color: color_of(identity.as_str()),
        });
    }

    fn on_session_closed(&self, identity: &Identity) {
        let _ = self.tx.send(PresenterEvent::SessionClosed {
            identity: identity.clone(),
        });
    }
}
