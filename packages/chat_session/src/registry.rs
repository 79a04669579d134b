use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::color::color_of;
use crate::error::CreateError;
use crate::identity::Identity;
use crate::presentation::PresentationAdapter;
use crate::session::{Session, SessionConfig, SessionContext, SessionHandle, SessionId};
use crate::transport::Connector;

type SessionTable = HashMap<Identity, SessionHandle>;

/// Lets a tearing-down session take itself out of the table.
pub(crate) struct Eviction {
    sessions: Weak<RwLock<SessionTable>>,
}

impl Eviction {
    /// Remove `identity` only while it still maps to session `id`, so a stale
    /// session never evicts a newer one for the same name.
    pub(crate) async fn evict(self, identity: &Identity, id: SessionId) {
        let Some(sessions) = self.sessions.upgrade() else {
            return;
        };
        let mut sessions = sessions.write().await;
        if sessions.get(identity).is_some_and(|h| h.id() == id) {
            sessions.remove(identity);
            debug!("Evicted {} ({})", identity, id);
        }
    }
}

/// Table of live sessions, at most one per identity
pub struct SessionRegistry {
    sessions: Arc<RwLock<SessionTable>>,
    context: SessionContext,
}

impl SessionRegistry {
    pub fn new(
        config: SessionConfig,
        connector: Arc<dyn Connector>,
        presenter: Arc<dyn PresentationAdapter>,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            context: SessionContext {
                config,
                connector,
                presenter,
            },
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.context.config
    }

    /// Open a session for `identity` unless the name is blank or taken. A
    /// taken name is rejected with the session that already holds it.
    ///
    /// The existence check and the insert happen under one write guard, so
    /// of any number of concurrent calls for one name exactly one succeeds.
    pub async fn create_session(&self, identity: &str) -> Result<SessionHandle, CreateError> {
        let identity = Identity::new(identity).ok_or(CreateError::BlankIdentity)?;

        let mut sessions = self.sessions.write().await;
        if let Some(existing) = sessions.get(&identity) {
            debug!("Session for {} already exists ({})", identity, existing.id());
            return Err(CreateError::DuplicateIdentity(existing.clone()));
        }

        self.context
            .presenter
            .on_session_created(&identity, color_of);

        let eviction = Eviction {
            sessions: Arc::downgrade(&self.sessions),
        };
        let handle = Session::spawn(identity.clone(), &self.context, Some(eviction));
        sessions.insert(identity, handle.clone());

        info!("Created {} for {}", handle.id(), handle.identity());
        Ok(handle)
    }

    pub async fn get(&self, identity: &str) -> Option<SessionHandle> {
        self.sessions.read().await.get(identity).cloned()
    }

    /// Drop `identity` from the table and close its session. Absent names
    /// are a no-op. Returns whether anything was removed.
    pub async fn remove(&self, identity: &str) -> bool {
        let removed = self.sessions.write().await.remove(identity);
        match removed {
            Some(handle) => {
                info!("Removing {} for {}", handle.id(), identity);
                handle.close();
                true
            }
            None => false,
        }
    }

    /// Identities with a live session, sorted.
    pub async fn identities(&self) -> Vec<Identity> {
        let mut ids: Vec<Identity> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Close every session and wait for each to finish tearing down.
    pub async fn close_all(&self) {
        let handles: Vec<SessionHandle> = self.sessions.write().await.drain().map(|(_, h)| h).collect();
        for handle in &handles {
            handle.close();
        }
        for handle in &handles {
            handle.closed().await;
        }
    }
}
