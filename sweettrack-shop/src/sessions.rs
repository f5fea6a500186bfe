//! In-memory admin sessions
//!
//! Tokens are random UUIDs handed out on a successful passphrase login.
//! Sessions do not survive a restart.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone)]
pub struct SessionStore {
    ttl: Duration,
    sessions: Arc<RwLock<HashMap<Uuid, Instant>>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Start a new session, dropping any that have expired
    pub async fn create(&self) -> Uuid {
        let token = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, issued| issued.elapsed() < self.ttl);
        sessions.insert(token, Instant::now());
        token
    }

    /// Whether the token names a live session; expired tokens are removed
    pub async fn validate(&self, token: &Uuid) -> bool {
        let issued = self.sessions.read().await.get(token).copied();
        match issued {
            Some(issued) if issued.elapsed() < self.ttl => true,
            Some(_) => {
                self.sessions.write().await.remove(token);
                false
            }
            None => false,
        }
    }

    /// End a session; returns false when the token was unknown
    pub async fn revoke(&self, token: &Uuid) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    pub async fn active_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.values().filter(|issued| issued.elapsed() < self.ttl).count()
    }
}
