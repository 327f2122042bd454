//! Server-side session store.
//!
//! Sessions are held in memory and expire after the configured TTL; a
//! restart logs everyone out, which is acceptable for this application.
//! The store also tracks the short-lived CSRF states issued during the
//! OAuth login handshake.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

/// CSRF states are only valid for the duration of one login handshake.
const STATE_TTL: Duration = Duration::from_secs(600);

/// An authenticated member's session.
#[derive(Debug, Clone)]
pub struct Session {
    pub member_id: i64,
    pub member_name: Option<String>,
    created_at: Instant,
}

/// In-memory session and CSRF-state store.
pub struct SessionStore {
    ttl: Duration,
    sessions: DashMap<String, Session>,
    pending_states: DashMap<String, Instant>,
}

impl SessionStore {
    /// Create a store whose sessions expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, sessions: DashMap::new(), pending_states: DashMap::new() }
    }

    /// Create a session for the member and return its cookie token.
    pub fn create(&self, member_id: i64, member_name: Option<String>) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(
            token.clone(),
            Session { member_id, member_name, created_at: Instant::now() },
        );
        token
    }

    /// Look a session up by token, dropping it if it has expired.
    pub fn get(&self, token: &str) -> Option<Session> {
        let session = self.sessions.get(token)?.clone();
        if session.created_at.elapsed() > self.ttl {
            drop(self.sessions.remove(token));
            return None;
        }
        Some(session)
    }

    /// Issue a CSRF state for a new login handshake.
    ///
    /// Purges expired entries first, so repeated login attempts cannot grow
    /// the store without bound.
    pub fn issue_state(&self) -> String {
        self.purge_expired();
        let state = Uuid::new_v4().to_string();
        self.pending_states.insert(state.clone(), Instant::now());
        state
    }

    /// Consume a CSRF state, returning whether it was valid and fresh.
    ///
    /// States are single-use: a second take of the same value fails.
    pub fn take_state(&self, state: &str) -> bool {
        match self.pending_states.remove(state) {
            Some((_, issued_at)) => issued_at.elapsed() <= STATE_TTL,
            None => false,
        }
    }

    /// Drop every expired session and stale handshake state.
    pub fn purge_expired(&self) {
        self.sessions.retain(|_, session| session.created_at.elapsed() <= self.ttl);
        self.pending_states.retain(|_, issued_at| issued_at.elapsed() <= STATE_TTL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_sessions_are_retrievable() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create(7, Some("Ada".into()));

        let session = store.get(&token).expect("session exists");
        assert_eq!(session.member_id, 7);
        assert_eq!(session.member_name.as_deref(), Some("Ada"));

        assert!(store.get("unknown-token").is_none());
    }

    #[test]
    fn expired_sessions_are_dropped_on_lookup() {
        let store = SessionStore::new(Duration::from_millis(10));
        let token = store.create(7, None);

        std::thread::sleep(Duration::from_millis(30));

        assert!(store.get(&token).is_none());
        assert!(store.sessions.is_empty(), "expired entry removed");
    }

    #[test]
    fn states_are_single_use() {
        let store = SessionStore::new(Duration::from_secs(60));
        let state = store.issue_state();

        assert!(store.take_state(&state));
        assert!(!store.take_state(&state), "second take must fail");
        assert!(!store.take_state("never-issued"));
    }

    #[test]
    fn issuing_a_state_purges_expired_sessions() {
        let store = SessionStore::new(Duration::from_millis(10));
        store.create(7, None);

        std::thread::sleep(Duration::from_millis(30));

        let state = store.issue_state();
        assert!(store.sessions.is_empty(), "expired session swept on login");
        assert!(store.take_state(&state), "freshly issued state is valid");
    }

    #[test]
    fn purge_drops_expired_entries() {
        let store = SessionStore::new(Duration::from_millis(10));
        store.create(7, None);
        let fresh_state = store.issue_state();

        std::thread::sleep(Duration::from_millis(30));
        store.purge_expired();

        assert!(store.sessions.is_empty());
        // States expire on their own clock and are still fresh here.
        assert!(store.take_state(&fresh_state));
    }
}
