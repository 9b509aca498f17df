//! In-memory session store.
//!
//! Each user agent holds an opaque token cookie; the store maps the token to its
//! [`SessionState`]. Sessions idle longer than the TTL are dropped on access and
//! by [`SessionStore::cleanup`]. Concurrent requests on one session are
//! last-write-wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::SessionState;

#[derive(Debug)]
struct Entry {
    state: SessionState,
    expires_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: Arc<Mutex<HashMap<Uuid, Entry>>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// State for `token`, or `None` if the token is unknown or expired.
    pub fn load(&self, token: Uuid) -> Option<SessionState> {
        self.load_at(token, Utc::now())
    }

    pub fn load_at(&self, token: Uuid, now: DateTime<Utc>) -> Option<SessionState> {
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        let expired = match sessions.get(&token) {
            Some(entry) if entry.expires_at > now => return Some(entry.state.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            tracing::debug!("Session {} expired", token);
            sessions.remove(&token);
        }
        None
    }

    /// Persist `state` and push the session's expiry out by the TTL.
    pub fn save(&self, token: Uuid, state: SessionState) {
        self.save_at(token, state, Utc::now());
    }

    pub fn save_at(&self, token: Uuid, state: SessionState, now: DateTime<Utc>) {
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        sessions.insert(
            token,
            Entry {
                state,
                expires_at: now
                    .checked_add_signed(self.ttl)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            },
        );
    }

    /// Drop expired sessions. Run periodically to bound memory.
    pub fn cleanup(&self) -> usize {
        self.cleanup_at(Utc::now())
    }

    pub fn cleanup_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        let before = sessions.len();
        sessions.retain(|_, entry| entry.expires_at > now);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().expect("session lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_for(survey: &str) -> SessionState {
        SessionState {
            current_survey_id: Some(survey.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn unknown_token_has_no_state() {
        let store = SessionStore::new(Duration::minutes(30));
        assert!(store.load(Uuid::new_v4()).is_none());
    }

    #[test]
    fn saved_state_round_trips() {
        let store = SessionStore::new(Duration::minutes(30));
        let token = Uuid::new_v4();
        store.save(token, state_for("mood"));

        assert_eq!(store.load(token), Some(state_for("mood")));
    }

    #[test]
    fn sessions_are_isolated_per_token() {
        let store = SessionStore::new(Duration::minutes(30));
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.save(a, state_for("mood"));
        store.save(b, state_for("weather"));

        assert_eq!(store.load(a), Some(state_for("mood")));
        assert_eq!(store.load(b), Some(state_for("weather")));
    }

    #[test]
    fn expired_session_is_discarded_on_load() {
        let store = SessionStore::new(Duration::minutes(30));
        let token = Uuid::new_v4();
        let now = Utc::now();
        store.save_at(token, state_for("mood"), now);

        assert!(store.load_at(token, now + Duration::minutes(31)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn huge_ttl_saturates_instead_of_overflowing() {
        let store = SessionStore::new(Duration::seconds(i64::MAX / 1000));
        let token = Uuid::new_v4();
        store.save(token, state_for("mood"));

        assert_eq!(store.load(token), Some(state_for("mood")));
    }

    #[test]
    fn cleanup_removes_only_expired_sessions() {
        let store = SessionStore::new(Duration::minutes(30));
        let now = Utc::now();
        store.save_at(Uuid::new_v4(), state_for("old"), now - Duration::minutes(40));
        store.save_at(Uuid::new_v4(), state_for("new"), now);

        assert_eq!(store.cleanup_at(now), 1);
        assert_eq!(store.len(), 1);
    }
}
