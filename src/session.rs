//! Per-user conversation context and the process-lifetime store that owns it.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::conversation::ConversationState;
use crate::registry::ProviderRecord;
use crate::search::SearchField;

/// Opaque per-user identity handed in by the transport layer.
pub type UserId = i64;

/// Mutable per-user conversation context.
///
/// Created on first interaction, reset on return to the root menu, dropped
/// with the process. Never shared between users.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub state: ConversationState,
    pub selected_category: Option<String>,
    pub selected_specialization: Option<String>,
    pub search_field: Option<SearchField>,
    /// Ephemeral (id, specialization) menu entries, valid only for the
    /// currently selected category. Regenerated on every category choice.
    pub specialization_map: Vec<(String, String)>,
    pub results: Vec<ProviderRecord>,
    pub result_offset: usize,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: ConversationState::AwaitingCategory,
            selected_category: None,
            selected_specialization: None,
            search_field: None,
            specialization_map: Vec::new(),
            results: Vec::new(),
            result_offset: 0,
            started_at: Utc::now(),
        }
    }

    /// Drops every selection and cached result, returning the session to
    /// the category menu.
    pub fn reset(&mut self) {
        let started_at = self.started_at;
        *self = Session::new();
        self.started_at = started_at;
    }

    pub fn clear_results(&mut self) {
        self.results.clear();
        self.result_offset = 0;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-lifetime store of sessions keyed by user identity.
///
/// The store lock is held while an event is applied, so events for the same
/// user are applied one at a time and a session mutation is observed either
/// fully or not at all.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<UserId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `f` against the user's session, creating an empty one on first
    /// access.
    pub fn with_session<R>(&self, user_id: UserId, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.entry(user_id).or_insert_with(|| {
            debug!("Created session for user {}", user_id);
            Session::new()
        });
        f(session)
    }

    /// Drops the user's session entirely; the next event starts fresh.
    pub fn remove(&self, user_id: UserId) {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.remove(&user_id).is_some() {
            debug!("Removed session for user {}", user_id);
        }
    }

    pub fn reset(&self, user_id: UserId) {
        self.with_session(user_id, |session| session.reset());
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_access_creates_empty_session() {
        let store = SessionStore::new();
        assert!(store.is_empty());

        let state = store.with_session(7, |session| session.state);
        assert_eq!(state, ConversationState::AwaitingCategory);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_sessions_are_isolated_per_user() {
        let store = SessionStore::new();
        store.with_session(1, |session| {
            session.selected_category = Some("دكتور".to_string());
        });

        let other = store.with_session(2, |session| session.selected_category.clone());
        assert_eq!(other, None);

        let first = store.with_session(1, |session| session.selected_category.clone());
        assert_eq!(first, Some("دكتور".to_string()));
    }

    #[test]
    fn test_reset_clears_selections_and_results() {
        let store = SessionStore::new();
        store.with_session(1, |session| {
            session.state = ConversationState::AwaitingSearchMode;
            session.selected_category = Some("دكتور".to_string());
            session.result_offset = 20;
        });

        store.reset(1);
        store.with_session(1, |session| {
            assert_eq!(session.state, ConversationState::AwaitingCategory);
            assert_eq!(session.selected_category, None);
            assert_eq!(session.result_offset, 0);
        });
    }

    #[test]
    fn test_remove_then_recreate() {
        let store = SessionStore::new();
        store.with_session(1, |session| {
            session.selected_category = Some("مختبر".to_string());
        });

        store.remove(1);
        assert!(store.is_empty());

        let category = store.with_session(1, |session| session.selected_category.clone());
        assert_eq!(category, None);
    }
}
