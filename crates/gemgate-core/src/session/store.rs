//! Process-wide session store.
//!
//! `SessionStore` maps a caller-supplied identifier to a [`Session`]. The map
//! itself is a `DashMap`, so lookups for distinct ids never contend. Each
//! session's history sits behind its own async mutex: holding a
//! [`SessionGuard`] grants the only right to append to that history, which
//! gives at most one in-flight mutation per id while other ids proceed in
//! parallel.
//!
//! Sessions are created lazily and never removed for the process lifetime.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use gemgate_types::chat::Turn;
use gemgate_types::error::SessionError;

/// Shared handle to one conversation history.
///
/// Cloning produces another handle to the same history.
#[derive(Debug, Clone)]
pub struct Session {
    id: Arc<str>,
    turns: Arc<Mutex<Vec<Turn>>>,
}

impl Session {
    fn new(id: &str) -> Self {
        Self {
            id: Arc::from(id),
            turns: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Acquire exclusive access to the history.
    ///
    /// Waits while another request for the same id holds the guard.
    pub async fn lock(&self) -> SessionGuard<'_> {
        SessionGuard {
            id: &self.id,
            turns: self.turns.lock().await,
        }
    }

    /// Whether both handles point at the same history.
    pub fn same_as(&self, other: &Session) -> bool {
        Arc::ptr_eq(&self.turns, &other.turns)
    }
}

/// Exclusive access to a session's history.
///
/// Existing turns are read-only; the only mutation is [`SessionGuard::append`].
pub struct SessionGuard<'a> {
    id: &'a str,
    turns: MutexGuard<'a, Vec<Turn>>,
}

impl SessionGuard<'_> {
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Append a turn to the end of the history.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyTurn`] if the turn has no parts.
    pub fn append(&mut self, turn: Turn) -> Result<(), SessionError> {
        if turn.parts.is_empty() {
            return Err(SessionError::EmptyTurn);
        }
        debug!(session_id = %self.id, role = %turn.role, parts = turn.parts.len(), "Appending turn");
        self.turns.push(turn);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Registry of all sessions, keyed by caller-supplied id.
///
/// Cloning produces a shared view of the same registry.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the session for `id`, registering an empty one if absent.
    ///
    /// The returned handle is cloned out of the map so no `DashMap` guard is
    /// held by the caller.
    pub fn get_or_create(&self, id: &str) -> Session {
        self.sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                debug!(session_id = %id, "Creating session");
                Session::new(id)
            })
            .value()
            .clone()
    }

    /// Append a turn to the session for `id`, creating it if needed.
    pub async fn append(&self, id: &str, turn: Turn) -> Result<(), SessionError> {
        let session = self.get_or_create(id);
        let mut guard = session.lock().await;
        guard.append(turn)
    }

    /// Copy of the history for `id`, or `None` if no such session exists.
    pub async fn snapshot(&self, id: &str) -> Option<Vec<Turn>> {
        let session = self.sessions.get(id).map(|r| r.value().clone())?;
        let guard = session.lock().await;
        Some(guard.turns().to_vec())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemgate_types::chat::{Part, Role};
    use std::time::Duration;

    fn user(text: &str) -> Turn {
        Turn::user(vec![Part::text(text)])
    }

    #[test]
    fn get_or_create_registers_once() {
        let store = SessionStore::new();
        assert!(!store.contains("alice"));

        let a = store.get_or_create("alice");
        let b = store.get_or_create("alice");

        assert_eq!(store.len(), 1);
        assert_eq!(a.id(), "alice");
        assert!(a.same_as(&b));
    }

    #[tokio::test]
    async fn same_id_shares_history() {
        let store = SessionStore::new();
        let a = store.get_or_create("alice");
        a.lock().await.append(user("hi")).unwrap();

        let b = store.get_or_create("alice");
        let guard = b.lock().await;
        assert_eq!(guard.len(), 1);
        assert_eq!(guard.turns()[0].parts, vec![Part::text("hi")]);
    }

    #[tokio::test]
    async fn append_preserves_order() {
        let store = SessionStore::new();
        store.append("s", user("one")).await.unwrap();
        store.append("s", Turn::model_text("two")).await.unwrap();
        store.append("s", user("three")).await.unwrap();

        let history = store.snapshot("s").await.unwrap();
        let roles: Vec<Role> = history.iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Model, Role::User]);
        assert_eq!(history[2].parts[0].as_text(), Some("three"));
    }

    #[tokio::test]
    async fn empty_turn_is_rejected() {
        let store = SessionStore::new();
        let err = store.append("s", Turn::user(vec![])).await.unwrap_err();
        assert!(matches!(err, SessionError::EmptyTurn));
        assert_eq!(store.snapshot("s").await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn snapshot_of_unknown_id_is_none() {
        let store = SessionStore::new();
        assert!(store.snapshot("nobody").await.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn distinct_ids_are_isolated() {
        let store = SessionStore::new();
        store.append("a", user("for a")).await.unwrap();
        store.append("b", user("for b")).await.unwrap();

        let a = store.snapshot("a").await.unwrap();
        let b = store.snapshot("b").await.unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!(a[0].parts[0].as_text(), Some("for a"));
        assert_eq!(b[0].parts[0].as_text(), Some("for b"));
    }

    #[tokio::test]
    async fn guard_blocks_same_id_but_not_others() {
        let store = SessionStore::new();
        let held = store.get_or_create("busy");
        let guard = held.lock().await;

        // A different id is not blocked by the held guard.
        tokio::time::timeout(Duration::from_millis(100), store.append("free", user("x")))
            .await
            .expect("other id must not wait")
            .unwrap();

        // The same id waits until the guard is released.
        let blocked =
            tokio::time::timeout(Duration::from_millis(50), store.append("busy", user("y"))).await;
        assert!(blocked.is_err());

        drop(guard);
        store.append("busy", user("z")).await.unwrap();
        assert_eq!(store.snapshot("busy").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_appends_are_not_lost() {
        let store = SessionStore::new();
        let mut handles = Vec::new();

        for i in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append("shared", user(&format!("msg-{i}"))).await.unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot("shared").await.unwrap().len(), 50);
    }
}
