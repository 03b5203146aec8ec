use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::model::{progress::CompletionRecord, session::SessionRecord, user::User};
use crate::store::{SessionStore, UserStore};

#[derive(Debug, Default)]
struct MemoryState {
    next_user_id: u64,
    users: BTreeMap<u64, User>,
    sessions: HashMap<String, SessionRecord>,
}

/// In-process store used when no `DATABASE_URL` is configured, and by tests.
///
/// Every operation runs under one lock, so check-and-write sequences are atomic.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.state.lock().await.users.len()
    }

    pub async fn session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> anyhow::Result<Option<User>> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|user| user.username == username) {
            return Ok(None);
        }

        state.next_user_id += 1;
        let user = User {
            id: state.next_user_id,
            username: username.to_owned(),
            password_hash: password_hash.to_owned(),
            xp: 0,
            streak: 1,
            completed_nodes: Vec::new(),
        };
        state.users.insert(user.id, user.clone());

        Ok(Some(user))
    }

    async fn find_user(&self, user_id: u64) -> anyhow::Result<Option<User>> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .state
            .lock()
            .await
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn complete_node(
        &self,
        user_id: u64,
        node_id: &str,
        award: i64,
    ) -> anyhow::Result<CompletionRecord> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| anyhow::anyhow!("user {user_id} not found"))?;

        if user.has_completed(node_id) {
            return Ok(CompletionRecord {
                added: false,
                xp: user.xp,
            });
        }

        user.completed_nodes.push(node_id.to_owned());
        user.xp += award;

        Ok(CompletionRecord {
            added: true,
            xp: user.xp,
        })
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self, session: &SessionRecord) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        if state.sessions.contains_key(&session.token_hash) {
            anyhow::bail!("session digest collision");
        }
        state
            .sessions
            .insert(session.token_hash.clone(), session.clone());
        Ok(())
    }

    async fn session_user_id(&self, token_hash: &str, now: u64) -> anyhow::Result<Option<u64>> {
        let mut state = self.state.lock().await;
        let found = state
            .sessions
            .get(token_hash)
            .map(|session| (session.user_id, session.is_live(now)));

        match found {
            Some((user_id, true)) => Ok(Some(user_id)),
            Some((_, false)) => {
                state.sessions.remove(token_hash);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete_session(&self, token_hash: &str) -> anyhow::Result<bool> {
        Ok(self.state.lock().await.sessions.remove(token_hash).is_some())
    }
}
