//! Storage seams used by request handlers.
//!
//! `Database` (PostgreSQL) and `MemoryStore` both implement these traits, so the
//! web layer only ever sees `Arc<dyn UserStore>` / `Arc<dyn SessionStore>`.

use async_trait::async_trait;

use crate::database::Database;
use crate::impls::{progress, sessions, users};
use crate::model::{progress::CompletionRecord, session::SessionRecord, user::User};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user with zero progress. Returns `None` if the username is taken.
    async fn create_user(&self, username: &str, password_hash: &str)
    -> anyhow::Result<Option<User>>;

    async fn find_user(&self, user_id: u64) -> anyhow::Result<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;

    /// Atomically add `node_id` to the completed set, granting `award` xp only if
    /// it was not already a member.
    async fn complete_node(
        &self,
        user_id: u64,
        node_id: &str,
        award: i64,
    ) -> anyhow::Result<CompletionRecord>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, session: &SessionRecord) -> anyhow::Result<()>;

    /// Owner of a live session, `None` for unknown or expired digests.
    async fn session_user_id(&self, token_hash: &str, now: u64) -> anyhow::Result<Option<u64>>;

    /// Returns `true` if a session was removed.
    async fn delete_session(&self, token_hash: &str) -> anyhow::Result<bool>;
}

#[async_trait]
impl UserStore for Database {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> anyhow::Result<Option<User>> {
        users::create_user(self, username, password_hash).await
    }

    async fn find_user(&self, user_id: u64) -> anyhow::Result<Option<User>> {
        users::get_user(self, user_id).await
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        users::get_user_by_username(self, username).await
    }

    async fn complete_node(
        &self,
        user_id: u64,
        node_id: &str,
        award: i64,
    ) -> anyhow::Result<CompletionRecord> {
        progress::complete_node(self, user_id, node_id, award).await
    }
}

#[async_trait]
impl SessionStore for Database {
    async fn create_session(&self, session: &SessionRecord) -> anyhow::Result<()> {
        sessions::insert_session(self, session).await
    }

    async fn session_user_id(&self, token_hash: &str, now: u64) -> anyhow::Result<Option<u64>> {
        sessions::get_session_user_id(self, token_hash, now).await
    }

    async fn delete_session(&self, token_hash: &str) -> anyhow::Result<bool> {
        sessions::delete_session(self, token_hash).await
    }
}
