use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRecord {
    /// Hex SHA-256 digest of the cookie token. The raw token is never stored.
    pub token_hash: String,
    pub user_id: u64,
    pub created_at: u64,
    pub expires_at: u64,
}

impl SessionRecord {
    pub fn is_live(&self, now: u64) -> bool {
        self.expires_at > now
    }
}

/// Session lookup payload kept in the cache.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CachedSession {
    pub user_id: u64,
    pub expires_at: u64,
}
