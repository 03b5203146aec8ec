use anyhow::Context as _;
use tracing::warn;

use crate::cache::{CacheService, SESSION_CACHE_TTL, session_key};
use crate::database::Database;
use crate::model::session::{CachedSession, SessionRecord};

pub async fn insert_session(db: &Database, session: &SessionRecord) -> anyhow::Result<()> {
    let user_id_i64 = i64::try_from(session.user_id).context("user_id out of i64 range")?;
    let created_at_i64 =
        i64::try_from(session.created_at).context("created_at out of i64 range")?;
    let expires_at_i64 =
        i64::try_from(session.expires_at).context("expires_at out of i64 range")?;

    sqlx::query(
        "INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(&session.token_hash)
    .bind(user_id_i64)
    .bind(created_at_i64)
    .bind(expires_at_i64)
    .execute(db.pool())
    .await?;

    Ok(())
}

/// Resolve a session digest to its user id, or `None` when unknown or expired.
pub async fn get_session_user_id(
    db: &Database,
    token_hash: &str,
    now: u64,
) -> anyhow::Result<Option<u64>> {
    let cache_key = session_key(db.cache(), token_hash);

    let cached = match db.cache().get_json::<CachedSession>(&cache_key).await {
        Ok(cached) => cached,
        Err(e) => {
            warn!(?e, cache_key, "cache get failed; falling back to database");
            None
        }
    };

    let session = match cached {
        Some(session) => Some(session),
        None => {
            let loaded = load_session(db, token_hash).await?;
            if let Some(session) = &loaded {
                if let Err(e) = db
                    .cache()
                    .set_json(&cache_key, session, SESSION_CACHE_TTL)
                    .await
                {
                    warn!(?e, cache_key, "cache set failed; returning database value");
                }
            }
            loaded
        }
    };

    match session {
        Some(session) if session.expires_at > now => Ok(Some(session.user_id)),
        Some(_) => {
            delete_session(db, token_hash).await?;
            Ok(None)
        }
        None => Ok(None),
    }
}

/// Delete a session. Returns `true` if a row was removed.
pub async fn delete_session(db: &Database, token_hash: &str) -> anyhow::Result<bool> {
    let deleted = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
        .bind(token_hash)
        .execute(db.pool())
        .await?
        .rows_affected();

    evict_cached_session(db.cache(), token_hash).await;

    Ok(deleted > 0)
}

/// Drop the cached copy of a session. Failures are logged; a stale entry lives
/// at most `SESSION_CACHE_TTL`.
pub async fn evict_cached_session(cache: &CacheService, token_hash: &str) {
    let cache_key = session_key(cache, token_hash);
    if let Err(e) = cache.del(&cache_key).await {
        warn!(?e, cache_key, "cache delete failed; entry will expire on its own");
    }
}

/// Remove every session that expired at or before `now`.
pub async fn purge_expired_sessions(db: &Database, now: u64) -> anyhow::Result<u64> {
    let now_i64 = i64::try_from(now).context("now out of i64 range")?;

    let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
        .bind(now_i64)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(deleted)
}

async fn load_session(db: &Database, token_hash: &str) -> anyhow::Result<Option<CachedSession>> {
    let row = sqlx::query_as::<_, (i64, i64)>(
        "SELECT user_id, expires_at FROM sessions WHERE token_hash = $1",
    )
    .bind(token_hash)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_cached_session).transpose()
}

fn to_cached_session((user_id, expires_at): (i64, i64)) -> anyhow::Result<CachedSession> {
    Ok(CachedSession {
        user_id: u64::try_from(user_id).context("user_id row out of u64 range")?,
        expires_at: u64::try_from(expires_at).context("expires_at row out of u64 range")?,
    })
}

#[cfg(test)]
mod tests {
    use crate::cache::{CacheService, session_key};

    use super::evict_cached_session;

    #[tokio::test]
    async fn eviction_tolerates_unreachable_cache() {
        let cache = CacheService::redis("redis://127.0.0.1:1/", "lumen:test").unwrap();
        let key = session_key(&cache, "deadbeef");
        assert!(cache.del(&key).await.is_err());

        evict_cached_session(&cache, "deadbeef").await;
    }

    #[tokio::test]
    async fn eviction_on_disabled_cache_is_silent() {
        let cache = CacheService::disabled("lumen:test");
        evict_cached_session(&cache, "deadbeef").await;
    }
}
