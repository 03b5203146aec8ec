//! Signup, login, logout and session resolution.

use anyhow::Context as _;
use lumen_database::model::{
    session::SessionRecord,
    user::{MAX_USERNAME_CHARS, User},
};
use lumen_utils::time::{expires_after, now_unix_secs};
use tracing::info;

use crate::{AppState, error::AppError, password, session::SessionToken};

/// A freshly established session for `user`.
#[derive(Debug)]
pub struct SessionGrant {
    pub token: SessionToken,
    pub user: User,
    pub expires_at: u64,
}

pub async fn signup(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<SessionGrant, AppError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(AppError::MissingParameter("username or password"));
    }
    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err(AppError::UsernameTooLong(MAX_USERNAME_CHARS));
    }

    if state.users.find_user_by_username(username).await?.is_some() {
        return Err(AppError::DuplicateUser);
    }

    let password_hash = hash_off_thread(password.to_owned()).await?;

    // The store's conditional insert is the authority on uniqueness.
    let Some(user) = state.users.create_user(username, &password_hash).await? else {
        return Err(AppError::DuplicateUser);
    };

    info!(user_id = user.id, username = %user.username, "user signed up");
    start_session(state, user).await
}

pub async fn login(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<SessionGrant, AppError> {
    if username.is_empty() || password.is_empty() {
        return Err(AppError::InvalidCredentials);
    }

    let Some(user) = state.users.find_user_by_username(username).await? else {
        info!(username, "login rejected");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_off_thread(password.to_owned(), user.password_hash.clone()).await? {
        info!(username, "login rejected");
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = user.id, "user logged in");
    start_session(state, user).await
}

/// Tear down the session behind `token`. Unknown tokens are not an error.
pub async fn logout(state: &AppState, token: &SessionToken) -> Result<(), AppError> {
    if state.sessions.delete_session(&token.digest()).await? {
        info!("session closed");
    }
    Ok(())
}

/// Resolve a token to its user. `None` for unknown, expired, or orphaned sessions.
pub async fn authenticate(
    state: &AppState,
    token: &SessionToken,
) -> Result<Option<User>, AppError> {
    let Some(user_id) = state
        .sessions
        .session_user_id(&token.digest(), now_unix_secs())
        .await?
    else {
        return Ok(None);
    };

    Ok(state.users.find_user(user_id).await?)
}

async fn start_session(state: &AppState, user: User) -> Result<SessionGrant, AppError> {
    let token = SessionToken::generate();
    let created_at = now_unix_secs();
    let expires_at = expires_after(created_at, state.settings.session_ttl);

    state
        .sessions
        .create_session(&SessionRecord {
            token_hash: token.digest(),
            user_id: user.id,
            created_at,
            expires_at,
        })
        .await?;

    Ok(SessionGrant {
        token,
        user,
        expires_at,
    })
}

async fn hash_off_thread(password: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .context("password hashing task failed")?
}

async fn verify_off_thread(password: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .context("password verification task failed")?
}

#[cfg(test)]
mod tests {
    use lumen_database::MemoryStore;

    use super::{authenticate, login, logout, signup};
    use crate::{AppState, Settings, error::AppError};

    fn state() -> (MemoryStore, AppState) {
        let store = MemoryStore::new();
        let state = AppState::new(store.clone(), Settings::default());
        (store, state)
    }

    #[tokio::test]
    async fn signup_creates_user_and_session() {
        let (store, state) = state();
        let grant = signup(&state, "alice", "pw123").await.unwrap();

        assert_eq!(grant.user.username, "alice");
        assert_eq!(grant.user.xp, 0);
        assert_ne!(grant.user.password_hash, "pw123");
        assert_eq!(store.session_count().await, 1);

        let resolved = authenticate(&state, &grant.token).await.unwrap();
        assert_eq!(resolved.map(|user| user.id), Some(grant.user.id));
    }

    #[tokio::test]
    async fn duplicate_signup_creates_nothing() {
        let (store, state) = state();
        signup(&state, "alice", "pw123").await.unwrap();

        let err = signup(&state, "alice", "other").await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateUser));
        assert_eq!(store.user_count().await, 1);
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn signup_requires_both_fields() {
        let (store, state) = state();
        assert!(matches!(
            signup(&state, "  ", "pw").await,
            Err(AppError::MissingParameter(_))
        ));
        assert!(matches!(
            signup(&state, "alice", "").await,
            Err(AppError::MissingParameter(_))
        ));
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn overlong_username_is_rejected_before_insert() {
        let (store, state) = state();
        let name = "a".repeat(151);

        let err = signup(&state, &name, "pw123").await.unwrap_err();
        assert!(matches!(err, AppError::UsernameTooLong(150)));
        assert_eq!(store.user_count().await, 0);

        let exact = "é".repeat(150);
        assert!(signup(&state, &exact, "pw123").await.is_ok());
    }

    #[tokio::test]
    async fn wrong_password_never_opens_a_session() {
        let (store, state) = state();
        signup(&state, "alice", "pw123").await.unwrap();

        let err = login(&state, "alice", "nope").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_look_the_same() {
        let (_store, state) = state();
        signup(&state, "alice", "pw123").await.unwrap();

        let unknown = login(&state, "mallory", "pw123").await.unwrap_err();
        let wrong = login(&state, "alice", "bad").await.unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn login_then_logout() {
        let (store, state) = state();
        signup(&state, "alice", "pw123").await.unwrap();

        let grant = login(&state, "alice", "pw123").await.unwrap();
        assert_eq!(store.session_count().await, 2);
        assert!(authenticate(&state, &grant.token).await.unwrap().is_some());

        logout(&state, &grant.token).await.unwrap();
        assert!(authenticate(&state, &grant.token).await.unwrap().is_none());

        // A second logout is a no-op.
        logout(&state, &grant.token).await.unwrap();
    }
}
