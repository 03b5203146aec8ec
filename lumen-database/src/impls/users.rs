use anyhow::Context as _;
use sqlx::types::Json;

use lumen_utils::time::now_unix_secs;

use crate::{database::Database, model::user::User};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    xp: i64,
    streak: i64,
    completed_nodes: Json<Vec<String>>,
}

/// Insert a user with zero progress. Returns `None` if the username is taken.
pub async fn create_user(
    db: &Database,
    username: &str,
    password_hash: &str,
) -> anyhow::Result<Option<User>> {
    let created_at = i64::try_from(now_unix_secs()).context("created_at out of i64 range")?;

    let row: Option<UserRow> = sqlx::query_as(
        "INSERT INTO users (username, password_hash, created_at)
         VALUES ($1, $2, $3)
         ON CONFLICT (username) DO NOTHING
         RETURNING id, username, password_hash, xp, streak, completed_nodes",
    )
    .bind(username)
    .bind(password_hash)
    .bind(created_at)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_user).transpose()
}

pub async fn get_user(db: &Database, user_id: u64) -> anyhow::Result<Option<User>> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;

    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, username, password_hash, xp, streak, completed_nodes
         FROM users
         WHERE id = $1",
    )
    .bind(user_id_i64)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_user).transpose()
}

pub async fn get_user_by_username(db: &Database, username: &str) -> anyhow::Result<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, username, password_hash, xp, streak, completed_nodes
         FROM users
         WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_user).transpose()
}

fn to_user(row: UserRow) -> anyhow::Result<User> {
    Ok(User {
        id: u64::try_from(row.id).context("id row out of u64 range")?,
        username: row.username,
        password_hash: row.password_hash,
        xp: row.xp,
        streak: row.streak,
        completed_nodes: row.completed_nodes.0,
    })
}
