use anyhow::Context as _;

use crate::{database::Database, model::progress::CompletionRecord};

/// Add `node_id` to the user's completed set and grant `award` xp, once.
///
/// The membership check and the write happen in one conditional `UPDATE`, so two
/// concurrent completions of the same node cannot both award xp.
pub async fn complete_node(
    db: &Database,
    user_id: u64,
    node_id: &str,
    award: i64,
) -> anyhow::Result<CompletionRecord> {
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;

    let awarded: Option<i64> = sqlx::query_scalar(
        "UPDATE users
         SET completed_nodes = completed_nodes || jsonb_build_array($2::text),
             xp = xp + $3
         WHERE id = $1
           AND NOT (completed_nodes @> jsonb_build_array($2::text))
         RETURNING xp",
    )
    .bind(user_id_i64)
    .bind(node_id)
    .bind(award)
    .fetch_optional(db.pool())
    .await?;

    if let Some(xp) = awarded {
        return Ok(CompletionRecord { added: true, xp });
    }

    let xp: Option<i64> = sqlx::query_scalar("SELECT xp FROM users WHERE id = $1")
        .bind(user_id_i64)
        .fetch_optional(db.pool())
        .await?;
    let xp = xp.with_context(|| format!("user {user_id} not found"))?;

    Ok(CompletionRecord { added: false, xp })
}
