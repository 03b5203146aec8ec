use lumen_database::model::{
    progress::{CompletionRecord, NODE_COMPLETION_XP},
    user::User,
};
use tracing::info;

use crate::{AppState, error::AppError, roadmap};

pub const XP_ADDED_MESSAGE: &str = "XP Added!";
pub const ALREADY_COMPLETED_MESSAGE: &str = "Already completed.";

pub fn completion_message(record: &CompletionRecord) -> &'static str {
    if record.added {
        XP_ADDED_MESSAGE
    } else {
        ALREADY_COMPLETED_MESSAGE
    }
}

/// Mark `node_id` complete for `user`, awarding xp the first time only.
///
/// Ids are accepted as-is unless `strict_node_ids` is set, in which case ids
/// absent from the catalog are rejected before any write.
pub async fn complete_node(
    state: &AppState,
    user: &User,
    node_id: Option<&str>,
) -> Result<CompletionRecord, AppError> {
    let node_id = node_id
        .filter(|id| !id.is_empty())
        .ok_or(AppError::MissingParameter("node_id"))?;

    if state.settings.strict_node_ids && roadmap::find_node(node_id).is_none() {
        return Err(AppError::UnknownNode(node_id.to_owned()));
    }

    let record = state
        .users
        .complete_node(user.id, node_id, NODE_COMPLETION_XP)
        .await?;

    if record.added {
        info!(user_id = user.id, node_id, xp = record.xp, "node completed");
    }

    Ok(record)
}
