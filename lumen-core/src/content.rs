use lumen_llm::{GenerationError, GenerationMode, generate_explanation};
use tracing::warn;

use crate::{AppState, error::AppError};

/// Generate an explanation of `node_title` in the requested `mode`.
///
/// Provider failures come back as `AppError::Generation` carrying the
/// provider's text.
pub async fn generate(
    state: &AppState,
    node_title: Option<&str>,
    mode: Option<&str>,
) -> Result<String, AppError> {
    let (Some(topic), Some(mode)) = (non_empty(node_title), non_empty(mode)) else {
        return Err(AppError::MissingParameter("node_title or mode"));
    };
    let mode: GenerationMode = mode.parse()?;

    let Some(llm) = state.llm.as_deref() else {
        return Err(GenerationError::Disabled.into());
    };

    generate_explanation(llm, topic, mode).await.map_err(|err| {
        warn!(%err, topic, %mode, "content generation failed");
        AppError::Generation(err)
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
