/// Experience granted the first time a user completes a node.
pub const NODE_COMPLETION_XP: i64 = 50;

/// Outcome of a single completion attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletionRecord {
    /// `false` when the node was already in the user's completed set.
    pub added: bool,
    pub xp: i64,
}
