/// Matches the `users.username` column width.
pub const MAX_USERNAME_CHARS: usize = 150;

/// A registered learner and their roadmap progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password_hash: String,
    pub xp: i64,
    pub streak: i64,
    /// Completed node ids in completion order. Never contains duplicates.
    pub completed_nodes: Vec<String>,
}

impl User {
    pub fn has_completed(&self, node_id: &str) -> bool {
        self.completed_nodes.iter().any(|completed| completed == node_id)
    }
}
