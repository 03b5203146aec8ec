pub mod progress;
pub mod sessions;
pub mod users;
