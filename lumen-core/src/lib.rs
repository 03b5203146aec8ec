pub mod auth;
pub mod config;
pub mod content;
pub mod error;
pub mod password;
pub mod progress;
pub mod roadmap;
pub mod session;

use std::sync::Arc;

use lumen_database::{SessionStore, UserStore};
use lumen_llm::ContentGenerator;

pub use config::Settings;
pub use error::AppError;

/// Dependencies handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    /// `None` when generation is disabled or unconfigured.
    pub llm: Option<Arc<dyn ContentGenerator>>,
    pub settings: Settings,
}

impl AppState {
    pub fn new<S>(store: S, settings: Settings) -> Self
    where
        S: UserStore + SessionStore + 'static,
    {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            sessions: store,
            llm: None,
            settings,
        }
    }

    pub fn with_llm(mut self, llm: Arc<dyn ContentGenerator>) -> Self {
        self.llm = Some(llm);
        self
    }
}
