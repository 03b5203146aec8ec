use std::time::Duration;

use lumen_utils::env::{env_bool, env_string_or, env_u64};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Runtime settings read once at startup.
#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_addr: String,
    pub session_ttl: Duration,
    /// Mark the session cookie `Secure` (serve over TLS when enabled).
    pub secure_cookies: bool,
    /// Reject completion of node ids that are not in the roadmap catalog.
    pub strict_node_ids: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            session_ttl: DEFAULT_SESSION_TTL,
            secure_cookies: false,
            strict_node_ids: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_string_or("LUMEN_BIND", DEFAULT_BIND_ADDR),
            session_ttl: Duration::from_secs(
                env_u64("SESSION_TTL_SECONDS", DEFAULT_SESSION_TTL.as_secs()).max(60),
            ),
            secure_cookies: env_bool("SESSION_COOKIE_SECURE", false),
            strict_node_ids: env_bool("STRICT_NODE_IDS", false),
        }
    }
}
