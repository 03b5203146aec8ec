use std::time::{Duration, SystemTime};

/// Seconds since the unix epoch, or 0 if the clock is set before it.
pub fn now_unix_secs() -> u64 {
    SystemTime::UNIX_EPOCH
        .elapsed()
        .map_or(0, |elapsed| elapsed.as_secs())
}

/// Unix timestamp `ttl` after `from`, saturating instead of wrapping.
pub fn expires_after(from: u64, ttl: Duration) -> u64 {
    from.saturating_add(ttl.as_secs())
}
