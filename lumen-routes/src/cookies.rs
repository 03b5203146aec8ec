use axum::http::{HeaderMap, header::COOKIE};
use lumen_core::session::SessionToken;

pub const SESSION_COOKIE: &str = "lumen_session";

/// First value of cookie `name` across all `Cookie` headers.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

pub fn session_token(headers: &HeaderMap) -> Option<SessionToken> {
    read_cookie(headers, SESSION_COOKIE).and_then(SessionToken::parse)
}

pub fn session_cookie(token: &SessionToken, max_age_secs: u64, secure: bool) -> String {
    build_cookie(token.as_str(), max_age_secs, secure)
}

pub fn clear_session_cookie(secure: bool) -> String {
    build_cookie("", 0, secure)
}

fn build_cookie(value: &str, max_age_secs: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
