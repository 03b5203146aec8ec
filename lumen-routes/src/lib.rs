pub mod api;
pub mod cookies;
pub mod error;
pub mod health;
pub mod pages;
pub mod session;
pub mod views;

#[cfg(test)]
mod tests;

use axum::{
    Router,
    routing::{get, post},
};
use lumen_core::AppState;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub struct RouteMeta {
    pub method: &'static str,
    pub path: &'static str,
    pub desc: &'static str,
    pub requires_session: bool,
}

pub const ROUTES: &[RouteMeta] = &[
    RouteMeta {
        method: "GET",
        path: "/",
        desc: "Roadmap with progress and explanation panel",
        requires_session: true,
    },
    RouteMeta {
        method: "GET",
        path: "/login",
        desc: "Login form",
        requires_session: false,
    },
    RouteMeta {
        method: "POST",
        path: "/login",
        desc: "Verify credentials and start a session",
        requires_session: false,
    },
    RouteMeta {
        method: "GET",
        path: "/signup",
        desc: "Signup form",
        requires_session: false,
    },
    RouteMeta {
        method: "POST",
        path: "/signup",
        desc: "Create an account and start a session",
        requires_session: false,
    },
    RouteMeta {
        method: "GET",
        path: "/logout",
        desc: "End the current session",
        requires_session: false,
    },
    RouteMeta {
        method: "POST",
        path: "/api/generate",
        desc: "Generate an explanation for a topic",
        requires_session: true,
    },
    RouteMeta {
        method: "POST",
        path: "/api/complete_node",
        desc: "Mark a roadmap node complete",
        requires_session: true,
    },
    RouteMeta {
        method: "GET",
        path: "/api/roadmap",
        desc: "Roadmap annotated with the caller's progress",
        requires_session: true,
    },
    RouteMeta {
        method: "GET",
        path: "/healthz",
        desc: "Liveness probe",
        requires_session: false,
    },
];

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/login", get(pages::login_form).post(pages::login_submit))
        .route("/signup", get(pages::signup_form).post(pages::signup_submit))
        .route("/logout", get(pages::logout))
        .route("/api/generate", post(api::generate))
        .route("/api/complete_node", post(api::complete_node))
        .route("/api/roadmap", get(api::roadmap))
        .route("/healthz", get(health::healthz))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
