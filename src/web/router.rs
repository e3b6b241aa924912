use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    policy::{self, AccessLevel, RouteDecision},
    web::{AppState, admin, auth, dashboard, guard, upload},
};

const ROBOTS_TXT_BODY: &str = include_str!("../../robots.txt");

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes();

    Router::new()
        .route("/", get(auth::login_page))
        .route("/login", get(auth::login_page).post(auth::process_login))
        .route(
            "/register",
            get(auth::register_page).post(auth::process_register),
        )
        .route("/logout", post(auth::logout))
        .route("/healthz", get(healthz))
        .route("/robots.txt", get(robots_txt))
        .route("/dashboard", get(dashboard::dashboard))
        .route(
            "/upload",
            get(upload::upload_page).post(upload::process_upload),
        )
        .route("/admin-dashboard", get(admin::dashboard))
        .route("/admin-dashboard/review", post(admin::record_decision))
        .route(
            "/verify-certificate",
            get(admin::verify_page).post(admin::verify_decision),
        )
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Unknown paths land on the visitor's home view.
async fn fallback(State(state): State<AppState>, jar: CookieJar, uri: Uri) -> Response {
    let store = guard::restore_session(&state, jar);
    match policy::resolve_path(AccessLevel::of(store.session()), uri.path()) {
        RouteDecision::Redirect(target) => Redirect::to(target).into_response(),
        // Every known view has a route of its own.
        RouteDecision::Render(view) => Redirect::to(view.path()).into_response(),
    }
}

async fn robots_txt() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        ROBOTS_TXT_BODY,
    )
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}
