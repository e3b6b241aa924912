use axum::response::Redirect;
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::{
    api::User,
    policy::{self, AccessLevel, LOGIN_PATH, View},
    session::SessionStore,
    web::{AppState, cookies::CookieStore},
};

pub type CookieSession = SessionStore<CookieStore>;

pub fn restore_session(state: &AppState, jar: CookieJar) -> CookieSession {
    SessionStore::restore(CookieStore::new(jar, state.cookie_settings()))
}

/// Restore the visitor's session and check it may mount `view`.
pub fn require(state: &AppState, jar: CookieJar, view: View) -> Result<CookieSession, Redirect> {
    let store = restore_session(state, jar);
    let level = AccessLevel::of(store.session());

    if let Err(target) = policy::authorize(level, view) {
        debug!(view = view.path(), redirect = target, "view not permitted; redirecting");
        return Err(Redirect::to(target));
    }

    Ok(store)
}

/// Like [`require`] for views that need a signed-in user, returning that user.
pub fn require_user(
    state: &AppState,
    jar: CookieJar,
    view: View,
) -> Result<(CookieSession, User), Redirect> {
    let store = require(state, jar, view)?;
    let user = store
        .session()
        .user()
        .cloned()
        .ok_or_else(|| Redirect::to(LOGIN_PATH))?;
    Ok((store, user))
}
