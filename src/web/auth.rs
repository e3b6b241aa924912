use std::borrow::Cow;

use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    api::{LoginRequest, RegisterRequest},
    policy::{self, View},
    web::{
        AppState,
        flash::{Flash, flash_from_status},
        guard,
        responses::upstream_status,
        templates::{PageLayout, escape_html, render_page},
    },
};

const LOGIN_FAILED_MESSAGE: &str = "Login failed";
const REGISTER_FAILED_MESSAGE: &str = "Registration failed. Please try again.";

/// Query string carrying the `status` code of the redirect that led here.
#[derive(Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<StatusQuery>,
) -> Result<Html<String>, Redirect> {
    guard::require(&state, jar, View::Login)?;
    let flash = flash_from_status(params.status.as_deref());
    Ok(Html(render_login_page("", &flash)))
}

pub async fn process_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), (StatusCode, Html<String>)> {
    let email = form.email.trim().to_string();
    let request = LoginRequest {
        email: email.clone(),
        password: form.password,
    };

    let response = match state.api().login(&request).await {
        Ok(response) => response,
        Err(err) => {
            let flash = Flash::error(err.user_message(LOGIN_FAILED_MESSAGE));
            return Err((upstream_status(&err), Html(render_login_page(&email, &flash))));
        }
    };

    let role = response.user.role;
    let mut store = guard::restore_session(&state, jar);
    if let Err(err) = store.login(response.user, response.access_token) {
        warn!(?err, "backend login response could not be stored");
        let flash = Flash::error(LOGIN_FAILED_MESSAGE);
        return Err((StatusCode::BAD_GATEWAY, Html(render_login_page(&email, &flash))));
    }

    info!(role = role.as_str(), "user signed in");
    let target = policy::post_login_path(role);
    Ok((store.into_storage().into_jar(), Redirect::to(target)))
}

pub async fn register_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, Redirect> {
    guard::require(&state, jar, View::Register)?;
    Ok(Html(render_register_page("", "", &Flash::None)))
}

pub async fn process_register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, (StatusCode, Html<String>)> {
    let name = form.name.trim().to_string();
    let email = form.email.trim().to_string();
    let request = RegisterRequest {
        name: name.clone(),
        email: email.clone(),
        password: form.password,
    };

    match state.api().register(&request).await {
        Ok(_) => {
            info!("account registered");
            Ok(Redirect::to("/login?status=registered"))
        }
        Err(err) => {
            let flash = Flash::error(err.user_message(REGISTER_FAILED_MESSAGE));
            Err((
                upstream_status(&err),
                Html(render_register_page(&name, &email, &flash)),
            ))
        }
    }
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let mut store = guard::restore_session(&state, jar);
    store.logout();
    (
        store.into_storage().into_jar(),
        Redirect::to("/login?status=logged_out"),
    )
}

pub fn render_login_page(email: &str, flash: &Flash) -> String {
    let body = format!(
        r#"        <section class="panel">
            <h2>Login</h2>
            <form method="post" action="/login">
                <label for="email">Email</label>
                <input id="email" type="email" name="email" value="{email}" required>
                <label for="password">Password</label>
                <input id="password" type="password" name="password" required>
                <div class="form-actions"><button type="submit">Login</button></div>
            </form>
            <p><a href="/register">Don't have an account? Register</a></p>
        </section>"#,
        email = escape_html(email),
    );

    render_page(PageLayout {
        meta_title: "Login",
        page_heading: "Certificate Desk",
        user: None,
        nav_links: Vec::new(),
        flash_html: Cow::Owned(flash.render()),
        body_html: Cow::Owned(body),
    })
}

pub fn render_register_page(name: &str, email: &str, flash: &Flash) -> String {
    let body = format!(
        r#"        <section class="panel">
            <h2>Create Account</h2>
            <form method="post" action="/register">
                <label for="name">Full Name</label>
                <input id="name" type="text" name="name" value="{name}" required>
                <label for="email">Email Address</label>
                <input id="email" type="email" name="email" value="{email}" required>
                <label for="password">Password</label>
                <input id="password" type="password" name="password" required>
                <div class="form-actions"><button type="submit">Register</button></div>
            </form>
            <p><a href="/login">Already have an account? <strong>Login</strong></a></p>
        </section>"#,
        name = escape_html(name),
        email = escape_html(email),
    );

    render_page(PageLayout {
        meta_title: "Register",
        page_heading: "Certificate Desk",
        user: None,
        nav_links: Vec::new(),
        flash_html: Cow::Owned(flash.render()),
        body_html: Cow::Owned(body),
    })
}
