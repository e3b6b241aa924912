use std::borrow::Cow;

use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, warn};

use crate::{
    api::{ApiResult, Certificate, ReviewDecision, User},
    policy::{ADMIN_HOME_PATH, View},
    review::{self, NOT_FOUND_MESSAGE},
    web::{
        AppState,
        certificates::{render_error_state, status_badge, view_link},
        flash::Flash,
        guard::{self, CookieSession},
        responses::upstream_status,
        templates::{NavLink, PageLayout, escape_html, format_timestamp, render_page},
    },
};

use super::{
    INVALID_DECISION_MESSAGE,
    dashboard::{render_owner, render_review_actions},
    types::{DecisionForm, VerifyQuery},
};

const VERIFY_ACTION: &str = "/verify-certificate";
const SEARCH_FAILED_MESSAGE: &str = "Server error while searching.";
const UPDATE_FAILED_MESSAGE: &str = "Failed to update status.";

/// Result of looking a single certificate up by identifier.
#[derive(Debug)]
pub enum LookupState {
    Idle,
    Found(Certificate),
    NotFound,
    Failed(String),
}

impl LookupState {
    fn from_lookup(result: ApiResult<Option<Certificate>>) -> Self {
        match result {
            Ok(Some(certificate)) => LookupState::Found(certificate),
            Ok(None) => LookupState::NotFound,
            Err(err) => {
                warn!(error = %err, "certificate lookup failed");
                LookupState::Failed(SEARCH_FAILED_MESSAGE.to_string())
            }
        }
    }
}

pub async fn verify_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<VerifyQuery>,
) -> Result<Html<String>, Redirect> {
    let (store, user) = guard::require_user(&state, jar, View::VerifyCertificate)?;

    let id = params.id.unwrap_or_default().trim().to_string();
    let lookup = if id.is_empty() {
        LookupState::Idle
    } else {
        run_lookup(&state, &store, &id).await
    };

    Ok(Html(render_verify_page(&user, &id, &lookup, &Flash::None)))
}

/// Record a verdict from the lookup page and show the refreshed record.
pub async fn verify_decision(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<DecisionForm>,
) -> Result<(StatusCode, Html<String>), Redirect> {
    let (store, user) = guard::require_user(&state, jar, View::VerifyCertificate)?;
    let id = form.certificate_id.trim().to_string();

    if id.is_empty() {
        warn!("verification submitted without a certificate id");
        let flash = Flash::error(NOT_FOUND_MESSAGE);
        return Ok((
            StatusCode::BAD_REQUEST,
            Html(render_verify_page(&user, "", &LookupState::Idle, &flash)),
        ));
    }

    let Some(decision) = ReviewDecision::parse(&form.status) else {
        let lookup = run_lookup(&state, &store, &id).await;
        let flash = Flash::error(INVALID_DECISION_MESSAGE);
        return Ok((
            StatusCode::BAD_REQUEST,
            Html(render_verify_page(&user, &id, &lookup, &flash)),
        ));
    };

    match review::decide_and_refresh(state.api(), store.session(), &id, decision).await {
        Ok(outcome) => {
            let lookup = match (&outcome.certificates, outcome.find(&id)) {
                (_, Some(certificate)) => LookupState::Found(certificate.clone()),
                (Ok(_), None) => LookupState::NotFound,
                (Err(_), None) => LookupState::Failed(SEARCH_FAILED_MESSAGE.to_string()),
            };
            let flash = Flash::success(outcome.message);
            Ok((
                StatusCode::OK,
                Html(render_verify_page(&user, &id, &lookup, &flash)),
            ))
        }
        Err(err) => {
            error!(certificate_id = %id, error = %err, "failed to update certificate status");
            let flash = Flash::error(err.user_message(UPDATE_FAILED_MESSAGE));
            let lookup = run_lookup(&state, &store, &id).await;
            Ok((
                upstream_status(&err),
                Html(render_verify_page(&user, &id, &lookup, &flash)),
            ))
        }
    }
}

async fn run_lookup(state: &AppState, store: &CookieSession, id: &str) -> LookupState {
    if id.is_empty() {
        return LookupState::Idle;
    }
    LookupState::from_lookup(review::lookup(state.api(), store.session(), id).await)
}

pub fn render_verify_page(admin: &User, id: &str, lookup: &LookupState, flash: &Flash) -> String {
    let result_html = match lookup {
        LookupState::Idle => String::new(),
        LookupState::NotFound => render_error_state(NOT_FOUND_MESSAGE),
        LookupState::Failed(message) => render_error_state(message),
        LookupState::Found(certificate) => render_detail(certificate),
    };

    let body = format!(
        r#"        <section class="panel">
            <h2>Find Certificate</h2>
            <form method="get" action="{VERIFY_ACTION}">
                <label for="id">Certificate ID</label>
                <input id="id" type="text" name="id" value="{id}" placeholder="Enter certificate ID">
                <div class="form-actions"><button type="submit">Search</button></div>
            </form>
        </section>
        {result_html}"#,
        id = escape_html(id),
    );

    render_page(PageLayout {
        meta_title: "Verify Certificate",
        page_heading: "Verify Certificate",
        user: Some(admin),
        nav_links: vec![NavLink {
            href: ADMIN_HOME_PATH,
            label: "Admin dashboard",
        }],
        flash_html: Cow::Owned(flash.render()),
        body_html: Cow::Owned(body),
    })
}

fn render_detail(cert: &Certificate) -> String {
    let description = cert
        .description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| format!("<dt>Description</dt><dd>{}</dd>", escape_html(text)))
        .unwrap_or_default();

    format!(
        r#"<section class="panel detail-panel" data-certificate-id="{id}">
            <h2>{title}</h2>
            <dl>
                <dt>ID</dt><dd>{id}</dd>
                <dt>User</dt><dd>{owner}</dd>
                <dt>Status</dt><dd>{status}</dd>
                <dt>Uploaded</dt><dd>{uploaded}</dd>
                <dt>File Name</dt><dd>{file}</dd>
                {description}
            </dl>
            <div class="action-buttons">{actions}{view}</div>
        </section>"#,
        id = escape_html(&cert.id),
        title = escape_html(cert.display_title()),
        owner = render_owner(cert),
        status = status_badge(&cert.status),
        uploaded = escape_html(&format_timestamp(cert.uploaded_at.as_deref())),
        file = escape_html(cert.file_name.as_deref().unwrap_or("—")),
        actions = render_review_actions(cert, VERIFY_ACTION),
        view = view_link(cert),
    )
}
