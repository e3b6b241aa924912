use std::borrow::Cow;

use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, warn};

use crate::{
    api::{Certificate, ReviewDecision, User},
    policy::View,
    review,
    web::{
        AppState,
        auth::StatusQuery,
        certificates::{
            CertificateListState, FETCH_FAILED_MESSAGE, render_error_state, status_badge,
            view_link,
        },
        flash::{Flash, flash_from_status},
        guard::{self, CookieSession},
        responses::upstream_status,
        templates::{NavLink, PageLayout, escape_html, format_timestamp, render_page},
    },
};

use super::{INVALID_DECISION_MESSAGE, SOMETHING_WENT_WRONG, types::DecisionForm};

const REVIEW_ACTION: &str = "/admin-dashboard/review";

pub async fn dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<StatusQuery>,
) -> Result<Html<String>, Redirect> {
    let (store, user) = guard::require_user(&state, jar, View::AdminDashboard)?;

    let listing = fetch_listing(&state, &store).await;
    let flash = flash_from_status(params.status.as_deref());

    Ok(Html(render_admin_dashboard(&user, &listing, &flash)))
}

/// Record a verdict, then render the list as refetched after it.
pub async fn record_decision(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<DecisionForm>,
) -> Result<(StatusCode, Html<String>), Redirect> {
    let (store, user) = guard::require_user(&state, jar, View::AdminDashboard)?;

    let certificate_id = form.certificate_id.trim();
    if certificate_id.is_empty() {
        warn!("review submitted without a certificate id");
        let listing = fetch_listing(&state, &store).await;
        let flash = Flash::error(review::NOT_FOUND_MESSAGE);
        return Ok((
            StatusCode::BAD_REQUEST,
            Html(render_admin_dashboard(&user, &listing, &flash)),
        ));
    }

    let Some(decision) = ReviewDecision::parse(&form.status) else {
        warn!(status = %form.status, "unknown review status submitted");
        let listing = fetch_listing(&state, &store).await;
        let flash = Flash::error(INVALID_DECISION_MESSAGE);
        return Ok((
            StatusCode::BAD_REQUEST,
            Html(render_admin_dashboard(&user, &listing, &flash)),
        ));
    };

    match review::decide_and_refresh(state.api(), store.session(), certificate_id, decision)
        .await
    {
        Ok(outcome) => {
            let listing =
                CertificateListState::from_result(outcome.certificates, FETCH_FAILED_MESSAGE);
            let flash = Flash::success(outcome.message);
            Ok((
                StatusCode::OK,
                Html(render_admin_dashboard(&user, &listing, &flash)),
            ))
        }
        Err(err) => {
            error!(
                %certificate_id,
                error = %err,
                "failed to record review decision"
            );
            let flash = Flash::error(err.user_message(SOMETHING_WENT_WRONG));
            let listing = fetch_listing(&state, &store).await;
            Ok((
                upstream_status(&err),
                Html(render_admin_dashboard(&user, &listing, &flash)),
            ))
        }
    }
}

async fn fetch_listing(state: &AppState, store: &CookieSession) -> CertificateListState {
    CertificateListState::from_result(
        state.api().list_all_certificates(store.session()).await,
        FETCH_FAILED_MESSAGE,
    )
}

pub fn render_admin_dashboard(
    admin: &User,
    listing: &CertificateListState,
    flash: &Flash,
) -> String {
    let list_html = match listing {
        CertificateListState::Failed(message) => render_error_state(message),
        CertificateListState::Loaded(certificates) if certificates.is_empty() => {
            r#"<p class="empty-state">No certificates have been uploaded yet.</p>"#.to_string()
        }
        CertificateListState::Loaded(certificates) => render_table(certificates),
    };

    let heading = match listing {
        CertificateListState::Loaded(certificates) => {
            format!("All Certificates ({})", certificates.len())
        }
        CertificateListState::Failed(_) => "All Certificates".to_string(),
    };

    let body = format!(
        r#"        <section class="panel">
            <h2>{heading}</h2>
            {list_html}
        </section>"#
    );

    render_page(PageLayout {
        meta_title: "Admin Dashboard",
        page_heading: "Admin Dashboard",
        user: Some(admin),
        nav_links: vec![
            NavLink {
                href: "/verify-certificate",
                label: "Verify by ID",
            },
            NavLink {
                href: "/upload",
                label: "Upload",
            },
        ],
        flash_html: Cow::Owned(flash.render()),
        body_html: Cow::Owned(body),
    })
}

fn render_table(certificates: &[Certificate]) -> String {
    let rows = certificates
        .iter()
        .map(|cert| {
            format!(
                "<tr data-certificate-id=\"{id}\"><td><code>{id}</code></td><td>{title}</td><td>{owner}</td><td>{status}</td><td>{uploaded}</td><td>{file}</td><td><div class=\"action-buttons\">{actions}{view}</div></td></tr>",
                id = escape_html(&cert.id),
                title = escape_html(cert.display_title()),
                owner = render_owner(cert),
                status = status_badge(&cert.status),
                uploaded = escape_html(&format_timestamp(cert.uploaded_at.as_deref())),
                file = escape_html(cert.file_name.as_deref().unwrap_or("—")),
                actions = render_review_actions(cert, REVIEW_ACTION),
                view = view_link(cert),
            )
        })
        .collect::<String>();

    format!(
        r#"<table class="certificates-table">
                <thead><tr><th>ID</th><th>Title</th><th>User</th><th>Status</th><th>Upload Date</th><th>File Name</th><th>Actions</th></tr></thead>
                <tbody>{rows}</tbody>
            </table>"#
    )
}

pub(super) fn render_owner(cert: &Certificate) -> String {
    let name = cert
        .user_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let email = cert
        .user_email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty());

    match (name, email) {
        (Some(name), Some(email)) => format!(
            r#"{}<br><span class="muted">{}</span>"#,
            escape_html(name),
            escape_html(email)
        ),
        (Some(value), None) | (None, Some(value)) => escape_html(value),
        (None, None) => "Unknown".to_string(),
    }
}

/// Approve / reject forms while a certificate is pending, its settled label otherwise.
pub(super) fn render_review_actions(cert: &Certificate, action: &str) -> String {
    if !cert.status.is_pending() {
        return format!(
            r#"<span class="status-text">{}</span>"#,
            escape_html(cert.status.label())
        );
    }

    [
        (ReviewDecision::Approve, "btn-approve", "Verify"),
        (ReviewDecision::Reject, "btn-reject", "Reject"),
    ]
    .iter()
    .map(|(decision, class, label)| {
        format!(
            r#"<form class="inline-form" method="post" action="{action}"><input type="hidden" name="certificate_id" value="{id}"><input type="hidden" name="status" value="{status}"><button type="submit" class="{class}">{label}</button></form>"#,
            action = escape_html(action),
            id = escape_html(&cert.id),
            status = decision.as_str(),
        )
    })
    .collect()
}
