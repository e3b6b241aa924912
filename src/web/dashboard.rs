use std::borrow::Cow;

use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    api::{Certificate, User},
    policy::{USER_HOME_PATH, View},
    web::{
        AppState,
        auth::StatusQuery,
        certificates::{
            CertificateListState, FETCH_FAILED_MESSAGE, render_error_state, status_badge,
            view_link,
        },
        flash::{Flash, flash_from_status},
        guard,
        templates::{NavLink, PageLayout, escape_html, format_timestamp, render_page},
        upload::{UploadFormValues, render_upload_form},
    },
};

/// The signed-in user's own certificates, read-only, plus the upload form.
pub async fn dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<StatusQuery>,
) -> Result<Html<String>, Redirect> {
    let (store, user) = guard::require_user(&state, jar, View::UserDashboard)?;

    let listing = CertificateListState::from_result(
        state.api().list_own_certificates(store.session()).await,
        FETCH_FAILED_MESSAGE,
    );
    let flash = flash_from_status(params.status.as_deref());

    Ok(Html(render_dashboard(&user, &listing, &flash)))
}

pub fn render_dashboard(user: &User, listing: &CertificateListState, flash: &Flash) -> String {
    let list_html = match listing {
        CertificateListState::Failed(message) => render_error_state(message),
        CertificateListState::Loaded(certificates) if certificates.is_empty() => {
            r#"<p class="empty-state">You have not uploaded any certificates yet.</p>"#
                .to_string()
        }
        CertificateListState::Loaded(certificates) => render_table(certificates),
    };

    let form_html = render_upload_form(&UploadFormValues::default(), Some(USER_HOME_PATH));

    let body = format!(
        r#"        <section class="panel">
            <h2>Upload Certificate</h2>
{form_html}
        </section>
        <section class="panel">
            <h2>My Certificates</h2>
            {list_html}
        </section>"#
    );

    let mut nav_links = Vec::new();
    if user.role.is_admin() {
        nav_links.push(NavLink {
            href: "/admin-dashboard",
            label: "Admin dashboard",
        });
    }

    render_page(PageLayout {
        meta_title: "Dashboard",
        page_heading: "My Dashboard",
        user: Some(user),
        nav_links,
        flash_html: Cow::Owned(flash.render()),
        body_html: Cow::Owned(body),
    })
}

fn render_table(certificates: &[Certificate]) -> String {
    let rows = certificates
        .iter()
        .map(|cert| {
            format!(
                "<tr><td>{title}</td><td>{status}</td><td>{uploaded}</td><td>{file}</td><td>{view}</td></tr>",
                title = escape_html(cert.display_title()),
                status = status_badge(&cert.status),
                uploaded = escape_html(&format_timestamp(cert.uploaded_at.as_deref())),
                file = escape_html(cert.file_name.as_deref().unwrap_or("—")),
                view = view_link(cert),
            )
        })
        .collect::<String>();

    format!(
        r#"<table class="certificates-table">
                <thead><tr><th>Title</th><th>Status</th><th>Upload Date</th><th>File Name</th><th>File</th></tr></thead>
                <tbody>{rows}</tbody>
            </table>"#
    )
}
