use crate::{
    api::{ApiResult, Certificate, CertificateStatus},
    web::templates::escape_html,
};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch certificates";

/// What a list view has to show once its fetch has settled.
#[derive(Debug)]
pub enum CertificateListState {
    Loaded(Vec<Certificate>),
    Failed(String),
}

impl CertificateListState {
    pub fn from_result(result: ApiResult<Vec<Certificate>>, fallback: &str) -> Self {
        match result {
            Ok(certificates) => CertificateListState::Loaded(certificates),
            Err(err) => CertificateListState::Failed(err.user_message(fallback)),
        }
    }
}

pub fn status_badge(status: &CertificateStatus) -> String {
    format!(
        r#"<span class="status-badge status-{class}">{label}</span>"#,
        class = escape_html(status.as_str()),
        label = escape_html(status.as_str()),
    )
}

/// Link opening the stored file in a new browsing context.
pub fn view_link(certificate: &Certificate) -> String {
    match certificate
        .file_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
    {
        Some(url) => format!(
            r#"<a class="btn-view" href="{href}" target="_blank" rel="noopener noreferrer" title="View certificate">View</a>"#,
            href = escape_html(url),
        ),
        None => r#"<span class="muted">No file link</span>"#.to_string(),
    }
}

pub fn render_error_state(message: &str) -> String {
    format!(
        r#"<div class="flash error" data-state="error">{}</div>"#,
        escape_html(message)
    )
}
