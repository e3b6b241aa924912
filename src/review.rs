//! Administrative review workflow.
//!
//! Decisions are never applied to a local copy of the list. [`decide_and_refresh`] sends the
//! decision and only then fetches the full collection, so whatever is rendered afterwards is
//! the backend's state as of after the mutation.

use tracing::info;

use crate::{
    api::{ApiClient, ApiResult, Certificate},
    session::Session,
};

pub use crate::api::ReviewDecision;

pub const NOT_FOUND_MESSAGE: &str = "Certificate not found or invalid ID.";

#[derive(Debug)]
pub struct ReviewOutcome {
    /// Confirmation text from the backend.
    pub message: String,
    /// The collection as fetched after the decision was recorded.
    pub certificates: ApiResult<Vec<Certificate>>,
}

impl ReviewOutcome {
    pub fn find(&self, certificate_id: &str) -> Option<&Certificate> {
        self.certificates
            .as_ref()
            .ok()
            .and_then(|certificates| find_certificate(certificates, certificate_id))
    }
}

/// Record `decision` for `certificate_id`, then refetch the full list.
///
/// A failed decision returns the error without refetching.
pub async fn decide_and_refresh(
    api: &ApiClient,
    session: &Session,
    certificate_id: &str,
    decision: ReviewDecision,
) -> ApiResult<ReviewOutcome> {
    let certificate_id = certificate_id.trim();
    let acknowledgement = api
        .set_verification_status(session, certificate_id, decision)
        .await?;

    info!(
        certificate_id,
        status = decision.as_str(),
        "review decision recorded"
    );

    let message = if acknowledgement.message.trim().is_empty() {
        format!("Certificate {} successfully", decision.as_str())
    } else {
        acknowledgement.message
    };

    let certificates = api.list_all_certificates(session).await;

    Ok(ReviewOutcome {
        message,
        certificates,
    })
}

/// Look a certificate up by identifier by searching the full admin collection.
pub async fn lookup(
    api: &ApiClient,
    session: &Session,
    certificate_id: &str,
) -> ApiResult<Option<Certificate>> {
    let certificate_id = certificate_id.trim();
    if certificate_id.is_empty() {
        return Ok(None);
    }

    let certificates = api.list_all_certificates(session).await?;
    Ok(find_certificate(&certificates, certificate_id).cloned())
}

pub fn find_certificate<'a>(
    certificates: &'a [Certificate],
    certificate_id: &str,
) -> Option<&'a Certificate> {
    let certificate_id = certificate_id.trim();
    certificates.iter().find(|cert| cert.id == certificate_id)
}
