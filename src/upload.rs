//! Certificate submission.
//!
//! The form is validated before any network traffic: without a selected file the backend is
//! never contacted.

use thiserror::Error;
use tracing::info;

use crate::{
    api::{ApiClient, ApiError, CertificateUpload, SelectedFile, UploadReceipt},
    session::Session,
};

pub const MISSING_FILE_MESSAGE: &str = "Please select a file";
pub const UPLOAD_FAILED_MESSAGE: &str = "File is not uploaded";
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Certificate uploaded successfully!";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no file selected")]
    MissingFile,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl UploadError {
    pub fn user_message(&self) -> String {
        match self {
            UploadError::MissingFile => MISSING_FILE_MESSAGE.to_string(),
            UploadError::Api(err) => err.user_message(UPLOAD_FAILED_MESSAGE),
        }
    }
}

/// Raw upload form as submitted by the browser.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub file: Option<SelectedFile>,
    pub title: String,
    pub description: String,
}

impl UploadForm {
    /// Check the form locally and produce the payload to forward.
    pub fn validate(self) -> Result<CertificateUpload, UploadError> {
        let Some(mut file) = self.file.filter(|file| is_selected(file)) else {
            return Err(UploadError::MissingFile);
        };

        file.file_name = sanitize_file_name(&file.file_name);

        Ok(CertificateUpload {
            file,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
        })
    }
}

/// Validate the form and forward it with the caller's token.
pub async fn submit(
    api: &ApiClient,
    session: &Session,
    form: UploadForm,
) -> Result<UploadReceipt, UploadError> {
    let upload = form.validate()?;
    let file_name = upload.file.file_name.clone();
    let size = upload.file.bytes.len();

    let receipt = api.upload_certificate(session, upload).await?;
    info!(file_name = %file_name, size, "certificate uploaded");
    Ok(receipt)
}

// Browsers send an empty part with an empty filename when nothing was picked.
fn is_selected(file: &SelectedFile) -> bool {
    !(file.file_name.trim().is_empty() && file.bytes.is_empty())
}

fn sanitize_file_name(raw: &str) -> String {
    let sanitized = sanitize_filename::sanitize(raw.trim());
    if sanitized.is_empty() {
        "certificate.bin".to_string()
    } else {
        sanitized
    }
}
