//! Typed client for the certificate REST backend.
//!
//! One method per backend operation. Every call is sent once: there is no retry, timeout
//! policy or caching, and failures are returned to the caller as [`ApiError`].

mod error;
mod models;

pub use error::{ApiError, ApiResult};
pub use models::{
    ApiMessage, Certificate, CertificateStatus, CertificateUpload, LoginRequest, LoginResponse,
    RegisterRequest, ReviewDecision, Role, SelectedFile, UploadReceipt, User,
};

use mime::Mime;
use reqwest::{
    Client, Method, RequestBuilder, Url,
    multipart::{Form, Part},
};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::session::Session;
use models::VerifyRequest;

/// Handle to the backend. Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Self::with_http(Client::new(), base_url)
    }

    pub fn with_http(http: Client, base_url: &str) -> ApiResult<Self> {
        let base = Url::parse(base_url.trim()).map_err(|err| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;

        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "url cannot carry a path".to_string(),
            });
        }

        Ok(Self { http, base })
    }

    /// `POST /register`
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<ApiMessage> {
        let builder = self.request(Method::POST, &["register"], None).json(request);
        self.execute("/register", builder).await
    }

    /// `POST /login`
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let builder = self.request(Method::POST, &["login"], None).json(request);
        self.execute("/login", builder).await
    }

    /// `POST /certificates` as multipart with `file`, `title` and `description` parts.
    pub async fn upload_certificate(
        &self,
        session: &Session,
        upload: CertificateUpload,
    ) -> ApiResult<UploadReceipt> {
        let path = "/certificates";
        let CertificateUpload {
            file,
            title,
            description,
        } = upload;

        let content_type = file
            .content_type
            .as_deref()
            .and_then(|value| value.parse::<Mime>().ok())
            .unwrap_or(mime::APPLICATION_OCTET_STREAM);

        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(content_type.as_ref())
            .map_err(|source| ApiError::Transport {
                path: path.to_string(),
                source,
            })?;

        let form = Form::new()
            .part("file", part)
            .text("title", title)
            .text("description", description);

        let builder = self
            .request(Method::POST, &["certificates"], Some(session))
            .multipart(form);
        self.execute(path, builder).await
    }

    /// `GET /certificates`: the caller's own certificates.
    pub async fn list_own_certificates(&self, session: &Session) -> ApiResult<Vec<Certificate>> {
        let builder = self.request(Method::GET, &["certificates"], Some(session));
        self.execute("/certificates", builder).await
    }

    /// `GET /admin/certificates`: every certificate, with owner details.
    pub async fn list_all_certificates(&self, session: &Session) -> ApiResult<Vec<Certificate>> {
        let builder = self.request(Method::GET, &["admin", "certificates"], Some(session));
        self.execute("/admin/certificates", builder).await
    }

    /// `PUT /admin/certificates/{id}/verify`
    pub async fn set_verification_status(
        &self,
        session: &Session,
        certificate_id: &str,
        decision: ReviewDecision,
    ) -> ApiResult<ApiMessage> {
        let path = format!("/admin/certificates/{certificate_id}/verify");
        let builder = self
            .request(
                Method::PUT,
                &["admin", "certificates", certificate_id, "verify"],
                Some(session),
            )
            .json(&VerifyRequest {
                status: decision.as_str(),
            });
        self.execute(&path, builder).await
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Only fails for cannot-be-a-base urls, which `with_http` rejects.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        session: Option<&Session>,
    ) -> RequestBuilder {
        let mut builder = self.http.request(method, self.endpoint(segments));
        if let Some(token) = session.and_then(Session::token) {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn execute<T: DeserializeOwned>(&self, path: &str, builder: RequestBuilder) -> ApiResult<T> {
        debug!(path, "calling backend");

        let response = builder.send().await.map_err(|source| {
            warn!(path, error = %source, "backend request failed");
            ApiError::Transport {
                path: path.to_string(),
                source,
            }
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;

        if !status.is_success() {
            let message = extract_error_message(&body);
            warn!(path, %status, message = message.as_deref().unwrap_or(""), "backend rejected request");
            return Err(ApiError::Server {
                path: path.to_string(),
                status,
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|source| {
            warn!(path, error = %source, "unexpected backend payload");
            ApiError::Decode {
                path: path.to_string(),
                source,
            }
        })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

fn extract_error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
}
