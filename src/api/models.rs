use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Classification of an account as returned by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Anything other than `admin` is treated as a standard account.
    pub fn parse(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Serialize for Role {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Role::parse(&value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

/// Review state of an uploaded certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CertificateStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
    Other(String),
}

impl CertificateStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CertificateStatus::Pending => "pending",
            CertificateStatus::Verified => "verified",
            CertificateStatus::Rejected => "rejected",
            CertificateStatus::Other(value) => value.as_str(),
        }
    }

    /// Read-only label shown once a certificate has left the review queue.
    pub fn label(&self) -> &str {
        match self {
            CertificateStatus::Pending => "Pending",
            CertificateStatus::Verified => "Approved",
            CertificateStatus::Rejected => "Rejected",
            CertificateStatus::Other(value) => value.as_str(),
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "pending" => CertificateStatus::Pending,
            "verified" => CertificateStatus::Verified,
            "rejected" => CertificateStatus::Rejected,
            other => CertificateStatus::Other(other.to_string()),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, CertificateStatus::Pending)
    }
}

impl Serialize for CertificateStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CertificateStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(CertificateStatus::parse(&value))
    }
}

/// Certificate record as served by the backend. Only `_id` is mandatory; everything else is
/// rendered with a fallback when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(
        default,
        rename = "certificate_url",
        alias = "file_url",
        alias = "cloudinary_url"
    )]
    pub file_url: Option<String>,
    #[serde(default)]
    pub status: CertificateStatus,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

impl Certificate {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or("Untitled")
    }
}

/// Administrative verdict on a pending certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    /// Wire value sent in the `status` field of the verify call.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewDecision::Approve => "verified",
            ReviewDecision::Reject => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "verified" => Some(ReviewDecision::Approve),
            "rejected" => Some(ReviewDecision::Reject),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub access_token: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Plain `{ "message": ... }` acknowledgement used by several endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub certificate: Option<Certificate>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct VerifyRequest<'a> {
    pub status: &'a str,
}

/// File chosen in the browser, held in memory until it is forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Validated upload ready to be sent to the backend.
#[derive(Debug, Clone)]
pub struct CertificateUpload {
    pub file: SelectedFile,
    pub title: String,
    pub description: String,
}
