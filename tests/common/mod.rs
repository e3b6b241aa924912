#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Body,
    extract::{Multipart, Path, Request, State},
    http::{HeaderMap, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing,
};
use axum_extra::extract::cookie::CookieJar;
use certdesk::{
    ApiClient, AppState, PortalConfig, SessionStore,
    api::User,
    build_router,
    session::{TOKEN_KEY, USER_KEY},
    web::{CookieSettings, CookieStore},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@x.com";
pub const USER_EMAIL: &str = "kim@example.com";
pub const PASSWORD: &str = "pw";

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct MockUser {
    id: String,
    name: String,
    email: String,
    password: String,
    role: String,
}

#[derive(Default)]
struct BackendData {
    users: Vec<MockUser>,
    certificates: Vec<Value>,
    requests: Vec<RecordedRequest>,
    next_id: usize,
}

type Shared = Arc<Mutex<BackendData>>;

/// In-process stand-in for the certificate REST backend.
pub struct MockBackend {
    pub base_url: String,
    data: Shared,
}

impl MockBackend {
    pub async fn start() -> Self {
        let data: Shared = Arc::new(Mutex::new(seed()));

        let app = Router::new()
            .route("/api/register", routing::post(register))
            .route("/api/login", routing::post(login))
            .route(
                "/api/certificates",
                routing::get(own_certificates).post(upload_certificate),
            )
            .route("/api/admin/certificates", routing::get(all_certificates))
            .route("/api/admin/certificates/:id/verify", routing::put(verify))
            .layer(middleware::from_fn_with_state(data.clone(), record))
            .with_state(data.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api"),
            data,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.data.lock().unwrap().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.data.lock().unwrap().requests.clear();
    }

    pub fn certificate_status(&self, id: &str) -> Option<String> {
        self.data
            .lock()
            .unwrap()
            .certificates
            .iter()
            .find(|cert| cert["_id"] == id)
            .and_then(|cert| cert["status"].as_str().map(str::to_string))
    }

    pub fn certificate_titles(&self) -> Vec<String> {
        self.data
            .lock()
            .unwrap()
            .certificates
            .iter()
            .filter_map(|cert| cert["title"].as_str().map(str::to_string))
            .collect()
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url).unwrap()
    }

    /// The portal router wired to this backend.
    pub fn portal(&self) -> Router {
        let config = PortalConfig {
            api_base_url: self.base_url.clone(),
            ..PortalConfig::default()
        };
        build_router(AppState::from_parts(self.client(), &config))
    }
}

fn seed() -> BackendData {
    let user = |id: &str, name: &str, email: &str, role: &str| MockUser {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        password: PASSWORD.into(),
        role: role.into(),
    };
    let users = vec![
        user("1", "Admin", ADMIN_EMAIL, "admin"),
        user("2", "Kim", USER_EMAIL, "user"),
    ];

    let certificate = |id: &str, title: &str, status: &str| {
        json!({
            "_id": id,
            "title": title,
            "file_name": format!("{id}.pdf"),
            "status": status,
            "uploaded_at": "2024-05-02T08:00:00.000000",
            "certificate_url": format!("https://files.example/{id}.pdf"),
            "user_id": "2",
            "user_name": "Kim",
            "user_email": USER_EMAIL,
        })
    };
    let certificates = vec![
        certificate("c-pending", "AWS Solutions Architect", "pending"),
        certificate("c-verified", "CKA", "verified"),
        certificate("c-other", "Terraform Associate", "pending"),
    ];

    BackendData {
        users,
        certificates,
        requests: Vec::new(),
        next_id: 100,
    }
}

async fn record(State(data): State<Shared>, request: Request, next: Next) -> Response {
    let recorded = RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        authorization: request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    };
    data.lock().unwrap().requests.push(recorded);
    next.run(request).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn caller(data: &BackendData, headers: &HeaderMap) -> Option<MockUser> {
    let token = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer token-")?
        .to_string();
    data.users.iter().find(|user| user.id == token).cloned()
}

async fn register(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut data = data.lock().unwrap();
    let field = |key: &str| body[key].as_str().unwrap_or("").to_string();
    let (name, email, password) = (field("name"), field("email"), field("password"));

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return error(
            StatusCode::BAD_REQUEST,
            "Missing required fields: name, email, password",
        );
    }
    if data.users.iter().any(|user| user.email == email) {
        return error(
            StatusCode::BAD_REQUEST,
            "User already exists with this email",
        );
    }

    data.next_id += 1;
    let id = data.next_id.to_string();
    data.users.push(MockUser {
        id,
        name,
        email,
        password,
        role: "user".into(),
    });
    (
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    )
        .into_response()
}

async fn login(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
    let data = data.lock().unwrap();
    let email = body["email"].as_str().unwrap_or("");
    let password = body["password"].as_str().unwrap_or("");

    match data
        .users
        .iter()
        .find(|user| user.email == email && user.password == password)
    {
        Some(user) => Json(json!({
            "message": "Login successful",
            "access_token": format!("token-{}", user.id),
            "user": {
                "id": user.id,
                "name": user.name,
                "email": user.email,
                "role": user.role,
            },
        }))
        .into_response(),
        None => error(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    }
}

async fn own_certificates(State(data): State<Shared>, headers: HeaderMap) -> Response {
    let data = data.lock().unwrap();
    let Some(user) = caller(&data, &headers) else {
        return error(StatusCode::UNAUTHORIZED, "Missing Authorization Header");
    };
    let own: Vec<Value> = data
        .certificates
        .iter()
        .filter(|cert| cert["user_id"] == user.id.as_str())
        .cloned()
        .collect();
    Json(own).into_response()
}

async fn all_certificates(State(data): State<Shared>, headers: HeaderMap) -> Response {
    let data = data.lock().unwrap();
    match caller(&data, &headers) {
        Some(user) if user.role == "admin" => Json(data.certificates.clone()).into_response(),
        Some(_) => error(StatusCode::FORBIDDEN, "Admin access required"),
        None => error(StatusCode::UNAUTHORIZED, "Missing Authorization Header"),
    }
}

async fn upload_certificate(
    State(data): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut title = String::new();
    let mut file_name = None;
    while let Some(field) = multipart.next_field().await.unwrap() {
        match field.name().unwrap_or("") {
            "file" => {
                file_name = field.file_name().map(str::to_string);
                let _ = field.bytes().await.unwrap();
            }
            "title" => title = field.text().await.unwrap(),
            _ => {
                let _ = field.text().await.unwrap();
            }
        }
    }

    let mut data = data.lock().unwrap();
    let Some(user) = caller(&data, &headers) else {
        return error(StatusCode::UNAUTHORIZED, "Missing Authorization Header");
    };
    let Some(file_name) = file_name.filter(|_| !title.trim().is_empty()) else {
        return error(StatusCode::BAD_REQUEST, "Missing file or title");
    };

    data.next_id += 1;
    let certificate = json!({
        "_id": format!("c-{}", data.next_id),
        "title": title,
        "file_name": file_name,
        "status": "pending",
        "uploaded_at": "2024-06-01T12:30:00.000000",
        "certificate_url": format!("https://files.example/{file_name}"),
        "user_id": user.id,
        "user_name": user.name,
        "user_email": user.email,
    });
    data.certificates.push(certificate.clone());

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Certificate uploaded successfully",
            "certificate": certificate,
        })),
    )
        .into_response()
}

async fn verify(
    State(data): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut data = data.lock().unwrap();
    match caller(&data, &headers) {
        Some(user) if user.role == "admin" => {}
        Some(_) => return error(StatusCode::FORBIDDEN, "Admin access required"),
        None => return error(StatusCode::UNAUTHORIZED, "Missing Authorization Header"),
    }

    let status = body["status"].as_str().unwrap_or("verified").to_string();
    if status != "verified" && status != "rejected" {
        return error(
            StatusCode::BAD_REQUEST,
            "Invalid status. Use \"verified\" or \"rejected\"",
        );
    }

    let Some(cert) = data
        .certificates
        .iter_mut()
        .find(|cert| cert["_id"] == id.as_str())
    else {
        return error(
            StatusCode::NOT_FOUND,
            "Certificate not found or already has this status",
        );
    };
    cert["status"] = Value::String(status.clone());

    Json(json!({ "message": format!("Certificate {status} successfully") })).into_response()
}

// Portal-side helpers.

pub async fn send(app: &Router, request: axum::http::Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// `name=value` pairs from `Set-Cookie`, joined the way a browser would send them back.
pub fn cookie_header(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .filter(|pair| !pair.ends_with('='))
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok().map(str::to_string))
        .collect()
}

pub fn get(uri: &str, cookies: Option<&str>) -> axum::http::Request<Body> {
    let mut builder = axum::http::Request::builder().method(Method::GET).uri(uri);
    if let Some(cookies) = cookies {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, cookies: Option<&str>, pairs: &[(&str, &str)]) -> axum::http::Request<Body> {
    let body = pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    let mut builder = axum::http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookies) = cookies {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder.body(Body::from(body)).unwrap()
}

pub struct FilePart<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

const BOUNDARY: &str = "certdesk-test-boundary";

pub fn post_multipart(
    uri: &str,
    cookies: Option<&str>,
    fields: &[(&str, &str)],
    file: Option<FilePart<'_>>,
) -> axum::http::Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = axum::http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(cookies) = cookies {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder.body(Body::from(body)).unwrap()
}

/// Sign in through the portal and return the cookies to replay.
pub async fn login_as(app: &Router, email: &str) -> String {
    let response = send(
        app,
        post_form("/login", None, &[("email", email), ("password", PASSWORD)]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    cookie_header(&response)
}

/// Session cookies for an arbitrary user/token pair, bypassing the backend login.
pub fn forged_session(user: User, token: &str) -> String {
    let settings = CookieSettings {
        ttl_days: 1,
        secure: false,
    };
    let mut store = SessionStore::restore(CookieStore::new(CookieJar::new(), settings));
    store.login(user, token).unwrap();
    let jar = store.into_storage().into_jar();

    [USER_KEY, TOKEN_KEY]
        .iter()
        .filter_map(|key| jar.get(key))
        .map(|cookie| format!("{}={}", cookie.name(), cookie.value()))
        .collect::<Vec<_>>()
        .join("; ")
}

fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|byte| match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (byte as char).to_string()
            }
            b' ' => "+".to_string(),
            other => format!("%{other:02X}"),
        })
        .collect()
}
