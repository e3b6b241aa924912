pub mod api;
pub mod config;
pub mod policy;
pub mod review;
pub mod session;
pub mod upload;
pub mod web;

pub use api::{ApiClient, ApiError};
pub use config::PortalConfig;
pub use session::{Session, SessionStore};
pub use web::{AppState, build_router};
