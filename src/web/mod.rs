pub mod admin;
pub mod auth;
pub mod certificates;
pub mod cookies;
pub mod dashboard;
pub mod flash;
pub mod guard;
pub mod responses;
pub mod router;
pub mod state;
pub mod templates;
pub mod upload;

pub use cookies::{CookieSettings, CookieStore};
pub use router::build_router;
pub use state::AppState;
pub use templates::escape_html;
