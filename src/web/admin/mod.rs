mod dashboard;
mod types;
mod verify;

pub use dashboard::{dashboard, record_decision, render_admin_dashboard};
pub use types::{DecisionForm, VerifyQuery};
pub use verify::{LookupState, render_verify_page, verify_decision, verify_page};

pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";
pub const INVALID_DECISION_MESSAGE: &str = "Invalid status";
