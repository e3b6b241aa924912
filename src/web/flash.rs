use crate::{policy::USER_HOME_PATH, web::templates::escape_html};

/// One-shot message rendered above a page's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    None,
    Success(String),
    Error(String),
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Flash::Success(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Flash::Error(message.into())
    }

    pub fn render(&self) -> String {
        match self {
            Flash::None => String::new(),
            Flash::Success(message) => format!(
                r#"<div class="flash success">{}</div>"#,
                escape_html(message)
            ),
            Flash::Error(message) => {
                format!(r#"<div class="flash error">{}</div>"#, escape_html(message))
            }
        }
    }
}

/// Map the `status` query code set by a redirect to a flash message.
pub fn flash_from_status(status: Option<&str>) -> Flash {
    match status {
        Some("logged_out") => Flash::success("You have been logged out."),
        Some("registered") => Flash::success("Account created. Please log in."),
        Some("uploaded") => Flash::success("Certificate uploaded successfully!"),
        _ => Flash::None,
    }
}

/// Where an embedded upload form may send the browser after success. Anything outside the
/// allow-list is dropped.
pub fn sanitize_return_to(input: Option<&str>) -> Option<&'static str> {
    match input.map(str::trim) {
        Some(USER_HOME_PATH) => Some(USER_HOME_PATH),
        _ => None,
    }
}
