//! Role-based routing policy.
//!
//! Every "who may see what" decision in the portal goes through this module: the router,
//! the page guards and the post-login redirect all consult [`authorize`] or one of the
//! helpers built on it.

use crate::{api::Role, session::Session};

pub const LOGIN_PATH: &str = "/login";
pub const USER_HOME_PATH: &str = "/dashboard";
pub const ADMIN_HOME_PATH: &str = "/admin-dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Anonymous,
    User,
    Admin,
}

impl AccessLevel {
    pub fn of(session: &Session) -> Self {
        match session.role() {
            None => AccessLevel::Anonymous,
            Some(role) => role.into(),
        }
    }
}

impl From<Role> for AccessLevel {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => AccessLevel::Admin,
            Role::User => AccessLevel::User,
        }
    }
}

/// Views the portal can mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    UserDashboard,
    AdminDashboard,
    Upload,
    VerifyCertificate,
}

impl View {
    pub fn path(&self) -> &'static str {
        match self {
            View::Login => LOGIN_PATH,
            View::Register => "/register",
            View::UserDashboard => USER_HOME_PATH,
            View::AdminDashboard => ADMIN_HOME_PATH,
            View::Upload => "/upload",
            View::VerifyCertificate => "/verify-certificate",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            other => other,
        };

        match trimmed {
            "/" | LOGIN_PATH => Some(View::Login),
            "/register" => Some(View::Register),
            USER_HOME_PATH => Some(View::UserDashboard),
            ADMIN_HOME_PATH => Some(View::AdminDashboard),
            "/upload" => Some(View::Upload),
            "/verify-certificate" => Some(View::VerifyCertificate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Render(View),
    Redirect(&'static str),
}

const ANONYMOUS_VIEWS: &[View] = &[View::Login, View::Register];
const USER_VIEWS: &[View] = &[View::UserDashboard, View::Upload];
const ADMIN_VIEWS: &[View] = &[
    View::AdminDashboard,
    View::VerifyCertificate,
    View::UserDashboard,
    View::Upload,
];

pub fn permitted_views(level: AccessLevel) -> &'static [View] {
    match level {
        AccessLevel::Anonymous => ANONYMOUS_VIEWS,
        AccessLevel::User => USER_VIEWS,
        AccessLevel::Admin => ADMIN_VIEWS,
    }
}

/// Default destination for a level: login, user dashboard or admin dashboard.
pub fn home_path(level: AccessLevel) -> &'static str {
    match level {
        AccessLevel::Anonymous => LOGIN_PATH,
        AccessLevel::User => USER_HOME_PATH,
        AccessLevel::Admin => ADMIN_HOME_PATH,
    }
}

pub fn post_login_path(role: Role) -> &'static str {
    home_path(role.into())
}

/// `Ok` when the view may be mounted, otherwise the path to redirect to.
pub fn authorize(level: AccessLevel, view: View) -> Result<(), &'static str> {
    if permitted_views(level).contains(&view) {
        Ok(())
    } else {
        Err(home_path(level))
    }
}

pub fn resolve_path(level: AccessLevel, path: &str) -> RouteDecision {
    let Some(view) = View::from_path(path) else {
        return RouteDecision::Redirect(home_path(level));
    };

    match authorize(level, view) {
        Ok(()) => RouteDecision::Render(view),
        Err(target) => RouteDecision::Redirect(target),
    }
}
