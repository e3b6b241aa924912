//! Signed-in identity of the current visitor.
//!
//! A [`Session`] is either empty or holds a user together with its bearer token; the two are
//! never stored apart. [`SessionStore`] owns the durable copy under the keys [`USER_KEY`] and
//! [`TOKEN_KEY`] and has an explicit lifecycle: `restore` once, then `login`/`logout`.

mod storage;

pub use storage::{KeyValueStore, MemoryStore};

use thiserror::Error;
use tracing::debug;

use crate::api::{Role, User};

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Clone, PartialEq, Eq)]
struct AuthSession {
    user: User,
    token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    auth: Option<AuthSession>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: User, token: impl Into<String>) -> Self {
        Self {
            auth: Some(AuthSession {
                user,
                token: token.into(),
            }),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.auth.as_ref().map(|auth| &auth.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|auth| auth.token.as_str())
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|user| user.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("refusing to store a session with an empty token")]
    EmptyToken,
    #[error("failed to encode session user: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct SessionStore<S> {
    storage: S,
    session: Session,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Read the durable copy. A missing, empty or undecodable half leaves the session empty.
    pub fn restore(storage: S) -> Self {
        let session = match (storage.get(USER_KEY), storage.get(TOKEN_KEY)) {
            (Some(raw_user), Some(token)) if !token.is_empty() => {
                match serde_json::from_str::<User>(&raw_user) {
                    Ok(user) => Session::authenticated(user, token),
                    Err(err) => {
                        debug!(?err, "stored session user is unreadable; starting anonymous");
                        Session::anonymous()
                    }
                }
            }
            (None, None) => Session::anonymous(),
            _ => {
                debug!("stored session is incomplete; starting anonymous");
                Session::anonymous()
            }
        };

        Self { storage, session }
    }

    /// Store user and token together. Nothing is written if either cannot be stored.
    pub fn login(&mut self, user: User, token: impl Into<String>) -> Result<(), SessionError> {
        let token = token.into();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let encoded_user = serde_json::to_string(&user)?;

        self.storage.set(USER_KEY, encoded_user);
        self.storage.set(TOKEN_KEY, token.clone());
        self.session = Session::authenticated(user, token);
        Ok(())
    }

    pub fn logout(&mut self) {
        self.storage.remove(USER_KEY);
        self.storage.remove(TOKEN_KEY);
        self.session = Session::anonymous();
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
