use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use cookie::time::Duration as CookieDuration;

use crate::session::KeyValueStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CookieSettings {
    pub ttl_days: i64,
    pub secure: bool,
}

/// Browser cookies as the durable session storage.
///
/// Values are base64url-encoded so JSON survives cookie syntax. Writes accumulate in the
/// wrapped jar, which the handler returns to emit `Set-Cookie` headers.
pub struct CookieStore {
    jar: CookieJar,
    settings: CookieSettings,
}

impl CookieStore {
    pub fn new(jar: CookieJar, settings: CookieSettings) -> Self {
        Self { jar, settings }
    }

    pub fn into_jar(self) -> CookieJar {
        self.jar
    }

    fn base_cookie(&self, key: &str, value: String) -> Cookie<'static> {
        let mut cookie = Cookie::new(key.to_string(), value);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_secure(self.settings.secure);
        cookie
    }
}

impl KeyValueStore for CookieStore {
    fn get(&self, key: &str) -> Option<String> {
        let cookie = self.jar.get(key)?;
        let bytes = URL_SAFE_NO_PAD.decode(cookie.value()).ok()?;
        String::from_utf8(bytes).ok()
    }

    fn set(&mut self, key: &str, value: String) {
        let mut cookie = self.base_cookie(key, URL_SAFE_NO_PAD.encode(value));
        cookie.set_max_age(CookieDuration::days(self.settings.ttl_days));
        self.jar = self.jar.clone().add(cookie);
    }

    fn remove(&mut self, key: &str) {
        let mut removal = self.base_cookie(key, String::new());
        removal.set_max_age(CookieDuration::seconds(0));
        self.jar = self.jar.clone().remove(removal);
    }
}
