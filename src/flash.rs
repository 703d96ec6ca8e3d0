use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use sha2::{Digest, Sha512};

const FLASH_COOKIE: &str = "flash";

/// One-shot message shown on the next page render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: String,
    pub message: String,
}

impl Flash {
    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: "danger".to_string(),
            message: message.into(),
        }
    }

    fn encode(&self) -> String {
        hex::encode(format!("{}\n{}", self.level, self.message))
    }

    fn decode(value: &str) -> Option<Self> {
        let raw = String::from_utf8(hex::decode(value).ok()?).ok()?;
        let (level, message) = raw.split_once('\n')?;
        Some(Self {
            level: level.to_string(),
            message: message.to_string(),
        })
    }
}

/// Derive the cookie signing key from the configured secret.
pub fn key_from_secret(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

pub fn set(jar: SignedCookieJar, flash: &Flash) -> SignedCookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, flash.encode()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Read the pending message, if any, and clear it.
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let flash = Flash::decode(cookie.value());
    let jar = jar.remove(Cookie::build((FLASH_COOKIE, "")).path("/"));
    (jar, flash)
}
