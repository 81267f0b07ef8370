//! WSSE `UsernameToken` authentication for the Enelogic API.
//!
//! Every request carries a fresh header: a random nonce, a minute-resolution
//! `Created` timestamp, and `base64(SHA-1(nonce + created + secret))`. Headers
//! go stale within minutes, so build one immediately before each request.

use crate::constants::{CLOCK_SKEW_SECS, CREATED_FORMAT};
use crate::models::Credentials;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use sha1::{Digest, Sha1};
use uuid::Uuid;

/// The fields of one `X-WSSE` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsseHeader {
    username: String,
    nonce: String,
    created: String,
    digest: String,
}

impl WsseHeader {
    /// Builds the header for a given clock reading and nonce.
    ///
    /// `now` is shifted back by the clock skew before being truncated to the minute.
    pub fn at(credentials: &Credentials, now: DateTime<Utc>, nonce: &str) -> Self {
        let created = (now - Duration::seconds(CLOCK_SKEW_SECS))
            .format(CREATED_FORMAT)
            .to_string();

        let mut hasher = Sha1::new();
        hasher.update(nonce.as_bytes());
        hasher.update(created.as_bytes());
        hasher.update(credentials.secret().as_bytes());
        let digest = base64::engine::general_purpose::STANDARD.encode(hasher.finalize());

        Self {
            username: credentials.identity().to_string(),
            nonce: nonce.to_string(),
            created,
            digest,
        }
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn created(&self) -> &str {
        &self.created
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// The nonce as transmitted: base64 of its text form.
    pub fn encoded_nonce(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.nonce.as_bytes())
    }

    pub fn header_value(&self) -> String {
        format!(
            r#"UsernameToken Username="{}", PasswordDigest="{}", Nonce="{}", Created="{}""#,
            self.username,
            self.digest,
            self.encoded_nonce(),
            self.created
        )
    }
}

/// Builds a header from the system clock and a fresh random nonce.
pub fn build_header(credentials: &Credentials) -> WsseHeader {
    let nonce = Uuid::new_v4().simple().to_string();
    WsseHeader::at(credentials, Utc::now(), &nonce)
}
