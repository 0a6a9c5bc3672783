//! Credential and identity types.
//!
//! A [`Token`] is a secret — it identifies one sender to the messaging
//! platform and must never appear verbatim in logs or Debug output. Log
//! lines use [`Token::fingerprint`] instead.

use serde::Deserialize;

/// An opaque authentication token for one sender identity.
///
/// Immutable for the process lifetime; owned by configuration.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret. Only the messaging client should call this when
    /// building an authorization header.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// A log-safe handle for this token: an ellipsis plus the last four
    /// characters. Short tokens collapse to the ellipsis alone.
    pub fn fingerprint(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() < 8 {
            return "…".into();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("…{tail}")
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Token").field(&"[REDACTED]").finish()
    }
}

/// A display name resolved from a token, used only for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    /// Legacy four-digit tag. Migrated accounts report `"0"`.
    pub discriminator: String,
}

impl Identity {
    pub fn new(username: impl Into<String>, discriminator: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            discriminator: discriminator.into(),
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.discriminator == "0" || self.discriminator.is_empty() {
            write!(f, "{}", self.username)
        } else {
            write!(f, "{}#{}", self.username, self.discriminator)
        }
    }
}

/// A token paired with its resolved identity.
///
/// Lives for one credential iteration within a cycle; the scheduler discards
/// it when it moves to the next token and re-resolves next cycle.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: Token,
    pub identity: Identity,
}

impl Session {
    pub fn new(token: Token, identity: Identity) -> Self {
        Self { token, identity }
    }
}
