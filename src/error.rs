use std::collections::HashMap;

use derive_more::derive::From;
use serde::Serialize;

pub type Result<T> = core::result::Result<T, Error>;

/// Translation key used for transport failures.
pub const NETWORK_ERROR_KEY: &str = "frontMessages.NETWORK_ERROR";

/// Prefix of the translation keys used for server error codes.
pub const SERVER_MESSAGE_PREFIX: &str = "serverMessages.";

/// An enumeration representing the errors a pagination engine can surface
///
/// The engines never produce errors of their own beyond what the fetcher
/// reports. Every variant leaves the engine state exactly as it was before
/// the failed call.
///
/// # Variants
///
/// - `Network` - The request never reached the server (DNS, CORS, connectivity).
/// - `Server` - The server answered with the failure variant of the envelope.
/// - `Serde` - A response body could not be decoded into an envelope.
/// - `Fetch` - Any other error raised by the fetcher collaborator.
/// - `Closed` - A UI registry entry was dropped before it was resolved.
#[derive(Debug, From)]
pub enum Error {
    Network {
        reason: String,
    },

    Server {
        error: String,
        error_code: Option<String>,
    },

    #[from]
    Serde(serde_json::Error),

    #[from]
    Fetch(Box<dyn std::error::Error + Send + Sync>),

    Closed,
}

impl Error {
    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network {
            reason: reason.into(),
        }
    }

    pub fn server(error: impl Into<String>, error_code: Option<String>) -> Self {
        Self::Server {
            error: error.into(),
            error_code,
        }
    }

    /// Resolves the message a view should show for this error.
    ///
    /// Network failures map to a generic localized message. Server failures
    /// are looked up by their error code and fall back to the raw server text
    /// when the translator has no mapping for it.
    pub fn message(&self, translator: &impl Translate) -> String {
        match self {
            Error::Network { reason } => translator
                .translate(NETWORK_ERROR_KEY)
                .unwrap_or_else(|| reason.clone()),
            Error::Server { error, error_code } => error_code
                .as_deref()
                .and_then(|code| translator.translate(&format!("{SERVER_MESSAGE_PREFIX}{code}")))
                .unwrap_or_else(|| error.clone()),
            other => other.to_string(),
        }
    }
}

/// Locale lookup collaborator used to resolve user-facing error messages.
pub trait Translate {
    fn translate(&self, key: &str) -> Option<String>;
}

impl Translate for HashMap<String, String> {
    fn translate(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Error::Network { reason } => serializer.serialize_str(reason),
            Error::Server { error, .. } => serializer.serialize_str(error),
            Error::Serde(serde_error) => serializer.serialize_str(&serde_error.to_string()),
            Error::Fetch(fetch_error) => serializer.serialize_str(&fetch_error.to_string()),
            Error::Closed => serializer.serialize_str("closed"),
        }
    }
}

// region:    --- Error Boilerplate

impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}

// endregion: --- Error Boilerplate

// region:    --- Tests


// endregion: --- Tests
