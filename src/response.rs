//! Wire types exchanged with the fetcher collaborator.
//!
//! The backend wraps every payload in a success/failure envelope. The envelope
//! is decoded and validated once, here, into [`ApiResponse`]; page payloads
//! default their optional fields so the engines never have to re-check them.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

// region:    --- Envelope

/// Normalized response envelope returned by every fetcher.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Success {
        data: T,
        message: Option<String>,
    },
    Failure {
        error: String,
        error_code: Option<String>,
    },
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::Success {
            data,
            message: None,
        }
    }

    pub fn failure(error: impl Into<String>, error_code: Option<&str>) -> Self {
        Self::Failure {
            error: error.into(),
            error_code: error_code.map(str::to_string),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Converts the envelope into its payload, turning the failure variant
    /// into [`Error::Server`].
    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure { error, error_code } => Err(Error::Server { error, error_code }),
        }
    }
}

impl<T> ApiResponse<T>
where
    T: DeserializeOwned,
{
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnvelope<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
    error: Option<String>,
    error_code: Option<String>,
}

impl<'de, T> Deserialize<'de> for ApiResponse<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawEnvelope::<T>::deserialize(deserializer)?;

        match (raw.success, raw.data) {
            (true, Some(data)) => Ok(Self::Success {
                data,
                message: raw.message,
            }),
            (true, None) => Err(serde::de::Error::missing_field("data")),
            (false, _) => Ok(Self::Failure {
                error: raw.error.unwrap_or_default(),
                error_code: raw.error_code,
            }),
        }
    }
}

// endregion: --- Envelope

// region:    --- Cursor

/// Opaque position token issued by the server.
///
/// Usually the identifier of the last record seen, but string tokens are
/// accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cursor {
    Id(i64),
    Token(String),
}

impl From<i64> for Cursor {
    fn from(value: i64) -> Self {
        Self::Id(value)
    }
}

impl From<&str> for Cursor {
    fn from(value: &str) -> Self {
        Self::Token(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorRequest {
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage<T> {
    #[serde(default)]
    pub content: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<Cursor>,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub size: u32,
}

// endregion: --- Cursor

// region:    --- Offset

/// Request for one numbered page.
///
/// `offset` and `limit` are part of the wire shape but the server honours
/// `page`/`size`; they are always sent as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetRequest {
    pub page: u32,
    pub size: u32,
    pub offset: u32,
    pub limit: u32,
}

impl OffsetRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            offset: 0,
            limit: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetPage<T> {
    #[serde(default)]
    pub content: Vec<T>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_previous: bool,
}

// endregion: --- Offset

// region:    --- Tests


// endregion: --- Tests
