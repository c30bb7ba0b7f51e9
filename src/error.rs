use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Sentinel kept in any [`ServiceError`] field the instance did not supply.
pub const EMPTY_FIELD: &str = "<empty>";

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The caller asked for a verb outside GET/POST/PUT/DELETE. Raised before
    /// any network activity.
    #[error("{0}")]
    InvalidVerb(ServiceError),

    /// The instance answered 202, i.e. accepted the call but returned nothing.
    /// Kept apart from [`Error::Api`] so callers can special-case "nothing to
    /// fetch" without string matching.
    #[error("{0}")]
    EmptyContent(ServiceError),

    /// The instance answered with a non-success status. The transport error, if
    /// the underlying client produced one, is attached untouched for debugging.
    #[error("{error}")]
    Api {
        error: ServiceError,
        #[source]
        source: Option<reqwest::Error>,
    },
}

impl Error {
    pub(crate) fn invalid_verb(verb: &str) -> Self {
        Error::InvalidVerb(ServiceError::new(
            format!("'{verb}' is an invalid request type."),
            "call_api_now",
            format!("Request type must be one of 'GET', 'POST', 'PUT', 'DELETE', got '{verb}'."),
        ))
    }

    /// The normalized `(message, type, detail)` triple, when this error carries one.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Error::InvalidVerb(error)
            | Error::EmptyContent(error)
            | Error::Api { error, .. } => Some(error),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Error details as reported by a ServiceNow instance.
///
/// Each field defaults to [`EMPTY_FIELD`] and is overwritten only when the
/// response supplies a non-empty string for it; an absent, empty, or
/// non-string value keeps the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub message: String,
    pub error_type: String,
    pub detail: String,
}

impl Default for ServiceError {
    fn default() -> Self {
        Self {
            message: EMPTY_FIELD.to_string(),
            error_type: EMPTY_FIELD.to_string(),
            detail: EMPTY_FIELD.to_string(),
        }
    }
}

// Raw capture of the instance's error mapping. Values stay untyped so a
// malformed field degrades to the sentinel instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
struct RawErrorFields {
    #[serde(default)]
    message: Option<Value>,
    #[serde(default, rename = "type")]
    error_type: Option<Value>,
    #[serde(default)]
    detail: Option<Value>,
}

impl ServiceError {
    pub(crate) fn new(
        message: impl Into<String>,
        error_type: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            error_type: error_type.into(),
            detail: detail.into(),
        }
    }

    /// Normalize a failure payload shaped as `{"error": {...}}`. A missing or
    /// non-object `error` value yields all sentinels.
    pub fn from_envelope(payload: &Value) -> Self {
        match payload.get("error") {
            Some(fields) => Self::from_fields(fields),
            None => Self::default(),
        }
    }

    /// Normalize a bare `{message, type, detail}` mapping, e.g. error details
    /// the instance nested under the `result` envelope.
    pub fn from_fields(fields: &Value) -> Self {
        let raw: RawErrorFields = serde_json::from_value(fields.clone()).unwrap_or_default();
        let mut error = Self::default();
        if let Some(message) = supplied_string(raw.message) {
            error.message = message;
        }
        if let Some(error_type) = supplied_string(raw.error_type) {
            error.error_type = error_type;
        }
        if let Some(detail) = supplied_string(raw.detail) {
            error.detail = detail;
        }
        error
    }
}

fn supplied_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Message: \"{}\" Type: \"{}\" Details: \"{}\"",
            self.message, self.error_type, self.detail
        )
    }
}
