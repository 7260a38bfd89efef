//! Error taxonomy for everything that talks to the notice API.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// A required field is missing or malformed (shown inline, no request sent)
    #[error("{0}")]
    Validation(String),

    /// Non-2xx response other than 401/409
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// 401 with an absent or rejected refresh token
    #[error("Session expired. Please login again.")]
    SessionExpired,

    /// 409 on create: the entity already exists
    #[error("{message}")]
    Conflict {
        message: String,
        existing: serde_json::Value,
    },

    /// Connection refused, DNS, timeout
    #[error("network error: {0}")]
    Transport(String),

    /// Body did not match the expected schema
    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("session storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Build an error from a non-2xx status and its (possibly empty) body.
    ///
    /// The message is taken from the JSON `error` field, then `message`,
    /// falling back to a generic status line.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let json: Option<serde_json::Value> = serde_json::from_slice(body).ok();
        let server_message = json.as_ref().and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });
        let message =
            server_message.unwrap_or_else(|| format!("Request failed with status {}", status));

        if status == 409 {
            let existing = json
                .and_then(|mut v| v.get_mut("existing_data").map(serde_json::Value::take))
                .unwrap_or(serde_json::Value::Null);
            return ApiError::Conflict { message, existing };
        }

        ApiError::RequestFailed { status, message }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(e: rusqlite::Error) -> Self {
        ApiError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_uses_error_field() {
        let err = ApiError::from_status(400, br#"{"error": "Email already exists"}"#);
        assert_eq!(
            err,
            ApiError::RequestFailed {
                status: 400,
                message: "Email already exists".to_string()
            }
        );
    }

    #[test]
    fn test_from_status_falls_back_to_message_field() {
        let err = ApiError::from_status(403, br#"{"message": "Unauthorized access!"}"#);
        assert_eq!(err.to_string(), "Unauthorized access!");
    }

    #[test]
    fn test_from_status_without_body() {
        let err = ApiError::from_status(502, b"<html>bad gateway</html>");
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[test]
    fn test_conflict_carries_existing_record() {
        let body = br#"{
            "error": "Teacher with Employee ID 'T1' already exists.",
            "existing_data": {"employee_id": "T1"}
        }"#;
        match ApiError::from_status(409, body) {
            ApiError::Conflict { message, existing } => {
                assert!(message.contains("T1"));
                assert_eq!(existing["employee_id"], "T1");
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }
}
