use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorType {
    ConnectionRefused,
    Timeout,
    SessionExpired, // 401 that survived the refresh
    Forbidden,      // HTTP 403
    NotFound,       // HTTP 404
    Conflict,       // HTTP 409
    ServerError,    // HTTP 500+
    NetworkError,   // DNS, routing, etc.
    Validation,
    Other,
}

/// Classify an API error for display
pub fn classify_error(error: &ApiError) -> ErrorType {
    match error {
        ApiError::SessionExpired => ErrorType::SessionExpired,
        ApiError::Validation(_) => ErrorType::Validation,
        ApiError::Conflict { .. } => ErrorType::Conflict,
        ApiError::RequestFailed { status, .. } => match status {
            403 => ErrorType::Forbidden,
            404 => ErrorType::NotFound,
            409 => ErrorType::Conflict,
            500..=599 => ErrorType::ServerError,
            _ => ErrorType::Other,
        },
        ApiError::Transport(msg) => {
            let msg = msg.to_lowercase();
            if msg.contains("connection refused") {
                ErrorType::ConnectionRefused
            } else if msg.contains("timeout") || msg.contains("timed out") {
                ErrorType::Timeout
            } else {
                ErrorType::NetworkError
            }
        }
        ApiError::Decode(_) | ApiError::Storage(_) => ErrorType::Other,
    }
}

/// Banner text for an error. Server messages are shown verbatim.
pub fn format_error_message(error: &ApiError) -> String {
    match classify_error(error) {
        ErrorType::ConnectionRefused => "Cannot reach the server (connection refused)".to_string(),
        ErrorType::Timeout => "The server did not respond in time".to_string(),
        _ => error.to_string(),
    }
}

/// Whether the error should send the user back to the login screen
pub fn requires_login(error: &ApiError) -> bool {
    classify_error(error) == ErrorType::SessionExpired
}
