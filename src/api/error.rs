use thiserror::Error;

/// Failure taxonomy for calls against the FlowrSpot API.
///
/// Variants carry plain strings instead of the underlying reqwest error
/// so the type stays `Clone` and can travel inside application messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never reached the server or the connection dropped.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// HTTP 401: the stored token is missing, invalid, or expired.
    #[error("Session expired. Please log in again.")]
    Unauthorized,

    /// The response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The action requires a logged-in session and there is none.
    #[error("You have to be logged in for that.")]
    NotAuthenticated,
}

impl ApiError {
    /// Whether the stored session should be discarded because of this error.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Result alias used throughout the API modules.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_expires_session() {
        assert!(ApiError::Unauthorized.is_session_expired());
        assert!(!ApiError::Network("timeout".into()).is_session_expired());
        assert!(!ApiError::Status {
            status: 500,
            message: "oops".into()
        }
        .is_session_expired());
    }

    #[test]
    fn status_errors_display_the_server_message() {
        let err = ApiError::Status {
            status: 422,
            message: "Name can't be blank".into(),
        };
        assert_eq!(err.to_string(), "Name can't be blank");
    }
}
