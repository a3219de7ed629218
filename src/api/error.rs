use thiserror::Error;

/// Message shown for any transport-level failure
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

/// Fallback when a non-2xx response carries no usable `error` field
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

pub const NOT_AUTHENTICATED_MESSAGE: &str = "Not authenticated";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error. Please check your connection.")]
    Transport(#[from] reqwest::Error),

    #[error("Network error. Please check your connection.")]
    Decode(#[from] serde_json::Error),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Build a server error from a non-2xx status and its raw body
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            error: Option<String>,
        }

        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());

        ApiError::Server { status, message }
    }

    /// HTTP status for server errors, `None` for everything else
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Decode(_))
    }
}

impl From<keyring::Error> for ApiError {
    fn from(err: keyring::Error) -> Self {
        ApiError::Storage(err.to_string())
    }
}

impl From<aes_gcm::Error> for ApiError {
    fn from(err: aes_gcm::Error) -> Self {
        ApiError::Storage(format!("encryption failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_is_verbatim() {
        let err = ApiError::from_response(409, br#"{"error":"email already exists"}"#);
        assert_eq!(err.to_string(), "email already exists");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_missing_error_field_uses_fallback() {
        let bodies: [&[u8]; 4] = [b"", b"not json", br#"{"message":"nope"}"#, br#"{"error":""}"#];
        for body in bodies {
            let err = ApiError::from_response(500, body);
            assert_eq!(err.to_string(), GENERIC_ERROR_MESSAGE);
        }
    }

    #[test]
    fn test_decode_failure_shows_network_message() {
        let err: ApiError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
        assert!(err.is_transport());
    }
}
