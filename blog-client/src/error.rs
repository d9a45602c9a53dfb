use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    // HTTP ошибки
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    // Бизнес-логика ошибки
    #[error("Resource not found")]
    NotFound,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Ответ бэкенда с кодом ошибки
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    // Ошибки сериализации/десериализации
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GatewayError::Unauthorized(_))
    }

    /// The backend answered and refused the request or its credentials.
    /// Transport failures and 5xx responses are not rejections.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            GatewayError::Unauthorized(_)
                | GatewayError::Forbidden(_)
                | GatewayError::InvalidRequest(_)
        )
    }

    /// Text for inline form errors: the backend's own wording when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Unauthorized(message)
            | GatewayError::Forbidden(message)
            | GatewayError::InvalidRequest(message)
            | GatewayError::Backend { message, .. }
                if !message.is_empty() =>
            {
                message.clone()
            }
            other => other.to_string(),
        }
    }

    /// Maps a non-success status and its raw body to an error.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = ErrorBody::message_from(body);
        match status.as_u16() {
            401 => GatewayError::Unauthorized(message),
            403 => GatewayError::Forbidden(message),
            404 => GatewayError::NotFound,
            400 | 409 | 422 => GatewayError::InvalidRequest(message),
            code => GatewayError::Backend {
                status: code,
                message,
            },
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::SerializationError(err.to_string())
    }
}

/// Error payloads of the REST and auth services. Each service fills a
/// different subset of these fields.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    pub(crate) fn message_from(body: &str) -> String {
        let parsed = serde_json::from_str::<ErrorBody>(body).unwrap_or_default();
        parsed
            .message
            .or(parsed.msg)
            .or(parsed.error_description)
            .or(parsed.error)
            .unwrap_or_else(|| body.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn rest_error_body_uses_message() {
        let body = r#"{"code":"23502","details":null,"hint":null,"message":"null value in column \"title\""}"#;
        assert_eq!(
            ErrorBody::message_from(body),
            "null value in column \"title\""
        );
    }

    #[test]
    fn auth_error_body_prefers_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(ErrorBody::message_from(body), "Invalid login credentials");
    }

    #[test]
    fn plain_text_body_is_kept() {
        assert_eq!(ErrorBody::message_from("  upstream timeout \n"), "upstream timeout");
    }

    #[test]
    fn status_mapping() {
        assert!(GatewayError::from_status(StatusCode::NOT_FOUND, "").is_not_found());
        assert!(GatewayError::from_status(StatusCode::UNAUTHORIZED, "{}").is_unauthorized());
        assert!(matches!(
            GatewayError::from_status(StatusCode::FORBIDDEN, r#"{"message":"rls"}"#),
            GatewayError::Forbidden(m) if m == "rls"
        ));
        assert!(matches!(
            GatewayError::from_status(StatusCode::BAD_GATEWAY, "down"),
            GatewayError::Backend { status: 502, .. }
        ));
    }

    #[test]
    fn only_refusals_are_rejections() {
        let bad_grant = r#"{"error":"invalid_grant","error_description":"Invalid Refresh Token"}"#;
        assert!(GatewayError::from_status(StatusCode::BAD_REQUEST, bad_grant).is_rejection());
        assert!(GatewayError::from_status(StatusCode::UNAUTHORIZED, "{}").is_rejection());
        assert!(!GatewayError::from_status(StatusCode::SERVICE_UNAVAILABLE, "down").is_rejection());
        assert!(!GatewayError::SerializationError("eof".into()).is_rejection());
    }
}
