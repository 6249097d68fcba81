use thiserror::Error;

pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to fetch data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Transport,
    Status(u16),
    Decode,
    Rejected,
}

impl ApiErrorKind {
    /// Stable label for log fields.
    pub fn code(self) -> &'static str {
        match self {
            Self::Transport => "API_TRANSPORT_FAILED",
            Self::Status(_) => "API_STATUS_FAILED",
            Self::Decode => "API_DECODE_FAILED",
            Self::Rejected => "API_REJECTED",
        }
    }
}

/// Any failed backend call. `message` is what the user gets to see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport() -> Self {
        Self::new(ApiErrorKind::Transport, GENERIC_FAILURE_MESSAGE)
    }

    pub fn decode() -> Self {
        Self::new(ApiErrorKind::Decode, GENERIC_FAILURE_MESSAGE)
    }

    /// Non-2xx response. Prefers the body's `message`; a JSON body without one
    /// falls back to the status line, an unparseable body to the generic text.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => body_message(&value)
                .unwrap_or_else(|| format!("HTTP error! status: {status}")),
            Err(_) => GENERIC_FAILURE_MESSAGE.to_owned(),
        };

        Self::new(ApiErrorKind::Status(status), message)
    }

    /// 2xx envelope that reported `success: false`.
    pub fn rejected(message: Option<String>) -> Self {
        let message = message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_owned());
        Self::new(ApiErrorKind::Rejected, message)
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn body_message(value: &serde_json::Value) -> Option<String> {
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_prefers_body_message() {
        let error = ApiError::from_status(404, r#"{"error":true,"message":"Cliente não encontrado","code":404}"#);

        assert_eq!(error.to_string(), "Cliente não encontrado");
        assert_eq!(error.kind(), ApiErrorKind::Status(404));
    }

    #[test]
    fn status_error_without_message_uses_status_line() {
        let error = ApiError::from_status(500, r#"{"error":true}"#);

        assert_eq!(error.message(), "HTTP error! status: 500");
    }

    #[test]
    fn status_error_with_unparseable_body_uses_generic_message() {
        let error = ApiError::from_status(502, "<html>Bad Gateway</html>");

        assert_eq!(error.message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(error.kind(), ApiErrorKind::Status(502));
    }

    #[test]
    fn rejected_without_message_falls_back_to_generic() {
        assert_eq!(ApiError::rejected(None).message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(
            ApiError::rejected(Some("Parâmetros inválidos".to_owned())).message(),
            "Parâmetros inválidos"
        );
    }
}
