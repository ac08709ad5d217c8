/// Error taxonomy shared by the extension agents and the web UI
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    /// The request never produced a response (fetch rejected, host API threw)
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {context}")]
    Http { status: u16, context: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Messaging error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Banner text shown to the user
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(_) => "Network error. Please check your connection and try again.".to_string(),
            AppError::Http { context, .. } => format!("Request failed: {}", context),
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Storage(_) => "Could not access extension storage.".to_string(),
            AppError::Transport(_) => "Could not reach the page. Try reloading it.".to_string(),
            AppError::Serialization(_) => "Received unexpected data.".to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for AppError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Network(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let err = AppError::Validation("Please enter a board name".to_string());
        assert_eq!(err.user_message(), "Please enter a board name");
    }

    #[test]
    fn test_http_display() {
        let err = AppError::Http { status: 500, context: "GET /api/boards".to_string() };
        assert_eq!(err.to_string(), "HTTP 500 from GET /api/boards");
    }

    #[test]
    fn test_from_serde_json() {
        let err: AppError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
