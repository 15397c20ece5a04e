use serde::{Deserialize, Serialize};

/// Uniform `{success, data?, message?}` response shared by the backend,
/// the mock provider and the client's error paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success && self.data.is_some()
    }

    /// Split into data or a failure message, using `default_message` when the
    /// envelope carries none.
    pub fn into_result(self, default_message: &str) -> Result<T, String> {
        match self {
            Envelope {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            Envelope { message, .. } => {
                Err(message.unwrap_or_else(|| default_message.to_string()))
            }
        }
    }
}
