use serde::Serialize;

/// Envelope around every response body.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub status: u16,
    pub message: String,
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            timestamp: now(),
            data: Some(data),
            error: None,
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            timestamp: now(),
            data: None,
            error: Some(ApiErrorBody {
                status,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
