use serde::Serialize;

/// Envelope for every response body: exactly one of `Data` or `Error`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    #[serde(rename = "Data", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(rename = "Error", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Body of mutations that have nothing else to report.
pub const OK: &str = "OK";
