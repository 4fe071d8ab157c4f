use serde::Serialize;

/// Standardized wrapper for all successful JSON responses.
///
/// Every 2xx endpoint returns this structure:
/// ```json
/// {
///   "success": true,
///   "data": { ... }
/// }
/// ```
///
/// - `T` is the type of the `data` payload.
/// - `success` is always `true`; failures use [`ErrorResponse`] instead.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Constructs a success envelope around the given payload.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Standardized wrapper for all error responses.
///
/// ```json
/// {
///   "error": "Failed to fetch alerts",
///   "message": "Connection refused"
/// }
/// ```
///
/// `message` carries the underlying failure description when one exists;
/// authorization errors omit it entirely.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Constructs an error envelope with no detail message.
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    /// Constructs an error envelope carrying a failure description.
    pub fn with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: Some(message.into()),
        }
    }
}
