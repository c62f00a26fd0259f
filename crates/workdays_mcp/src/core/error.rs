pub use rmcp::ErrorData as McpError;
use rmcp::serde_json::json;

use crate::core::utils::AVAILABLE_RESOURCES;

// Error codes
const ERROR_UNSUPPORTED_PROVIDER: &str = "unsupported_provider";
const ERROR_UPSTREAM_UNAVAILABLE: &str = "upstream_unavailable";
const ERROR_INVALID_RESPONSE_SHAPE: &str = "invalid_response_shape";
const ERROR_UNSUPPORTED_TIMEZONE: &str = "unsupported_timezone";
const ERROR_INVALID_PARAMS: &str = "invalid_params";
const ERROR_CLIENT_ERROR: &str = "client_error";
const ERROR_RESOURCE_NOT_FOUND: &str = "resource_not_found";
const ERROR_LOGGING_INITIALIZATION: &str = "logging_initialization";

/// Custom error types for better error handling
#[derive(Debug, thiserror::Error)]
pub enum WorkdayServerError {
    #[error("unsupported provider: {provider}")]
    UnsupportedProvider { provider: String },
    #[error("Failed to fetch {url}: {message}")]
    UpstreamUnavailable { url: String, message: String },
    #[error("provider {provider} unavailable or invalid response: {reason}")]
    InvalidResponseShape { provider: String, reason: String },
    #[error("Unsupported timezone: {timezone}")]
    UnsupportedTimezone { timezone: String },
    #[error("Invalid parameters: {message}")]
    InvalidParams { message: String },
    #[error("HTTP client error: {message}")]
    ClientError { message: String },
    #[error("Resource not found: {uri}")]
    ResourceNotFound { uri: String },
    #[error("Logging initialization failed: {0}")]
    LoggingInitialization(String),
}

impl From<WorkdayServerError> for McpError {
    fn from(err: WorkdayServerError) -> Self {
        match err {
            WorkdayServerError::UnsupportedProvider { provider } => McpError::invalid_params(
                ERROR_UNSUPPORTED_PROVIDER,
                Some(json!({
                    "provider": provider,
                    "supported_providers": ["timor", "nate"]
                })),
            ),
            WorkdayServerError::UpstreamUnavailable { url, message } => McpError::internal_error(
                ERROR_UPSTREAM_UNAVAILABLE,
                Some(json!({ "url": url, "message": message })),
            ),
            WorkdayServerError::InvalidResponseShape { provider, reason } => {
                McpError::internal_error(
                    ERROR_INVALID_RESPONSE_SHAPE,
                    Some(json!({ "provider": provider, "reason": reason })),
                )
            }
            WorkdayServerError::UnsupportedTimezone { timezone } => McpError::invalid_params(
                ERROR_UNSUPPORTED_TIMEZONE,
                Some(json!({ "timezone": timezone })),
            ),
            WorkdayServerError::InvalidParams { message } => {
                McpError::invalid_params(ERROR_INVALID_PARAMS, Some(json!({ "message": message })))
            }
            WorkdayServerError::ClientError { message } => {
                McpError::internal_error(ERROR_CLIENT_ERROR, Some(json!({ "message": message })))
            }
            WorkdayServerError::ResourceNotFound { uri } => McpError::resource_not_found(
                ERROR_RESOURCE_NOT_FOUND,
                Some(json!({
                    "uri": uri,
                    "available_resources": AVAILABLE_RESOURCES
                })),
            ),
            WorkdayServerError::LoggingInitialization(message) => McpError::internal_error(
                ERROR_LOGGING_INITIALIZATION,
                Some(json!({ "message": message })),
            ),
        }
    }
}

pub type WorkdayServerResult<T> = Result<T, WorkdayServerError>;
pub type McpResult<T> = Result<T, McpError>;
