use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: err.to_string(),
        }
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Failures talking to the bookstore API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bookstore API unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status. `message` is what the
    /// server said, suitable for showing to the user as-is.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected response from bookstore API: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Form submissions rejected before any request is made.
#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} must be {expected}")]
    Invalid {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Please enter a valid years threshold")]
    YearsThreshold,

    #[error("Book '{0}' is not available for purchase")]
    NotPurchasable(String),
}

/// Why a form submission did not go through.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BOOKSTORE_API_URL is not a valid URL: {0}")]
    InvalidUrl(String),

    #[error("BOOKSTORE_API_URL must use http or https, got '{0}'")]
    UnsupportedScheme(String),
}
