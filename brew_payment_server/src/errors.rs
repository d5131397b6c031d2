use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use brew_payment_engine::{traits::ProcessorError, OrderFlowError};
use log::error;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Could not reach the payment processor. {0}")]
    UpstreamUnavailable(String),
    /// The payment processor answered with an error. Its status code and message are passed on verbatim.
    #[error("{message}")]
    UpstreamRejected { status: u16, message: String, details: String },
    #[error("Order not found")]
    OrderNotFound(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("Could not read request: {0}")]
    InvalidRequest(String),
    #[error("Could not save order. {0}")]
    PersistenceError(String),
    #[error("Invalid or missing callback secret")]
    CallbackForbidden,
    #[error("Not found")]
    RouteNotFound,
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::UpstreamRejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            },
            Self::OrderNotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::PersistenceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::CallbackForbidden => StatusCode::FORBIDDEN,
            Self::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::UpstreamRejected { message, details, .. } => json!({ "error": message, "details": details }),
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::OrderNotFound(address) => Self::OrderNotFound(address),
            OrderFlowError::ValidationError(msg) => Self::ValidationError(msg),
            OrderFlowError::PersistenceError(msg) => {
                error!("💻️ Storage failure. {msg}");
                Self::PersistenceError(msg)
            },
            OrderFlowError::ProcessorError(e) => e.into(),
        }
    }
}

impl From<ProcessorError> for ServerError {
    fn from(e: ProcessorError) -> Self {
        match e {
            ProcessorError::Rejected { status, message, details } => {
                Self::UpstreamRejected { status, message, details }
            },
            ProcessorError::Unavailable(msg) => Self::UpstreamUnavailable(msg),
            ProcessorError::InvalidResponse(msg) => Self::UpstreamUnavailable(msg),
        }
    }
}
