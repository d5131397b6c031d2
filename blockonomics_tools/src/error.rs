use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlockonomicsApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Could not reach Blockonomics: {0}")]
    RestResponseError(String),
    #[error("The request to Blockonomics timed out: {0}")]
    Timeout(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String, details: String },
}

impl From<reqwest::Error> for BlockonomicsApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_decode() {
            Self::JsonError(e.to_string())
        } else {
            Self::RestResponseError(e.to_string())
        }
    }
}
