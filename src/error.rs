use lambda_http::{Body, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No records found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotFound => 404,
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Store(_) => 500,
        }
    }

    pub fn into_response(self) -> Response<Body> {
        let message = match &self {
            // store details stay in the logs, not in the response body
            ApiError::Store(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        let body = serde_json::json!({ "error": message }).to_string();

        Response::builder()
            .status(self.status_code())
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::BadRequest(format!("Invalid JSON: {e}"))
    }
}
