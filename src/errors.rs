use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Conflict")]
    Conflict,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::Conflict => AppError::Conflict,
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::Unavailable(msg) => AppError::Unavailable(msg),
            DomainError::MalformedRecord(_) | DomainError::Internal(_) => {
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Conflict => HttpResponse::Conflict().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Unavailable(_) => {
                log::error!("{}", self);
                HttpResponse::ServiceUnavailable().json(serde_json::json!({
                    "error": "Service unavailable"
                }))
            }
            AppError::Internal(_) => {
                log::error!("{}", self);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}
