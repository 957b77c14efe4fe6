use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("jwt error: {0}")]
    JWTError(#[from] jsonwebtoken::errors::Error),

    #[error("http client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("business error: {0}")]
    BusinessError(String),

    #[error("Please fill out these required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("invalid {field}: {value}")]
    InvalidField { field: String, value: String },

    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("unauthorized")]
    Unauthorized,

    #[error("You are not authorized to edit this activity")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),

    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("server error: {0}")]
    ServerError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn invalid_field(field: &str, value: &str) -> Self {
        Self::InvalidField {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingFields(_) | Error::InvalidField { .. } => StatusCode::BAD_REQUEST,
            Error::BusinessError(_) => StatusCode::CONFLICT,
            Error::InvalidCredentials | Error::Unauthorized | Error::JWTError(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Remote { status, .. } => StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(status).json(json!({ "success": false, "error": self.to_string() }))
    }
}
