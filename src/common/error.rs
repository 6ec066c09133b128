// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::common::response::ApiResponse;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// O texto de cada variante é exatamente o que vai no campo `error` do envelope.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", describe_validation(.0))]
    ValidationError(#[from] validator::ValidationErrors),

    // JSON malformado, enum inválido, campo obrigatório da busca ausente...
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    DuplicateEmail(String),

    #[error("{0}")]
    NotFound(String),

    // Mensagem do provedor externo (ou do próprio cliente HTTP)
    #[error("{0}")]
    ExternalApi(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn lead_not_found() -> Self {
        AppError::NotFound("Lead not found".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::BadRequest(_)
            | AppError::DuplicateEmail(_)
            | AppError::ExternalApi(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// "Lead validation failed: email: Please add a valid email, firstName: ..."
fn describe_validation(errors: &validator::ValidationErrors) -> String {
    let mut details: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            let field = camel_case(&field);
            field_errors.iter().map(move |e| match &e.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: invalid ({})", field, e.code),
            })
        })
        .collect();
    details.sort();

    format!("Lead validation failed: {}", details.join(", "))
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            // O detalhe fica no log, o cliente recebe uma mensagem genérica.
            tracing::error!("Erro Interno do Servidor: {}", self);
            "An unexpected error occurred".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}
