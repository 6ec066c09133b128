// src/common/extract.rs

use axum::extract::{rejection::JsonRejection, FromRequest};

use crate::common::error::AppError;

// Igual ao `Json` do axum, mas a rejeição vira AppError (400 + envelope)
// em vez do 422 em texto puro.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
