//! Request body extraction that reports malformed JSON through `AppError`.

use crate::errors::AppError;
use axum::extract::FromRequest;

/// `axum::Json` with the rejection mapped into the field-error response.
#[derive(FromRequest, Debug)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
