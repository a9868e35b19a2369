use crate::services::bottle_service::BottleError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// One rejected request field, as returned in the `errors` list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// A lightweight wrapper for general errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    /// Field-level details, only set for validation failures.
    pub errors: Vec<FieldError>,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
            errors: Vec::new(),
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    /// Shortcut for 403 Forbidden
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, msg)
    }

    /// Shortcut for 401 Unauthorized
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, msg)
    }

    /// 400 Bad Request carrying every failed field rule.
    pub fn validation(errors: &ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, list)| {
                let field = camel_case(&field.to_string());
                list.iter().map(move |err| FieldError {
                    field: field.clone(),
                    code: err.code.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));

        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Validation failed".into(),
            errors: fields,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.message,
            "status": self.status.as_u16()
        });
        if !self.errors.is_empty() {
            body["errors"] = json!(self.errors);
        }

        (self.status, Json(body)).into_response()
    }
}

impl From<BottleError> for AppError {
    fn from(err: BottleError) -> Self {
        match err {
            BottleError::Validation(errors) => {
                tracing::debug!("rejected bottle input: {}", errors);
                AppError::validation(&errors)
            }
            BottleError::NotFound(id) => {
                tracing::info!("bottle {} not found", id);
                AppError::not_found("Bottle not found")
            }
            BottleError::NotOwner { id, user } => {
                tracing::info!("user {} denied access to bottle {}", user, id);
                AppError::forbidden("User not authorized")
            }
            BottleError::Sqlx(err) => {
                tracing::error!("database failure: {}", err);
                AppError::internal("Server Error")
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match &rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                StatusCode::BAD_REQUEST
            }
            other => other.status(),
        };
        let text = rejection.body_text();
        tracing::debug!("rejected request body: {}", text);

        if status != StatusCode::BAD_REQUEST {
            return AppError::new(status, text);
        }

        let code = match &rejection {
            JsonRejection::JsonDataError(_) => "type",
            _ => "syntax",
        };
        Self {
            status,
            message: "Validation failed".into(),
            errors: vec![FieldError {
                field: rejected_field(&text),
                code: code.into(),
                message: text,
            }],
        }
    }
}

/// Field path reported by serde ("...target type: count: invalid type ..."),
/// or `body` when the error is not tied to one key.
fn rejected_field(text: &str) -> String {
    let detail = text.split_once("target type: ").map_or(text, |(_, rest)| rest);
    match detail.split_once(": ") {
        Some((path, _)) if !path.is_empty() && !path.contains(char::is_whitespace) => {
            path.to_string()
        }
        _ => "body".to_string(),
    }
}

/// `cost_per_bottle` -> `costPerBottle`, matching the JSON body keys.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
