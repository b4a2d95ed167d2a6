//! Typed errors and HTTP mapping.
//!
//! Two families: `AppError` is a fault that aborts the call (bad invocation,
//! broken configuration, database failure). `FormError` is an expected business
//! outcome (denied, not configured, record gone) and travels inside a successful
//! response so the client can render it inline.

use crate::locale::Locale;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing reference: {kind} '{id}'")]
    MissingReference { kind: &'static str, id: String },
    #[error("duplicate {kind}: {name}")]
    DuplicateName { kind: &'static str, name: String },
    #[error("invalid primary field: entity {entity} field {field}")]
    InvalidPrimaryField { entity: String, field: String },
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid invocation: {0}")]
    InvalidInvocation(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    /// Broken process state, not the caller's fault.
    #[error("internal: {0}")]
    Internal(String),
}

/// Which check refused the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeniedAction {
    /// Adding a detail (slave) record under a master record.
    CreateDetail,
    Create,
    Read,
    Update,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormErrorKind {
    PermissionDenied(DeniedAction),
    NotConfigured,
    RecordUnavailable,
}

/// Guarded failure of a form build. Serializes as `{ "error": "<message>" }`.
#[derive(Error, Clone, Debug, Serialize)]
#[error("{error}")]
pub struct FormError {
    #[serde(skip)]
    pub kind: FormErrorKind,
    pub error: String,
}

impl FormError {
    pub fn new(kind: FormErrorKind, locale: Locale) -> Self {
        FormError {
            kind,
            error: locale.form_error(kind).to_string(),
        }
    }

    pub fn denied(action: DeniedAction, locale: Locale) -> Self {
        Self::new(FormErrorKind::PermissionDenied(action), locale)
    }

    pub fn not_configured(locale: Locale) -> Self {
        Self::new(FormErrorKind::NotConfigured, locale)
    }

    pub fn record_unavailable(locale: Locale) -> Self {
        Self::new(FormErrorKind::RecordUnavailable, locale)
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::InvalidInvocation(_) => (StatusCode::BAD_REQUEST, "invalid_invocation"),
            AppError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "form request failed");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn internal_faults_are_server_errors() {
        let res = AppError::Internal("in-memory store lock poisoned".into()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "internal_error");
        assert!(body["error"].get("details").is_none());
    }

    #[test]
    fn invocation_faults_are_client_errors() {
        let res = AppError::InvalidInvocation("entity name is required".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
