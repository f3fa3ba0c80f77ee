use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Regras que dependem de mais de um campo (ex: CPF obrigatório para pessoa física)
    #[error("{0}")]
    InvalidInput(String),

    #[error("Corpo da requisição inválido: {0}")]
    JsonRejection(#[from] JsonRejection),

    #[error("Parâmetros inválidos: {0}")]
    QueryRejection(#[from] QueryRejection),

    #[error("Identificador inválido: {0}")]
    PathRejection(#[from] PathRejection),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    UniqueConstraintViolation(String),

    // Registro ainda referenciado por outro (cliente com serviços, status em uso...)
    #[error("{0}")]
    ResourceInUse(String),

    #[error("Status inicial '{0}' não encontrado. Configure os status primeiro.")]
    InitialStatusMissing(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidInput(_)
            | AppError::JsonRejection(_)
            | AppError::QueryRejection(_)
            | AppError::PathRejection(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UniqueConstraintViolation(_) | AppError::ResourceInUse(_) => {
                StatusCode::CONFLICT
            }
            AppError::InitialStatusMissing(_)
            | AppError::FontNotFound(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converte os erros do `validator` em `campo -> [mensagens]`.
pub fn validation_details(errors: &validator::ValidationErrors) -> HashMap<String, Vec<String>> {
    let mut details = HashMap::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        details.insert(field.to_string(), messages);
    }
    details
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            AppError::ValidationError(errors) => json!({
                "error": "Um ou mais campos são inválidos.",
                "details": validation_details(errors),
            }),
            AppError::JsonRejection(rejection) => json!({
                "error": "Corpo da requisição inválido.",
                "details": rejection.body_text(),
            }),
            AppError::QueryRejection(rejection) => json!({
                "error": "Parâmetros inválidos",
                "details": rejection.body_text(),
            }),
            AppError::PathRejection(rejection) => json!({
                "error": "Identificador inválido.",
                "details": rejection.body_text(),
            }),
            AppError::InvalidInput(msg)
            | AppError::NotFound(msg)
            | AppError::UniqueConstraintViolation(msg)
            | AppError::ResourceInUse(msg) => json!({ "error": msg }),
            AppError::InitialStatusMissing(_) | AppError::FontNotFound(_) => {
                tracing::error!("{}", self);
                json!({ "error": self.to_string() })
            }
            // O detalhe vai para o log, o cliente recebe só a mensagem genérica.
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                tracing::error!("Erro Interno do Servidor: {:?}", self);
                json!({ "error": "Erro interno do servidor" })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Traduz violações de unicidade em 409, mantendo o resto como erro de banco.
pub fn map_unique_violation(e: sqlx::Error, message: impl FnOnce() -> String) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(message());
        }
    }
    e.into()
}

/// Traduz violações de chave estrangeira (ex: DELETE de registro referenciado) em 409.
pub fn map_foreign_key_violation(e: sqlx::Error, message: impl FnOnce() -> String) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return AppError::ResourceInUse(message());
        }
    }
    e.into()
}
