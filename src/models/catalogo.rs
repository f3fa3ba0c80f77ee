// src/models/catalogo.rs
// Tabelas de apoio: status e tipos de serviço.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::not_blank;

// --- STATUS ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StatusServico {
    pub id_status_servico: Uuid,
    #[schema(example = "Em Andamento")]
    pub nome_status: String,
    #[schema(example = "Reparo em execução")]
    pub descricao: Option<String>,
    #[schema(example = 4)]
    pub ordem: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStatusServicoPayload {
    #[validate(custom(function = "not_blank", message = "Status de serviço é obrigatório."))]
    #[schema(example = "Aguardando Aprovação")]
    pub nome_status: String,

    pub descricao: Option<String>,

    #[validate(range(min = 0, message = "A ordem não pode ser negativa."))]
    pub ordem: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusServicoPayload {
    #[validate(custom(function = "not_blank", message = "Nome do status é obrigatório"))]
    pub nome_status: String,

    #[validate(custom(function = "not_blank", message = "Descrição do status é obrigatória"))]
    pub descricao: String,

    // Ausente mantém a ordem atual
    #[validate(range(min = 0, message = "A ordem não pode ser negativa."))]
    pub ordem: Option<i32>,
}

// --- TIPOS ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TipoServico {
    pub id_tipo_servico: Uuid,
    #[schema(example = "Formatação")]
    pub nome_tipo_servico: String,
    #[schema(example = "Formatação com backup e reinstalação do sistema")]
    pub descricao: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TipoServicoPayload {
    #[validate(custom(function = "not_blank", message = "Nome do tipo de serviço é obrigatório"))]
    #[schema(example = "Formatação")]
    pub nome_tipo_servico: String,

    #[validate(custom(function = "not_blank", message = "Descrição do tipo de serviço é obrigatória"))]
    #[schema(example = "Formatação com backup e reinstalação do sistema")]
    pub descricao: String,
}
