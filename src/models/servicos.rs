// src/models/servicos.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        pagination::{search_pattern, PageRequest},
        serde_helpers::{apply_patch, double_option, empty_string_as_none},
        validation::{not_blank, valor_monetario},
    },
    models::{
        catalogo::{StatusServico, TipoServico},
        clientes::TipoPessoa,
    },
};

// --- ORDEM DE SERVIÇO ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Servico {
    pub id_servico: Uuid,
    pub id_cliente: Uuid,
    pub id_tipo_servico: Uuid,
    pub id_status_atual: Uuid,

    #[schema(example = "Notebook não liga")]
    pub descricao_problema: String,
    #[schema(example = "Notebook 15 polegadas")]
    pub equipamento_descricao: Option<String>,
    #[schema(example = "Dell")]
    pub equipamento_marca: Option<String>,
    pub equipamento_modelo: Option<String>,
    pub equipamento_num_serie: Option<String>,

    pub data_entrada: DateTime<Utc>,
    pub data_previsao_saida: Option<DateTime<Utc>>,
    pub data_efetiva_saida: Option<DateTime<Utc>>,

    #[schema(example = "350.00")]
    pub valor_servico: Option<Decimal>,
    pub valor_pecas: Option<Decimal>,
    pub valor_mao_de_obra: Option<Decimal>,

    pub descricao_solucao: Option<String>,
    pub observacoes_internas: Option<String>,

    pub data_criacao: DateTime<Utc>,
    pub data_atualizacao: DateTime<Utc>,
}

/// Campos graváveis de uma OS (o status atual é tratado à parte por causa do histórico).
#[derive(Debug, Clone, PartialEq)]
pub struct ServicoDados {
    pub id_cliente: Uuid,
    pub id_tipo_servico: Uuid,
    pub descricao_problema: String,
    pub equipamento_descricao: Option<String>,
    pub equipamento_marca: Option<String>,
    pub equipamento_modelo: Option<String>,
    pub equipamento_num_serie: Option<String>,
    pub data_previsao_saida: Option<DateTime<Utc>>,
    pub data_efetiva_saida: Option<DateTime<Utc>>,
    pub valor_servico: Option<Decimal>,
    pub valor_pecas: Option<Decimal>,
    pub valor_mao_de_obra: Option<Decimal>,
    pub descricao_solucao: Option<String>,
    pub observacoes_internas: Option<String>,
}

impl From<Servico> for ServicoDados {
    fn from(s: Servico) -> Self {
        Self {
            id_cliente: s.id_cliente,
            id_tipo_servico: s.id_tipo_servico,
            descricao_problema: s.descricao_problema,
            equipamento_descricao: s.equipamento_descricao,
            equipamento_marca: s.equipamento_marca,
            equipamento_modelo: s.equipamento_modelo,
            equipamento_num_serie: s.equipamento_num_serie,
            data_previsao_saida: s.data_previsao_saida,
            data_efetiva_saida: s.data_efetiva_saida,
            valor_servico: s.valor_servico,
            valor_pecas: s.valor_pecas,
            valor_mao_de_obra: s.valor_mao_de_obra,
            descricao_solucao: s.descricao_solucao,
            observacoes_internas: s.observacoes_internas,
        }
    }
}

// --- HISTÓRICO ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HistoricoServico {
    pub id_historico_servico: Uuid,
    pub id_servico: Uuid,
    pub id_status_anterior: Option<Uuid>,
    pub id_status_novo: Uuid,
    pub data_alteracao: DateTime<Utc>,
    #[schema(example = "Status alterado via API")]
    pub observacao: Option<String>,
}

/// Linha de histórico com os nomes dos status, para a tela de detalhe.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct HistoricoServicoDetalhe {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub historico: HistoricoServico,
    #[schema(example = "Pendente")]
    pub nome_status_anterior: Option<String>,
    #[schema(example = "Em Andamento")]
    pub nome_status_novo: String,
}

// --- LISTAGEM ---

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClienteResumo {
    pub id_cliente: Uuid,
    pub nome_completo: Option<String>,
    pub razao_social: Option<String>,
    pub tipo_pessoa: TipoPessoa,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TipoServicoResumo {
    pub id_tipo_servico: Uuid,
    pub nome_tipo_servico: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusResumo {
    pub id_status_servico: Uuid,
    pub nome_status: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServicoResumo {
    #[serde(flatten)]
    pub servico: Servico,
    pub cliente: ClienteResumo,
    pub tipo_servico: TipoServicoResumo,
    pub status_atual: StatusResumo,
}

// Linha "achatada" do JOIN, convertida em ServicoResumo
#[derive(Debug, FromRow)]
pub struct ServicoResumoRow {
    #[sqlx(flatten)]
    pub servico: Servico,
    pub cliente_tipo_pessoa: TipoPessoa,
    pub cliente_nome_completo: Option<String>,
    pub cliente_razao_social: Option<String>,
    pub nome_tipo_servico: String,
    pub nome_status: String,
}

impl From<ServicoResumoRow> for ServicoResumo {
    fn from(row: ServicoResumoRow) -> Self {
        Self {
            cliente: ClienteResumo {
                id_cliente: row.servico.id_cliente,
                nome_completo: row.cliente_nome_completo,
                razao_social: row.cliente_razao_social,
                tipo_pessoa: row.cliente_tipo_pessoa,
            },
            tipo_servico: TipoServicoResumo {
                id_tipo_servico: row.servico.id_tipo_servico,
                nome_tipo_servico: row.nome_tipo_servico,
            },
            status_atual: StatusResumo {
                id_status_servico: row.servico.id_status_atual,
                nome_status: row.nome_status,
            },
            servico: row.servico,
        }
    }
}

// --- DETALHE ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ClienteContato {
    pub id_cliente: Uuid,
    pub nome_completo: Option<String>,
    pub razao_social: Option<String>,
    pub tipo_pessoa: TipoPessoa,
    pub email: String,
    pub telefone_principal: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServicoDetalhe {
    #[serde(flatten)]
    pub servico: Servico,
    pub cliente: ClienteContato,
    pub tipo_servico: TipoServico,
    pub status_atual: StatusServico,
    pub historico: Vec<HistoricoServicoDetalhe>,
}

// --- FILTROS ---

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServicoListParams {
    #[param(example = 1)]
    pub page: Option<i64>,
    #[param(example = 10)]
    pub limit: Option<i64>,
    /// Busca por nº da OS, problema, equipamento ou nome do cliente
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    /// Filtra pelo status atual
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<Uuid>)]
    pub status_filter: Option<Uuid>,
}

impl ServicoListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    pub fn search_pattern(&self) -> Option<String> {
        search_pattern(self.search.as_deref())
    }
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateServicoPayload {
    pub id_cliente: Uuid,
    pub id_tipo_servico: Uuid,

    #[validate(custom(function = "not_blank", message = "Descrição do problema é obrigatória."))]
    #[schema(example = "Notebook não liga")]
    pub descricao_problema: String,

    pub equipamento_descricao: Option<String>,
    pub equipamento_marca: Option<String>,
    pub equipamento_modelo: Option<String>,
    pub equipamento_num_serie: Option<String>,

    pub data_previsao_saida: Option<DateTime<Utc>>,

    #[validate(custom(function = "valor_monetario"))]
    pub valor_servico: Option<Decimal>,
    #[validate(custom(function = "valor_monetario"))]
    pub valor_pecas: Option<Decimal>,
    #[validate(custom(function = "valor_monetario"))]
    pub valor_mao_de_obra: Option<Decimal>,

    pub descricao_solucao: Option<String>,
    pub observacoes_internas: Option<String>,
}

impl CreateServicoPayload {
    pub fn into_dados(self) -> ServicoDados {
        ServicoDados {
            id_cliente: self.id_cliente,
            id_tipo_servico: self.id_tipo_servico,
            descricao_problema: self.descricao_problema.trim().to_string(),
            equipamento_descricao: self.equipamento_descricao,
            equipamento_marca: self.equipamento_marca,
            equipamento_modelo: self.equipamento_modelo,
            equipamento_num_serie: self.equipamento_num_serie,
            data_previsao_saida: self.data_previsao_saida,
            data_efetiva_saida: None,
            valor_servico: self.valor_servico,
            valor_pecas: self.valor_pecas,
            valor_mao_de_obra: self.valor_mao_de_obra,
            descricao_solucao: self.descricao_solucao,
            observacoes_internas: self.observacoes_internas,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateServicoPayload {
    pub id_cliente: Option<Uuid>,
    pub id_tipo_servico: Option<Uuid>,
    /// Novo status; gera uma linha de histórico quando muda
    pub id_status_atual: Option<Uuid>,

    #[validate(custom(function = "not_blank", message = "Descrição do problema é obrigatória."))]
    pub descricao_problema: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub equipamento_descricao: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub equipamento_marca: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub equipamento_modelo: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub equipamento_num_serie: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub data_previsao_saida: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub data_efetiva_saida: Option<Option<DateTime<Utc>>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub valor_servico: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub valor_pecas: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub valor_mao_de_obra: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub descricao_solucao: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub observacoes_internas: Option<Option<String>>,

    /// Observação gravada no histórico quando o status muda
    #[schema(example = "Peça chegou, iniciando reparo")]
    pub observacao_mudanca_status: Option<String>,
}

impl UpdateServicoPayload {
    /// Os valores monetários do patch são `Option<Option<_>>`, então a regra
    /// de `valor_monetario` é aplicada aqui e não pelo derive.
    pub fn check_valores(&self) -> Result<(), validator::ValidationErrors> {
        let mut errors = validator::ValidationErrors::new();
        for (field, value) in [
            ("valor_servico", &self.valor_servico),
            ("valor_pecas", &self.valor_pecas),
            ("valor_mao_de_obra", &self.valor_mao_de_obra),
        ] {
            if let Some(Some(v)) = value {
                if let Err(err) = valor_monetario(v) {
                    errors.add(field, err);
                }
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    pub fn apply_to(&self, mut dados: ServicoDados) -> ServicoDados {
        if let Some(id) = self.id_cliente {
            dados.id_cliente = id;
        }
        if let Some(id) = self.id_tipo_servico {
            dados.id_tipo_servico = id;
        }
        if let Some(descricao) = &self.descricao_problema {
            dados.descricao_problema = descricao.trim().to_string();
        }
        apply_patch(&mut dados.equipamento_descricao, self.equipamento_descricao.clone());
        apply_patch(&mut dados.equipamento_marca, self.equipamento_marca.clone());
        apply_patch(&mut dados.equipamento_modelo, self.equipamento_modelo.clone());
        apply_patch(&mut dados.equipamento_num_serie, self.equipamento_num_serie.clone());
        apply_patch(&mut dados.data_previsao_saida, self.data_previsao_saida);
        apply_patch(&mut dados.data_efetiva_saida, self.data_efetiva_saida);
        apply_patch(&mut dados.valor_servico, self.valor_servico);
        apply_patch(&mut dados.valor_pecas, self.valor_pecas);
        apply_patch(&mut dados.valor_mao_de_obra, self.valor_mao_de_obra);
        apply_patch(&mut dados.descricao_solucao, self.descricao_solucao.clone());
        apply_patch(&mut dados.observacoes_internas, self.observacoes_internas.clone());
        dados
    }
}

/// Decide se a atualização gera linha de histórico: só quando o status muda de fato.
pub fn status_transition(atual: Uuid, solicitado: Option<Uuid>) -> Option<(Uuid, Uuid)> {
    match solicitado {
        Some(novo) if novo != atual => Some((atual, novo)),
        _ => None,
    }
}

pub const OBSERVACAO_CRIACAO: &str = "Serviço criado";
pub const OBSERVACAO_MUDANCA_PADRAO: &str = "Status alterado via API";
