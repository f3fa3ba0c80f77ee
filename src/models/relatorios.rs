// src/models/relatorios.rs

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::{error::AppError, serde_helpers::empty_string_as_none},
    models::clientes::{nome_exibicao, TipoPessoa},
};

// --- ENUMS DE FILTRO ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Formato {
    #[default]
    Json,
    Csv,
    Pdf,
}

impl FromStr for Formato {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Formato::Json),
            "csv" => Ok(Formato::Csv),
            "pdf" => Ok(Formato::Pdf),
            other => Err(format!("formato '{}' inválido (use json, csv ou pdf)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum FiltroTipoPessoa {
    Fisica,
    Juridica,
    #[default]
    Todos,
}

impl FiltroTipoPessoa {
    pub fn tipo_pessoa(&self) -> Option<TipoPessoa> {
        match self {
            FiltroTipoPessoa::Fisica => Some(TipoPessoa::Fisica),
            FiltroTipoPessoa::Juridica => Some(TipoPessoa::Juridica),
            FiltroTipoPessoa::Todos => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FiltroTipoPessoa::Fisica => "FISICA",
            FiltroTipoPessoa::Juridica => "JURIDICA",
            FiltroTipoPessoa::Todos => "TODOS",
        }
    }
}

impl FromStr for FiltroTipoPessoa {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FISICA" => Ok(FiltroTipoPessoa::Fisica),
            "JURIDICA" => Ok(FiltroTipoPessoa::Juridica),
            "TODOS" => Ok(FiltroTipoPessoa::Todos),
            other => Err(format!("tipo_pessoa_cliente '{}' inválido", other)),
        }
    }
}

/// Datas chegam em ISO 8601 com fuso. Um `+` não codificado na URL vira espaço,
/// então ele é restaurado antes do parse.
pub fn parse_data_param(campo: &str, valor: &str) -> Result<DateTime<FixedOffset>, AppError> {
    let normalizado = valor.trim().replace(' ', "+");
    DateTime::parse_from_rfc3339(&normalizado).map_err(|_| {
        AppError::InvalidInput(format!(
            "Parâmetros inválidos: '{}' deve estar no formato ISO 8601 com fuso (ex: 2024-01-31T23:59:59-03:00).",
            campo
        ))
    })
}

fn check_intervalo(
    inicio: Option<&DateTime<FixedOffset>>,
    fim: Option<&DateTime<FixedOffset>>,
) -> Result<(), AppError> {
    if let (Some(inicio), Some(fim)) = (inicio, fim) {
        if inicio > fim {
            return Err(AppError::InvalidInput(
                "A data de início deve ser anterior à data de fim.".into(),
            ));
        }
    }
    Ok(())
}

// --- FATURAMENTO ---

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FaturamentoQuery {
    /// json (padrão), csv ou pdf
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<Formato>)]
    pub formato: Option<Formato>,
    /// Início do período (data de saída), ISO 8601 com fuso
    #[param(example = "2024-01-01T00:00:00-03:00")]
    pub data_inicio: Option<String>,
    /// Fim do período (data de saída), ISO 8601 com fuso
    #[param(example = "2024-01-31T23:59:59-03:00")]
    pub data_fim: Option<String>,
    /// FISICA, JURIDICA ou TODOS (padrão)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<FiltroTipoPessoa>)]
    pub tipo_pessoa_cliente: Option<FiltroTipoPessoa>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FiltroFaturamento {
    pub formato: Formato,
    pub inicio: DateTime<FixedOffset>,
    pub fim: DateTime<FixedOffset>,
    pub tipo_cliente: FiltroTipoPessoa,
}

impl FaturamentoQuery {
    pub fn into_filtro(self) -> Result<FiltroFaturamento, AppError> {
        let (Some(inicio), Some(fim)) = (
            self.data_inicio.filter(|s| !s.trim().is_empty()),
            self.data_fim.filter(|s| !s.trim().is_empty()),
        ) else {
            return Err(AppError::InvalidInput("Datas de início e fim são obrigatórias.".into()));
        };

        let inicio = parse_data_param("data_inicio", &inicio)?;
        let fim = parse_data_param("data_fim", &fim)?;
        check_intervalo(Some(&inicio), Some(&fim))?;

        Ok(FiltroFaturamento {
            formato: self.formato.unwrap_or_default(),
            inicio,
            fim,
            tipo_cliente: self.tipo_pessoa_cliente.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct FaturamentoLinha {
    pub id_servico: Uuid,
    pub data_efetiva_saida: DateTime<Utc>,
    pub tipo_pessoa: TipoPessoa,
    pub nome_completo: Option<String>,
    pub razao_social: Option<String>,
    pub email: String,
    pub nome_tipo_servico: String,
    #[schema(example = "350.00")]
    pub valor_servico: Decimal,
}

impl FaturamentoLinha {
    pub fn nome_cliente(&self) -> &str {
        nome_exibicao(self.tipo_pessoa, self.nome_completo.as_deref(), self.razao_social.as_deref())
            .unwrap_or("N/A")
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Periodo {
    #[schema(value_type = String, format = DateTime)]
    pub inicio: DateTime<FixedOffset>,
    #[schema(value_type = String, format = DateTime)]
    pub fim: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RelatorioFaturamento {
    pub data: Vec<FaturamentoLinha>,
    #[serde(rename = "totalFaturado")]
    #[schema(example = "1250.00")]
    pub total_faturado: Decimal,
    pub periodo: Periodo,
    pub filtro_tipo_cliente: FiltroTipoPessoa,
}

impl RelatorioFaturamento {
    pub fn new(data: Vec<FaturamentoLinha>, filtro: &FiltroFaturamento) -> Self {
        let total_faturado = data.iter().map(|l| l.valor_servico).sum();
        Self {
            data,
            total_faturado,
            periodo: Periodo {
                inicio: filtro.inicio,
                fim: filtro.fim,
            },
            filtro_tipo_cliente: filtro.tipo_cliente,
        }
    }
}

// --- SERVIÇOS POR STATUS ---

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServicosStatusQuery {
    /// json (padrão), csv ou pdf
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<Formato>)]
    pub formato: Option<Formato>,
    /// Filtra por um status específico
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<Uuid>)]
    pub status_id: Option<Uuid>,
    /// Data de entrada mínima, ISO 8601 com fuso
    pub data_inicio: Option<String>,
    /// Data de entrada máxima, ISO 8601 com fuso
    pub data_fim: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FiltroServicosStatus {
    pub formato: Formato,
    pub status_id: Option<Uuid>,
    pub inicio: Option<DateTime<FixedOffset>>,
    pub fim: Option<DateTime<FixedOffset>>,
}

impl ServicosStatusQuery {
    pub fn into_filtro(self) -> Result<FiltroServicosStatus, AppError> {
        let inicio = self
            .data_inicio
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_data_param("data_inicio", &s))
            .transpose()?;
        let fim = self
            .data_fim
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_data_param("data_fim", &s))
            .transpose()?;
        check_intervalo(inicio.as_ref(), fim.as_ref())?;

        Ok(FiltroServicosStatus {
            formato: self.formato.unwrap_or_default(),
            status_id: self.status_id,
            inicio,
            fim,
        })
    }
}

impl FiltroServicosStatus {
    /// Linha de período do cabeçalho do PDF, se houver filtro de datas.
    pub fn descricao_periodo(&self) -> Option<String> {
        let fmt = |d: &DateTime<FixedOffset>| d.format("%d/%m/%Y").to_string();
        match (&self.inicio, &self.fim) {
            (Some(i), Some(f)) => Some(format!("Período: {} a {}", fmt(i), fmt(f))),
            (Some(i), None) => Some(format!("A partir de: {}", fmt(i))),
            (None, Some(f)) => Some(format!("Até: {}", fmt(f))),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ServicoStatusLinha {
    pub id_servico: Uuid,
    pub tipo_pessoa: TipoPessoa,
    pub nome_completo: Option<String>,
    pub razao_social: Option<String>,
    pub nome_tipo_servico: String,
    pub data_entrada: DateTime<Utc>,
    pub nome_status: String,
    pub valor_servico: Option<Decimal>,
}

impl ServicoStatusLinha {
    pub fn nome_cliente(&self) -> &str {
        nome_exibicao(self.tipo_pessoa, self.nome_completo.as_deref(), self.razao_social.as_deref())
            .unwrap_or("N/A")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(inicio: &str, fim: &str) -> FaturamentoQuery {
        FaturamentoQuery {
            data_inicio: Some(inicio.to_string()),
            data_fim: Some(fim.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn faturamento_defaults_to_json_and_todos() {
        let filtro = query("2024-01-01T00:00:00-03:00", "2024-01-31T23:59:59-03:00")
            .into_filtro()
            .unwrap();
        assert_eq!(filtro.formato, Formato::Json);
        assert_eq!(filtro.tipo_cliente, FiltroTipoPessoa::Todos);
        assert_eq!(filtro.tipo_cliente.tipo_pessoa(), None);
    }

    #[test]
    fn faturamento_requires_both_dates() {
        let q = FaturamentoQuery {
            data_inicio: Some("2024-01-01T00:00:00Z".into()),
            ..Default::default()
        };
        match q.into_filtro() {
            Err(AppError::InvalidInput(msg)) => assert_eq!(msg, "Datas de início e fim são obrigatórias."),
            other => panic!("esperava InvalidInput, veio {:?}", other),
        }
    }

    #[test]
    fn faturamento_rejects_inverted_range_and_bad_dates() {
        assert!(matches!(
            query("2024-02-01T00:00:00Z", "2024-01-01T00:00:00Z").into_filtro(),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            query("01/01/2024", "2024-01-31T00:00:00Z").into_filtro(),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn plus_sign_decoded_as_space_is_restored() {
        let data = parse_data_param("data_inicio", "2024-01-01T10:00:00 03:00").unwrap();
        assert_eq!(data.offset().local_minus_utc(), 3 * 3600);
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!("PDF".parse::<Formato>().unwrap(), Formato::Pdf);
        assert_eq!("juridica".parse::<FiltroTipoPessoa>().unwrap(), FiltroTipoPessoa::Juridica);
        assert!("xml".parse::<Formato>().is_err());
    }

    #[test]
    fn servicos_status_period_description() {
        let filtro = ServicosStatusQuery {
            data_inicio: Some("2024-03-05T00:00:00-03:00".into()),
            ..Default::default()
        }
        .into_filtro()
        .unwrap();
        assert_eq!(filtro.descricao_periodo().as_deref(), Some("A partir de: 05/03/2024"));

        let filtro = ServicosStatusQuery::default().into_filtro().unwrap();
        assert_eq!(filtro.descricao_periodo(), None);
        assert_eq!(filtro.formato, Formato::Json);
    }

    #[test]
    fn total_faturado_sums_values() {
        let filtro = query("2024-01-01T00:00:00Z", "2024-01-31T00:00:00Z").into_filtro().unwrap();
        let linha = |valor: i64| FaturamentoLinha {
            id_servico: Uuid::new_v4(),
            data_efetiva_saida: Utc::now(),
            tipo_pessoa: TipoPessoa::Juridica,
            nome_completo: None,
            razao_social: Some("ACME".into()),
            email: "a@acme.com".into(),
            nome_tipo_servico: "Reparo".into(),
            valor_servico: Decimal::new(valor, 2),
        };
        let relatorio = RelatorioFaturamento::new(vec![linha(10050), linha(4950)], &filtro);
        assert_eq!(relatorio.total_faturado, Decimal::new(150, 0));
        assert_eq!(relatorio.data[0].nome_cliente(), "ACME");

        let json = serde_json::to_value(&relatorio).unwrap();
        assert_eq!(json["filtro_tipo_cliente"], "TODOS");
        assert!(json.get("totalFaturado").is_some());
    }
}
