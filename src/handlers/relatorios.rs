// src/handlers/relatorios.rs

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;

use crate::{
    common::error::AppError,
    config::AppState,
    models::relatorios::{FaturamentoQuery, RelatorioFaturamento, ServicoStatusLinha, ServicosStatusQuery},
    services::relatorio_service::Relatorio,
};

// JSON vai direto; CSV/PDF saem como anexo para o navegador baixar
fn relatorio_response<T: Serialize>(relatorio: Relatorio<T>) -> Response {
    match relatorio {
        Relatorio::Json(data) => (StatusCode::OK, Json(data)).into_response(),
        Relatorio::Arquivo(arquivo) => {
            let headers = [
                (header::CONTENT_TYPE, arquivo.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", arquivo.filename),
                ),
            ];
            (StatusCode::OK, headers, arquivo.bytes).into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/relatorios/faturamento",
    tag = "Relatórios",
    params(FaturamentoQuery),
    responses(
        (status = 200, description = "Faturamento do período (JSON, ou anexo CSV/PDF conforme `formato`)", body = RelatorioFaturamento),
        (status = 400, description = "Parâmetros inválidos")
    )
)]
pub async fn relatorio_faturamento(
    State(app_state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<FaturamentoQuery>, AppError>,
) -> Result<Response, AppError> {
    let filtro = query.into_filtro()?;

    let relatorio = app_state.relatorio_service.faturamento(filtro).await?;

    Ok(relatorio_response(relatorio))
}

#[utoipa::path(
    get,
    path = "/api/relatorios/servicos-status",
    tag = "Relatórios",
    params(ServicosStatusQuery),
    responses(
        (status = 200, description = "Serviços por status (JSON, ou anexo CSV/PDF conforme `formato`)", body = Vec<ServicoStatusLinha>),
        (status = 400, description = "Parâmetros inválidos")
    )
)]
pub async fn relatorio_servicos_status(
    State(app_state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ServicosStatusQuery>, AppError>,
) -> Result<Response, AppError> {
    let filtro = query.into_filtro()?;

    let relatorio = app_state.relatorio_service.servicos_status(filtro).await?;

    Ok(relatorio_response(relatorio))
}
