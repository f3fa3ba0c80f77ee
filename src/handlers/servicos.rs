// src/handlers/servicos.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, pagination::Paginated},
    config::AppState,
    models::servicos::{
        CreateServicoPayload, Servico, ServicoDetalhe, ServicoListParams, ServicoResumo,
        UpdateServicoPayload,
    },
};

#[utoipa::path(
    post,
    path = "/api/servicos",
    tag = "Serviços",
    request_body = CreateServicoPayload,
    responses(
        (status = 201, description = "Ordem de serviço aberta no status inicial", body = Servico),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente ou tipo de serviço não encontrado"),
        (status = 500, description = "Status inicial não configurado")
    )
)]
pub async fn create_servico(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateServicoPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let servico = app_state.servico_service.create(payload).await?;

    Ok((StatusCode::CREATED, Json(servico)))
}

#[utoipa::path(
    get,
    path = "/api/servicos",
    tag = "Serviços",
    params(ServicoListParams),
    responses(
        (status = 200, description = "Ordens de serviço, mais recentes primeiro", body = Paginated<ServicoResumo>)
    )
)]
pub async fn list_servicos(
    State(app_state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ServicoListParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.servico_service.list(&params).await?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/servicos/{id}",
    tag = "Serviços",
    params(("id" = Uuid, Path, description = "ID da ordem de serviço")),
    responses(
        (status = 200, description = "OS com cliente, tipo, status e histórico", body = ServicoDetalhe),
        (status = 404, description = "Serviço não encontrado")
    )
)]
pub async fn get_servico(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let detalhe = app_state.servico_service.get(id).await?;

    Ok((StatusCode::OK, Json(detalhe)))
}

#[utoipa::path(
    put,
    path = "/api/servicos/{id}",
    tag = "Serviços",
    params(("id" = Uuid, Path, description = "ID da ordem de serviço")),
    request_body = UpdateServicoPayload,
    responses(
        (status = 200, description = "OS atualizada (mudança de status registrada no histórico)", body = Servico),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Serviço, cliente, tipo ou status não encontrado")
    )
)]
pub async fn update_servico(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateServicoPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let servico = app_state.servico_service.update(id, payload).await?;

    Ok((StatusCode::OK, Json(servico)))
}

#[utoipa::path(
    delete,
    path = "/api/servicos/{id}",
    tag = "Serviços",
    params(("id" = Uuid, Path, description = "ID da ordem de serviço")),
    responses(
        (status = 204, description = "OS e histórico excluídos"),
        (status = 404, description = "Serviço não encontrado")
    )
)]
pub async fn delete_servico(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    app_state.servico_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
