// src/handlers/status_servico.rs

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
    common::{
        error::AppError,
        pagination::{ListParams, Paginated},
    },
    config::AppState,
    models::catalogo::{CreateStatusServicoPayload, StatusServico, UpdateStatusServicoPayload},
};

#[utoipa::path(
    post,
    path = "/api/status-servico",
    tag = "Status de Serviço",
    request_body = CreateStatusServicoPayload,
    responses(
        (status = 201, description = "Status criado", body = StatusServico),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Já existe um status com esse nome")
    )
)]
pub async fn create_status(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateStatusServicoPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let status = app_state.catalogo_service.create_status(payload).await?;

    Ok((StatusCode::CREATED, Json(status)))
}

#[utoipa::path(
    get,
    path = "/api/status-servico",
    tag = "Status de Serviço",
    params(ListParams),
    responses(
        (status = 200, description = "Status ordenados pela ordem de exibição", body = Paginated<StatusServico>)
    )
)]
pub async fn list_status(
    State(app_state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.catalogo_service.list_status(&params).await?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/status-servico/{id}",
    tag = "Status de Serviço",
    params(("id" = Uuid, Path, description = "ID do status")),
    responses(
        (status = 200, description = "Status encontrado", body = StatusServico),
        (status = 404, description = "Status não encontrado")
    )
)]
pub async fn get_status(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let status = app_state.catalogo_service.get_status(id).await?;

    Ok((StatusCode::OK, Json(status)))
}

#[utoipa::path(
    put,
    path = "/api/status-servico/{id}",
    tag = "Status de Serviço",
    params(("id" = Uuid, Path, description = "ID do status")),
    request_body = UpdateStatusServicoPayload,
    responses(
        (status = 200, description = "Status atualizado", body = StatusServico),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Status não encontrado"),
        (status = 409, description = "Já existe um status com esse nome")
    )
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateStatusServicoPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let status = app_state.catalogo_service.update_status(id, payload).await?;

    Ok((StatusCode::OK, Json(status)))
}

#[utoipa::path(
    delete,
    path = "/api/status-servico/{id}",
    tag = "Status de Serviço",
    params(("id" = Uuid, Path, description = "ID do status")),
    responses(
        (status = 204, description = "Status excluído"),
        (status = 404, description = "Status não encontrado"),
        (status = 409, description = "Status em uso por serviços")
    )
)]
pub async fn delete_status(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalogo_service.delete_status(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
