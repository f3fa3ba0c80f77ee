// src/handlers/tipos_servico.rs

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
    models::catalogo::{TipoServico, TipoServicoPayload},
};

#[utoipa::path(
    post,
    path = "/api/tipos-servico",
    tag = "Tipos de Serviço",
    request_body = TipoServicoPayload,
    responses(
        (status = 201, description = "Tipo de serviço criado", body = TipoServico),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Já existe um tipo com esse nome")
    )
)]
pub async fn create_tipo(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<TipoServicoPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tipo = app_state.catalogo_service.create_tipo(payload).await?;

    Ok((StatusCode::CREATED, Json(tipo)))
}

#[utoipa::path(
    get,
    path = "/api/tipos-servico",
    tag = "Tipos de Serviço",
    params(ListParams),
    responses(
        (status = 200, description = "Tipos de serviço em ordem alfabética", body = Paginated<TipoServico>)
    )
)]
pub async fn list_tipos(
    State(app_state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.catalogo_service.list_tipos(&params).await?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/tipos-servico/{id}",
    tag = "Tipos de Serviço",
    params(("id" = Uuid, Path, description = "ID do tipo de serviço")),
    responses(
        (status = 200, description = "Tipo de serviço encontrado", body = TipoServico),
        (status = 404, description = "Tipo de serviço não encontrado")
    )
)]
pub async fn get_tipo(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let tipo = app_state.catalogo_service.get_tipo(id).await?;

    Ok((StatusCode::OK, Json(tipo)))
}

#[utoipa::path(
    put,
    path = "/api/tipos-servico/{id}",
    tag = "Tipos de Serviço",
    params(("id" = Uuid, Path, description = "ID do tipo de serviço")),
    request_body = TipoServicoPayload,
    responses(
        (status = 200, description = "Tipo de serviço atualizado", body = TipoServico),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Tipo de serviço não encontrado"),
        (status = 409, description = "Já existe um tipo com esse nome")
    )
)]
pub async fn update_tipo(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<TipoServicoPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tipo = app_state.catalogo_service.update_tipo(id, payload).await?;

    Ok((StatusCode::OK, Json(tipo)))
}

#[utoipa::path(
    delete,
    path = "/api/tipos-servico/{id}",
    tag = "Tipos de Serviço",
    params(("id" = Uuid, Path, description = "ID do tipo de serviço")),
    responses(
        (status = 204, description = "Tipo de serviço excluído"),
        (status = 404, description = "Tipo de serviço não encontrado"),
        (status = 409, description = "Tipo de serviço em uso por serviços")
    )
)]
pub async fn delete_tipo(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalogo_service.delete_tipo(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
