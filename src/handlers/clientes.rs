// src/handlers/clientes.rs

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
    models::clientes::{Cliente, CreateClientePayload, UpdateClientePayload},
};

#[utoipa::path(
    post,
    path = "/api/clientes",
    tag = "Clientes",
    request_body = CreateClientePayload,
    responses(
        (status = 201, description = "Cliente cadastrado", body = Cliente),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Email, CPF ou CNPJ já cadastrado")
    )
)]
pub async fn create_cliente(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateClientePayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let cliente = app_state.cliente_service.create(payload).await?;

    Ok((StatusCode::CREATED, Json(cliente)))
}

#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Clientes",
    params(ListParams),
    responses(
        (status = 200, description = "Clientes ativos, paginados", body = Paginated<Cliente>)
    )
)]
pub async fn list_clientes(
    State(app_state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.cliente_service.list(&params).await?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente encontrado", body = Cliente),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn get_cliente(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let cliente = app_state.cliente_service.get(id).await?;

    Ok((StatusCode::OK, Json(cliente)))
}

#[utoipa::path(
    put,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = UpdateClientePayload,
    responses(
        (status = 200, description = "Cliente atualizado", body = Cliente),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado"),
        (status = 409, description = "Email, CPF ou CNPJ já cadastrado para outro cliente")
    )
)]
pub async fn update_cliente(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateClientePayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let cliente = app_state.cliente_service.update(id, payload).await?;

    Ok((StatusCode::OK, Json(cliente)))
}

#[utoipa::path(
    delete,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente inativado"),
        (status = 404, description = "Cliente não encontrado"),
        (status = 409, description = "Cliente possui serviços associados")
    )
)]
pub async fn delete_cliente(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    app_state.cliente_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
