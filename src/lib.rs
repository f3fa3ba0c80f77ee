// src/lib.rs

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod services;

use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::{AppState, Config},
    docs::ApiDoc,
};

/// CORS a partir de `CORS_ORIGINS`. Origens inválidas são ignoradas com um aviso.
pub fn build_cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(origin) => Some(origin),
            Err(e) => {
                tracing::warn!(origin = %o, error = %e, "Origem CORS inválida ignorada");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

pub fn app(app_state: AppState) -> Router {
    let cliente_routes = Router::new()
        .route(
            "/",
            get(handlers::clientes::list_clientes).post(handlers::clientes::create_cliente),
        )
        .route(
            "/{id}",
            get(handlers::clientes::get_cliente)
                .put(handlers::clientes::update_cliente)
                .delete(handlers::clientes::delete_cliente),
        );

    let servico_routes = Router::new()
        .route(
            "/",
            get(handlers::servicos::list_servicos).post(handlers::servicos::create_servico),
        )
        .route(
            "/{id}",
            get(handlers::servicos::get_servico)
                .put(handlers::servicos::update_servico)
                .delete(handlers::servicos::delete_servico),
        );

    let status_routes = Router::new()
        .route(
            "/",
            get(handlers::status_servico::list_status).post(handlers::status_servico::create_status),
        )
        .route(
            "/{id}",
            get(handlers::status_servico::get_status)
                .put(handlers::status_servico::update_status)
                .delete(handlers::status_servico::delete_status),
        );

    let tipo_routes = Router::new()
        .route(
            "/",
            get(handlers::tipos_servico::list_tipos).post(handlers::tipos_servico::create_tipo),
        )
        .route(
            "/{id}",
            get(handlers::tipos_servico::get_tipo)
                .put(handlers::tipos_servico::update_tipo)
                .delete(handlers::tipos_servico::delete_tipo),
        );

    let relatorio_routes = Router::new()
        .route("/faturamento", get(handlers::relatorios::relatorio_faturamento))
        .route("/servicos-status", get(handlers::relatorios::relatorio_servicos_status));

    let cors = build_cors_layer(&app_state.config);

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/clientes", cliente_routes)
        .nest("/api/servicos", servico_routes)
        .nest("/api/status-servico", status_routes)
        .nest("/api/tipos-servico", tipo_routes)
        .nest("/api/relatorios", relatorio_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(app_state)
}
