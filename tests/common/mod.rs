//! Helpers compartilhados pelos testes de integração HTTP.
//!
//! As requisições vão direto no `Router` via `tower::ServiceExt::oneshot`,
//! sem abrir porta TCP. Cada teste recebe um banco novo do `#[sqlx::test]`.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use assistencia_tecnica::config::{AppState, Config};

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        server_addr: "127.0.0.1:0".to_string(),
        db_max_connections: 5,
        pdf_fonts_dir: "./fonts".to_string(),
        pdf_font_name: "Roboto".to_string(),
        status_inicial: "Pendente".to_string(),
        cors_origins: vec!["http://localhost:3000".to_string()],
    }
}

/// Mesmo router de produção, sobre o pool do teste.
pub fn build_test_app(pool: PgPool) -> Router {
    assistencia_tecnica::app(AppState::from_pool(pool, test_config()))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// POST com corpo bruto, para testar JSON malformado.
pub async fn send_raw(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub fn json_id(json: &Value, field: &str) -> Uuid {
    json[field].as_str().unwrap().parse().unwrap()
}

// --- Fixtures ---

pub async fn create_cliente_pf(pool: &PgPool, nome: &str, email: &str, cpf: &str) -> Value {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/clientes",
        serde_json::json!({
            "tipo_pessoa": "FISICA",
            "nome_completo": nome,
            "cpf": cpf,
            "telefone_principal": "11999990000",
            "email": email,
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await
}

pub async fn create_tipo(pool: &PgPool, nome: &str) -> Value {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/tipos-servico",
        serde_json::json!({
            "nome_tipo_servico": nome,
            "descricao": format!("Serviço de {}", nome.to_lowercase()),
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await
}

pub async fn create_servico(pool: &PgPool, id_cliente: Uuid, id_tipo: Uuid, problema: &str) -> Value {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/servicos",
        serde_json::json!({
            "id_cliente": id_cliente,
            "id_tipo_servico": id_tipo,
            "descricao_problema": problema,
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await
}

pub async fn status_id(pool: &PgPool, nome: &str) -> Uuid {
    sqlx::query_scalar("SELECT id_status_servico FROM status_servico WHERE nome_status = $1")
        .bind(nome)
        .fetch_one(pool)
        .await
        .unwrap()
}
