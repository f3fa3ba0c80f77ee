//! Testes HTTP de `/api/relatorios` (JSON, CSV e erro de PDF sem fontes).

mod common;

use axum::http::{header, StatusCode};
use common::{body_json, body_text, get, put_json};
use sqlx::PgPool;
use uuid::Uuid;

/// Duas OS: uma PF entregue em março/2024 por 150.00 e uma PJ sem saída.
async fn seed(pool: &PgPool) -> (Uuid, Uuid) {
    let pf = common::create_cliente_pf(pool, "Laura Dias", "laura@example.com", "10101010101").await;
    let tipo = common::create_tipo(pool, "Formatação").await;
    let id_tipo = common::json_id(&tipo, "id_tipo_servico");

    let pj = body_json(
        common::post_json(
            common::build_test_app(pool.clone()),
            "/api/clientes",
            serde_json::json!({
                "tipo_pessoa": "JURIDICA",
                "razao_social": "Escritório Central; Filial",
                "cnpj": "11222333000144",
                "telefone_principal": "1130303030",
                "email": "ti@escritorio.com",
            }),
        )
        .await,
    )
    .await;

    let entregue = common::create_servico(pool, common::json_id(&pf, "id_cliente"), id_tipo, "Lento").await;
    let id_entregue = common::json_id(&entregue, "id_servico");
    let aberto = common::create_servico(pool, common::json_id(&pj, "id_cliente"), id_tipo, "Vírus").await;
    let id_aberto = common::json_id(&aberto, "id_servico");

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/servicos/{}", id_entregue),
        serde_json::json!({
            "id_status_atual": common::status_id(pool, "Entregue").await,
            "data_efetiva_saida": "2024-03-15T15:00:00Z",
            "valor_servico": 150.0,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    (id_entregue, id_aberto)
}

const PERIODO: &str = "data_inicio=2024-03-01T00:00:00-03:00&data_fim=2024-03-31T23:59:59-03:00";

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn test_faturamento_json(pool: PgPool) {
    let (id_entregue, _) = seed(&pool).await;

    let response = get(
        common::build_test_app(pool),
        &format!("/api/relatorios/faturamento?{}", PERIODO),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["id_servico"], id_entregue.to_string());
    assert_eq!(json["totalFaturado"], 150.0);
    assert_eq!(json["filtro_tipo_cliente"], "TODOS");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn test_faturamento_filters_by_tipo_pessoa(pool: PgPool) {
    seed(&pool).await;

    let response = get(
        common::build_test_app(pool),
        &format!("/api/relatorios/faturamento?{}&tipo_pessoa_cliente=JURIDICA", PERIODO),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
    assert_eq!(json["totalFaturado"], 0.0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn test_faturamento_csv(pool: PgPool) {
    let (id_entregue, _) = seed(&pool).await;

    let response = get(
        common::build_test_app(pool),
        &format!("/api/relatorios/faturamento?formato=csv&{}", PERIODO),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"relatorio_faturamento_2024-03-01_a_2024-04-01.csv\""
    );

    let csv = body_text(response).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "OS;Data Saida;Cliente;Tipo Pessoa;Email Cliente;Tipo Servico;Valor Servico"
    );
    assert_eq!(
        lines[1],
        format!("{};15/03/2024;Laura Dias;FISICA;laura@example.com;Formatação;150.00", id_entregue)
    );
    assert_eq!(lines.last(), Some(&"Total Faturado;;;;;;R$ 150.00"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn test_servicos_status_filters_by_status(pool: PgPool) {
    let (_, id_aberto) = seed(&pool).await;
    let pendente = common::status_id(&pool, "Pendente").await;

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/relatorios/servicos-status?status_id={}", pendente),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let linhas = json.as_array().unwrap();
    assert_eq!(linhas.len(), 1);
    assert_eq!(linhas[0]["id_servico"], id_aberto.to_string());
    assert_eq!(linhas[0]["nome_status"], "Pendente");

    let json = body_json(get(common::build_test_app(pool), "/api/relatorios/servicos-status").await).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn test_servicos_status_csv_quotes_separator(pool: PgPool) {
    seed(&pool).await;

    let response = get(
        common::build_test_app(pool),
        "/api/relatorios/servicos-status?formato=csv",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"relatorio_servicos_status_"));
    assert!(disposition.ends_with(".csv\""));

    let csv = body_text(response).await;
    assert!(csv.starts_with("OS;Cliente;Tipo Pessoa;Tipo Servico;Data Entrada;Status Atual;Valor Servico\n"));
    assert!(csv.contains(";\"Escritório Central; Filial\";JURIDICA;"));
}

/// Fecha uma OS com saída e valor dados, via API.
async fn fechar(pool: &PgPool, id_servico: Uuid, data_saida: &str, valor: serde_json::Value) {
    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/servicos/{}", id_servico),
        serde_json::json!({ "data_efetiva_saida": data_saida, "valor_servico": valor }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn set_data_entrada(pool: &PgPool, id_servico: Uuid, data: &str) {
    sqlx::query("UPDATE servicos SET data_entrada = $2::timestamptz WHERE id_servico = $1")
        .bind(id_servico)
        .bind(data)
        .execute(pool)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn test_faturamento_includes_end_bound_and_skips_unpriced(pool: PgPool) {
    let (id_entregue, _) = seed(&pool).await;
    let cliente = common::create_cliente_pf(&pool, "Paulo Reis", "paulo@example.com", "20202020202").await;
    let id_cliente = common::json_id(&cliente, "id_cliente");
    let tipo = common::json_id(&common::create_tipo(&pool, "Limpeza").await, "id_tipo_servico");

    let no_limite = common::json_id(&common::create_servico(&pool, id_cliente, tipo, "Fonte").await, "id_servico");
    fechar(&pool, no_limite, "2024-03-31T23:59:59-03:00", serde_json::json!(50.0)).await;

    let gratuito = common::json_id(&common::create_servico(&pool, id_cliente, tipo, "Garantia").await, "id_servico");
    fechar(&pool, gratuito, "2024-03-20T10:00:00-03:00", serde_json::json!(0.0)).await;

    let sem_valor = common::json_id(&common::create_servico(&pool, id_cliente, tipo, "Revisão").await, "id_servico");
    fechar(&pool, sem_valor, "2024-03-21T10:00:00-03:00", serde_json::Value::Null).await;

    let response = get(
        common::build_test_app(pool),
        &format!("/api/relatorios/faturamento?{}", PERIODO),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let ids: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|linha| linha["id_servico"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![id_entregue.to_string(), no_limite.to_string()]);
    assert_eq!(json["totalFaturado"], 200.0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn test_servicos_status_bounds_apply_independently(pool: PgPool) {
    let (id_entregue, id_aberto) = seed(&pool).await;
    set_data_entrada(&pool, id_entregue, "2024-01-10T12:00:00Z").await;
    set_data_entrada(&pool, id_aberto, "2024-06-10T12:00:00Z").await;

    let ids_de = |json: serde_json::Value| -> Vec<String> {
        json.as_array()
            .unwrap()
            .iter()
            .map(|linha| linha["id_servico"].as_str().unwrap().to_string())
            .collect()
    };

    let a_partir = body_json(
        get(
            common::build_test_app(pool.clone()),
            "/api/relatorios/servicos-status?data_inicio=2024-03-01T00:00:00Z",
        )
        .await,
    )
    .await;
    assert_eq!(ids_de(a_partir), vec![id_aberto.to_string()]);

    let ate = body_json(
        get(
            common::build_test_app(pool.clone()),
            "/api/relatorios/servicos-status?data_fim=2024-03-01T00:00:00Z",
        )
        .await,
    )
    .await;
    assert_eq!(ids_de(ate), vec![id_entregue.to_string()]);

    let ambos = body_json(
        get(
            common::build_test_app(pool),
            "/api/relatorios/servicos-status?data_inicio=2024-01-01T00:00:00Z&data_fim=2024-12-31T00:00:00Z",
        )
        .await,
    )
    .await;
    assert_eq!(ids_de(ambos), vec![id_entregue.to_string(), id_aberto.to_string()]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn test_pdf_without_fonts_reports_missing_font(pool: PgPool) {
    seed(&pool).await;

    for uri in [
        format!("/api/relatorios/faturamento?formato=pdf&{}", PERIODO),
        "/api/relatorios/servicos-status?formato=pdf".to_string(),
    ] {
        let response = get(common::build_test_app(pool.clone()), &uri).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Fonte não encontrada: 'Roboto' na pasta ./fonts");
    }
}
