// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{CatalogoRepository, ClienteRepository, RelatorioRepository, ServicoRepository},
    services::{CatalogoService, ClienteService, DocumentService, RelatorioService, ServicoService},
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub db_max_connections: u32,
    pub pdf_fonts_dir: String,
    pub pdf_font_name: String,
    /// Nome do status atribuído a toda OS nova
    pub status_inicial: String,
    pub cors_origins: Vec<String>,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        let db_max_connections = var_or("DB_MAX_CONNECTIONS", "5")
            .parse()
            .context("DB_MAX_CONNECTIONS deve ser um número inteiro positivo")?;

        let cors_origins = var_or("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        Ok(Self {
            database_url,
            server_addr: var_or("SERVER_ADDR", "0.0.0.0:3000"),
            db_max_connections,
            pdf_fonts_dir: var_or("PDF_FONTS_DIR", "./fonts"),
            pdf_font_name: var_or("PDF_FONT_NAME", "Roboto"),
            status_inicial: var_or("STATUS_INICIAL", "Pendente"),
            cors_origins,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub cliente_service: ClienteService,
    pub servico_service: ServicoService,
    pub catalogo_service: CatalogoService,
    pub relatorio_service: RelatorioService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar no banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config))
    }

    /// Monta o gráfico de dependências sobre um pool já aberto (usado também nos testes).
    pub fn from_pool(db_pool: PgPool, config: Config) -> Self {
        let cliente_repo = ClienteRepository::new(db_pool.clone());
        let servico_repo = ServicoRepository::new(db_pool.clone());
        let catalogo_repo = CatalogoRepository::new(db_pool.clone());
        let relatorio_repo = RelatorioRepository::new(db_pool.clone());

        let document_service = DocumentService::new(&config.pdf_fonts_dir, &config.pdf_font_name);

        let cliente_service = ClienteService::new(cliente_repo.clone(), db_pool.clone());
        let servico_service = ServicoService::new(
            servico_repo,
            cliente_repo,
            catalogo_repo.clone(),
            db_pool.clone(),
            config.status_inicial.clone(),
        );
        let catalogo_service = CatalogoService::new(catalogo_repo, db_pool.clone());
        let relatorio_service = RelatorioService::new(relatorio_repo, document_service);

        Self {
            db_pool,
            config: Arc::new(config),
            cliente_service,
            servico_service,
            catalogo_service,
            relatorio_service,
        }
    }
}
