//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assistencia_tecnica::config::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // RUST_LOG sobrescreve o nível padrão
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "assistencia_tecnica=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    let config = Config::from_env()?;
    let addr = config.server_addr.clone();

    let app_state = AppState::new(config).await?;

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = assistencia_tecnica::app(app_state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("📚 Documentação em http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
