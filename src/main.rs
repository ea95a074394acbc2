use sqlx::postgres::PgPoolOptions;
use teen_health::{
    app,
    config::{Config, Environment},
    store::PgStore,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(environment: Environment) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("teen_health=info,tower_http=info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match environment {
        Environment::Production => registry
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(
                "teen-health".into(),
                std::io::stdout,
            ))
            .init(),
        Environment::Development => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.environment);
    info!(?config, "Configuration loaded");

    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    PgStore::new(db_pool.clone()).migrate().await?;
    info!("Database migrations applied");

    let app = app(&config, db_pool);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server starting at http://{}", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
