//! CodeDuel - Application Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use redis::Client as RedisClient;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codeduel::{
    config::CONFIG,
    db,
    handlers,
    judge::{HttpJudgeClient, Judge},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CodeDuel server...");

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&CONFIG.database).await?;

    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;

    tracing::info!("Connecting to Redis...");
    let redis_client = RedisClient::open(CONFIG.redis.url.as_str())?;
    let redis_conn = redis::aio::ConnectionManager::new(redis_client).await?;

    let judge: Option<Arc<dyn Judge>> = match HttpJudgeClient::from_config(&CONFIG.judge)? {
        Some(client) => {
            tracing::info!(timeout_seconds = CONFIG.judge.timeout_seconds, "Judge client configured");
            Some(Arc::new(client) as Arc<dyn Judge>)
        }
        None => {
            tracing::warn!("JUDGE_URL is not set; submissions will be rejected");
            None
        }
    };

    let state = AppState::new(db_pool, redis_conn, CONFIG.clone(), judge);

    let app = handlers::router(state);

    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
