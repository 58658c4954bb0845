//! Server bootstrap: env config, pool, schema, router, graceful shutdown.

use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use users_api::{
    common_routes, ensure_users_table, user_routes, AppState, PgUserStore, Settings, UserService,
};

const BODY_LIMIT_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("users_api=info")),
        )
        .init();

    let settings = Settings::from_env();
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await?;
    sqlx::query("SELECT 1").execute(&pool).await?;
    tracing::info!("connected to database");

    ensure_users_table(&pool).await?;

    let store = Arc::new(PgUserStore::new(pool.clone()));
    let state = AppState {
        pool,
        users: Arc::new(UserService::new(store)),
    };

    let app = Router::new()
        .merge(common_routes(state.clone()))
        .merge(user_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES));

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server exited");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down");
}
