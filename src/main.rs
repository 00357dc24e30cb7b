//! Todo API - ownership-scoped todo service with JWT auth and RBAC

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_backend::{
    api::create_router,
    auth::{JwtHandler, UserStore},
    config::Config,
    todos::TodoStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    // UserStore first: todos reference users(id)
    let user_store = Arc::new(UserStore::new(&config.db_path)?);
    let todo_store = Arc::new(TodoStore::new(&config.db_path)?);
    let jwt_handler = Arc::new(JwtHandler::new(
        config.jwt_secret.clone(),
        config.token_ttl_minutes,
    ));

    let app = create_router(user_store, todo_store, jwt_handler);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .context("Failed to bind listener")?;
    info!("Todo API listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
