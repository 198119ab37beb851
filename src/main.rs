use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tourops_pricing::cache::AppCache;
use tourops_pricing::flights::{FareApiClient, QuoteSources};
use tourops_pricing::inventory::InventoryFeedClient;
use tourops_pricing::{pricing, AppState};

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .context("connect to database")?;

    let quotes = QuoteSources::new(
        FareApiClient::new(
            env_or("SEARCHWING_BASE_URL", "https://api.searchwing.travel"),
            env_or("SEARCHWING_API_KEY", ""),
        ),
        FareApiClient::new(
            env_or("FAREDECK_BASE_URL", "https://api.faredeck.com"),
            env_or("FAREDECK_API_KEY", ""),
        ),
    );
    let inventory = InventoryFeedClient::new(
        env_or("TOUR_PLATFORM_BASE_URL", "https://feed.tourplatform.com"),
        env_or("TOUR_PLATFORM_API_KEY", ""),
    );
    let quote_concurrency = std::env::var("QUOTE_CONCURRENCY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8);

    let state = AppState {
        db,
        cache: AppCache::new(),
        quotes: Arc::new(quotes),
        inventory: Arc::new(inventory),
        quote_concurrency,
    };

    let app = pricing::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = env_or("BIND_ADDR", "0.0.0.0:8080");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {}", addr))?;
    info!("pricing engine listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
