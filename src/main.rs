use axum::{routing::get, Router};
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod error;
mod extractor;
mod handlers;
mod models;
mod repository;
mod services;
#[cfg(test)]
mod testing;

pub use error::{AppError, Result};

use extractor::{Extractor, WordSource};
use repository::{PgWordRepository, WordStore};
use services::lookup_service::LookupService;

/// Shared application state handed to every handler.
pub struct AppState {
    pub repo: Arc<dyn WordStore>,
    pub lookup: LookupService,
}

#[tokio::main]
async fn main() {
    // 1. Logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Environment
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgresql://postgres:postgres@db:5432/words_db".into());
    let webdriver_url =
        std::env::var("WEBDRIVER_URL").unwrap_or_else(|_| "http://localhost:9515".into());

    // 3. Database pool and schema
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to create database connection pool");

    let repository = PgWordRepository::new(pool);
    repository
        .init_schema()
        .await
        .expect("Failed to create database schema");

    let repo: Arc<dyn WordStore> = Arc::new(repository);
    let source: Arc<dyn WordSource> = Arc::new(Extractor::new(webdriver_url));
    let shared_state = Arc::new(AppState {
        lookup: LookupService::new(repo.clone(), source),
        repo,
    });

    // 4. CORS - permissive while the frontend is unsettled
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 5. Routes
    let app = Router::new()
        .route(
            "/word/:word",
            get(handlers::word_handler::get_word).delete(handlers::word_handler::delete_word),
        )
        .route("/words", get(handlers::word_handler::list_words))
        // middleware: request tracing and CORS
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state);

    // 6. Serve
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("🚀 Server started at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
