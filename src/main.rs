use std::sync::Arc;

use config::Config;
use repositories::{BlogRepository, PostgresRepo};
use routes::create_routes;
use services::{admin::AdminService, blog::BlogService};
use sqlx::postgres::PgPoolOptions;
use tera::Tera;
use tracing_subscriber::EnvFilter;

pub use self::errors::{Error, Result};

mod config;
mod errors;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;

pub struct AppState {
    pub config: Config,
    pub templates: Tera,
    pub blog_service: BlogService,
    pub admin_service: AdminService,
}

impl AppState {
    pub fn new(config: Config, templates: Tera, repo: Arc<dyn BlogRepository>) -> Self {
        Self {
            blog_service: BlogService::new(repo.clone(), config.media_url.clone()),
            admin_service: AdminService::new(repo),
            config,
            templates,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::init() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("🔥 Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let pool = match PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("✅ Connection to the database is successful!");
            pool
        }
        Err(err) => {
            tracing::error!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = sqlx::migrate!("./migrations").run(&pool).await {
        tracing::error!("🔥 Failed to run migrations: {:?}", err);
        std::process::exit(1);
    }

    let templates = match Tera::new(&format!("{}/**/*.html", config.templates_dir)) {
        Ok(templates) => templates,
        Err(err) => {
            tracing::error!("🔥 Failed to load templates: {:?}", err);
            std::process::exit(1);
        }
    };

    let port = config.port;
    let app_state = AppState::new(config, templates, Arc::new(PostgresRepo::new(pool)));
    let app = create_routes(Arc::new(app_state));

    let listener = match tokio::net::TcpListener::bind(format!("[::]:{port}")).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("🔥 Failed to bind port {}: {:?}", port, err);
            std::process::exit(1);
        }
    };

    tracing::info!("🚀 Listening on port {}", port);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("🔥 Server error: {:?}", err);
    }
}
