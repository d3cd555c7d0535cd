use std::process;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::middleware;
use clap::Parser;
use dotenvy::dotenv;
use tower_http::cors::{Any, CorsLayer};

use qa_service::api;
use qa_service::cli::Cli;
use qa_service::config::Config;
use qa_service::db;
use qa_service::logging::init_logging;
use qa_service::metrics::{self, AppMetrics};
use qa_service::repository::QaRepository;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let mut config = Config::from_env().unwrap_or_else(|err| {
        tracing::error!("{}", err);
        process::exit(1);
    });
    if let Some(database_url) = cli.database_url {
        config.database_url = database_url;
    }
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let pool = db::create_pool(&config.database_url)
        .await
        .unwrap_or_else(|err| {
            tracing::error!("Failed to open database {}: {}", config.database_url, err);
            process::exit(1);
        });
    let repo = Arc::new(QaRepository::new(pool));

    let app_metrics = Arc::new(AppMetrics::new().unwrap_or_else(|err| {
        tracing::error!("Failed to register metrics: {}", err);
        process::exit(1);
    }));

    let app = api::create_router(repo)
        .merge(metrics::create_metrics_router(app_metrics.clone()))
        .layer(middleware::from_fn_with_state(
            app_metrics,
            metrics::track_http,
        ))
        .layer(build_cors(&config.cors_origins));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|err| {
            tracing::error!("Failed to bind {}: {}", addr, err);
            process::exit(1);
        });
    tracing::info!("Service started on {}", addr);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", err);
        process::exit(1);
    }
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any)
}
