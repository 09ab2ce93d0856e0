use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod events;
mod models;
mod routes;
mod schema;
mod services;

use config::AppConfig;
use sortie_shared::clients::db::{create_pool, DbPool};
use sortie_shared::clients::rabbitmq::RabbitMQClient;
use sortie_shared::middleware::{init_metrics, metrics_middleware};

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub rabbitmq: RabbitMQClient,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sortie_shared::middleware::init_tracing("sortie-matching");

    let config = AppConfig::load()?;
    let port = config.port;

    let db = create_pool(&config.database_url)?;
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;
    let prometheus = init_metrics();

    let state = Arc::new(AppState {
        db,
        config,
        rabbitmq,
    });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/metrics",
            get(move || std::future::ready(prometheus.render())),
        )
        .route("/proposals", post(routes::proposals::create_proposal))
        .route("/proposals/mine", get(routes::proposals::list_my_proposals))
        .route(
            "/proposals/:id/status",
            patch(routes::proposals::set_proposal_status),
        )
        .route("/requests", post(routes::requests::submit_request))
        .route("/requests/incoming", get(routes::requests::list_incoming))
        .route("/requests/outgoing", get(routes::requests::list_outgoing))
        .route(
            "/requests/:id/respond",
            put(routes::requests::respond_request),
        )
        .route("/matches", get(routes::matches::list_matches))
        .route("/matches/:id", delete(routes::matches::delete_match))
        .route("/discover", get(routes::discover::get_feed))
        .route(
            "/discover/seen/:proposal_id",
            post(routes::discover::mark_shown),
        )
        .route(
            "/interactions",
            post(routes::interactions::record_interaction),
        )
        .route("/quota", get(routes::quota::get_quota))
        .layer(axum::middleware::from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "sortie-matching starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
