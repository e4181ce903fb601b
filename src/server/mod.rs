pub mod handlers;
pub mod types;

use crate::{Result, config::Config, planner::DayPlanner};
use axum::{
    Router,
    routing::{get, post},
};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub fn router(planner: Arc<DayPlanner>) -> Router {
    let app_state = AppState { planner };

    Router::new()
        .route("/", get(handlers::index))
        .route("/static/js/script.js", get(handlers::script))
        .route("/plan_my_day", post(handlers::plan_my_day))
        .route("/chat-api", post(handlers::chat_api))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn run(config: Config) -> Result<()> {
    let planner = DayPlanner::from_config(&config.llm)?;

    let app = router(Arc::new(planner));

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
