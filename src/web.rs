//! JSON web layer over the weather resolver

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::config::ServerConfig;
use crate::error::ResolveError;
use crate::models::{Region, WeatherResult};
use crate::resolver::WeatherResolver;

#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

#[derive(Deserialize)]
pub struct WeatherQuery {
    pub region: Option<String>,
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = match &self {
            ResolveError::InvalidInput { message } => message.clone(),
            ResolveError::UpstreamUnavailable { .. } => self.user_message(),
        };
        (status, Json(ApiError { error })).into_response()
    }
}

pub fn router(resolver: Arc<WeatherResolver>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/regions", get(get_regions))
        .route("/weather", get(get_weather_by_query))
        .route("/weather/{region}", get(get_weather));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(resolver)
}

pub async fn run(config: &ServerConfig, resolver: WeatherResolver) -> Result<()> {
    let app = router(Arc::new(resolver));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .inspect_err(|e| tracing::error!("Failed to bind {}: {}", addr, e))?;
    tracing::info!("Web server running at http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn get_regions(State(resolver): State<Arc<WeatherResolver>>) -> Json<Vec<Region>> {
    Json(resolver.regions().sorted().into_iter().cloned().collect())
}

async fn get_weather(
    State(resolver): State<Arc<WeatherResolver>>,
    Path(region): Path<String>,
) -> Result<Json<WeatherResult>, ResolveError> {
    resolver.resolve(&region).await.map(Json)
}

async fn get_weather_by_query(
    State(resolver): State<Arc<WeatherResolver>>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<WeatherResult>, ResolveError> {
    resolver
        .resolve_input(query.region.as_deref())
        .await
        .map(Json)
}
