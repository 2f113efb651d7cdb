// Hokkaido Snow Grid API v0.1
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use snow_grid_api::config::AppConfig;
use snow_grid_api::routes;
use snow_grid_api::routes::resorts::AppState;
use snow_grid_api::services::gemini::GeminiClient;
use snow_grid_api::services::report::SnowReportService;
use snow_grid_api::{errors, models};

/// OpenAPI document for the Hokkaido Snow Grid API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hokkaido Snow Grid API",
        version = "0.1.0",
        description = "7-day snow forecasts, base depths and drive times for nine \
            Hokkaido ski resorts. Each refresh issues two batched Gemini requests \
            (a schema-constrained forecast and a maps-grounded travel query) and \
            reconciles them per resort. Upstream failures degrade to offline \
            placeholder data instead of errors.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Resorts", description = "Resort catalog and live snow report"),
    ),
    paths(
        routes::health::health_check,
        routes::resorts::get_resorts,
        routes::resorts::get_catalog,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::resorts::ResortsResponse,
            routes::resorts::CatalogEntry,
            models::ResortInfo,
            models::ForecastDay,
            models::MapCoords,
            models::GroundingSource,
            models::Provenance,
            models::DataOrigin,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snow_grid_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    // One Gemini client for the lifetime of the process
    let gemini = GeminiClient::new(
        &config.gemini_base_url,
        &config.gemini_api_key,
        config.http_timeout(),
    );
    let report_service = SnowReportService::new(Arc::new(gemini), config.report_settings());

    tracing::info!(
        "Using models '{}' (snow) and '{}' (travel), origin '{}'",
        config.snow_model,
        config.travel_model,
        config.origin_name
    );

    // CORS: read-only API, restrict methods to GET; expose X-Snow-Offline
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET])
        .allow_headers(Any)
        .expose_headers([axum::http::HeaderName::from_static("x-snow-offline")]);

    let resort_routes = Router::new()
        .route("/api/v1/resorts", get(routes::resorts::get_resorts))
        .route("/api/v1/resorts/catalog", get(routes::resorts::get_catalog))
        .with_state(AppState { report_service });

    let app = Router::new()
        .route("/api/v1/health", get(routes::health::health_check))
        .merge(resort_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
