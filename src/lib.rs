pub mod api;
pub mod app_state;
pub mod config;
pub mod drive;
pub mod error;

use axum::Router;
use axum::extract::Extension;
use axum::http::{HeaderName, Method, header};
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

//
// Re-export
//
pub use api::{health, list_clips, log_request_errors, proxy_thumbnail, thumbnail_preflight};
pub use app_state::AppState;
pub use config::Config;
pub use drive::{ClipDescriptor, DriveClient, DriveFile};
pub use error::GatewayError;

pub async fn run(config: Config) {
    let listen_on_port = config.listen_on_port;

    let state = AppState::new(config).expect("Failed to create app state");

    // CORS layer: any origin, the browser-facing methods and request headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ]);

    let app = Router::new()
        .route("/api/clips", get(list_clips))
        .route(
            "/api/proxy-thumbnail",
            get(api::proxy_thumbnail_by_query).options(thumbnail_preflight),
        )
        .route(
            "/api/proxy-thumbnail/{file_id}",
            get(proxy_thumbnail).options(thumbnail_preflight),
        )
        .route("/api/health", get(health))
        .layer(axum::middleware::from_fn(api::log_request_errors))
        .layer(cors)
        .layer(Extension(state));

    let addr = format!("0.0.0.0:{listen_on_port}");
    info!("Gateway listening on {addr}");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind gateway API");

    axum::serve(listener, app)
        .await
        .expect("Gateway server error");
}
