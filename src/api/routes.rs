use crate::AppState;
use crate::drive::ClipDescriptor;
use crate::error::GatewayError;
use axum::body::Body;
use axum::extract::{Extension, Path as AxumPath, Query};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, warn};

#[axum::debug_handler]
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "clip-gateway" }))
}

/// List the video clips in the configured Drive folder
#[axum::debug_handler]
pub async fn list_clips(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<ClipDescriptor>>, GatewayError> {
    // Refuse before touching upstream when credentials are absent
    let api_key = state
        .api_key()
        .ok_or(GatewayError::MissingConfig("GOOGLE_DRIVE_API_KEY"))?;
    let folder_id = state
        .folder_id()
        .ok_or(GatewayError::MissingConfig("GOOGLE_DRIVE_FOLDER_ID"))?;

    let files = state.drive.list_videos(api_key, folder_id).await?;
    debug!(clips = files.len(), "Listed video clips");

    let clips = files.into_iter().map(ClipDescriptor::from).collect();
    Ok(Json(clips))
}

#[derive(Deserialize)]
pub struct ThumbnailQuery {
    #[serde(default)]
    id: String,
}

/// `GET /api/proxy-thumbnail/{file_id}`
pub async fn proxy_thumbnail(
    Extension(state): Extension<AppState>,
    AxumPath(file_id): AxumPath<String>,
) -> Response {
    relay_thumbnail(&state, &file_id).await
}

/// `GET /api/proxy-thumbnail?id=...`
///
/// An absent `id` is forwarded upstream as the empty string; the upstream
/// failure path answers for it.
pub async fn proxy_thumbnail_by_query(
    Extension(state): Extension<AppState>,
    Query(ThumbnailQuery { id }): Query<ThumbnailQuery>,
) -> Response {
    relay_thumbnail(&state, &id).await
}

async fn relay_thumbnail(state: &AppState, file_id: &str) -> Response {
    match state.drive.fetch_thumbnail(file_id).await {
        Ok(upstream) => {
            let content_type = upstream
                .headers()
                .get(header::CONTENT_TYPE)
                .cloned()
                .unwrap_or_else(|| HeaderValue::from_static("image/jpeg"));

            debug!(%file_id, "Relaying thumbnail");
            let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
            let headers = response.headers_mut();
            headers.insert(header::CONTENT_TYPE, content_type);
            headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=86400"),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            );
            response
        }
        Err(error @ GatewayError::UpstreamStatus(_)) => {
            warn!(%file_id, %error, "Thumbnail unavailable upstream");
            text_response(StatusCode::NOT_FOUND, "Thumbnail not available".into())
        }
        Err(error) => {
            error!(%file_id, %error, "Thumbnail fetch failed");
            text_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error fetching thumbnail: {error}"),
            )
        }
    }
}

/// Browser preflight for the thumbnail routes, answered locally
pub async fn thumbnail_preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                "X-Requested-With, Content-Type, Accept",
            ),
        ],
    )
}

fn text_response(status: StatusCode, body: String) -> Response {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain")
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from(body))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn preflight_sets_cors_headers() {
        let response = thumbnail_preflight().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "X-Requested-With, Content-Type, Accept"
        );
    }

    #[test]
    fn text_response_carries_status_and_type() {
        let response = text_response(StatusCode::NOT_FOUND, "Thumbnail not available".into());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
    }
}
