pub mod middleware;
pub mod routes;

// Re-export public types and functions
pub use middleware::log_request_errors;
pub use routes::{
    health, list_clips, proxy_thumbnail, proxy_thumbnail_by_query, thumbnail_preflight,
};
