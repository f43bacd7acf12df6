use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Restricts to `origin` when one is configured, otherwise any origin is accepted.
pub fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.and_then(|o| HeaderValue::from_str(o.trim()).ok()) {
        Some(value) => layer.allow_origin(AllowOrigin::exact(value)),
        None => {
            if let Some(raw) = origin {
                tracing::warn!(origin = raw, "ignoring unparsable CORS_ORIGIN");
            }
            layer.allow_origin(Any)
        }
    }
}
