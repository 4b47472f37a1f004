use axum::http::{HeaderValue, Method, header};
use std::{io, time::Duration};
use tower_http::cors::CorsLayer;

/// Environment variable naming the single origin allowed to call the API.
pub const CORS_ORIGIN_ENV: &str = "CORS_ALLOWED_ORIGIN";

/// Creates a read-only CORS layer for the given origin.
///
/// Only `GET` and `OPTIONS` are allowed; the services built on this crate
/// expose no mutating endpoints.
pub fn create_cors_layer(allowed_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Builds a CORS layer from `CORS_ALLOWED_ORIGIN`, or `None` when unset or blank.
pub fn cors_layer_from_env() -> io::Result<Option<CorsLayer>> {
    let origin = match std::env::var(CORS_ORIGIN_ENV) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => return Ok(None),
    };

    let value = HeaderValue::from_str(origin.trim()).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid {CORS_ORIGIN_ENV} '{origin}': {e}"),
        )
    })?;

    Ok(Some(create_cors_layer(value)))
}
