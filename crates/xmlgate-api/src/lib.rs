//! HTTP front end: `POST /api/xml` validates an XML request envelope

#![forbid(unsafe_code)]

pub mod config;
pub use config::{ConfigError, ServerConfig};

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use xmlgate::{ProcessOptions, Response, Tree, XmlConfig};

pub const XML_CONTENT_TYPE: &str = "application/xml";

/// Build the router
pub fn app(config: &ServerConfig) -> Router {
    let options = ProcessOptions {
        parser: XmlConfig {
            max_size: config.max_body_bytes,
            ..XmlConfig::default()
        },
        ..ProcessOptions::default()
    };

    Router::new()
        .route("/api/health", get(health))
        .route("/api/xml", post(handle_xml))
        .layer(DefaultBodyLimit::max(transport_limit(config.max_body_bytes)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(options)
}

/// Bodies up to twice `max_body_bytes` reach the parser, which answers with the
/// XML "max size exceeded" error; anything larger is cut off by axum with 413.
const fn transport_limit(max_body_bytes: usize) -> usize {
    max_body_bytes.saturating_mul(2)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

async fn handle_xml(
    State(options): State<ProcessOptions>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let response = if is_xml(&headers) {
        xmlgate::process_bytes(&body, &options)
    } else {
        debug!("request body is not xml; validating an empty tree");
        xmlgate::respond(&Tree::empty())
    };
    xml_response(&response)
}

fn xml_response(response: &Response) -> impl IntoResponse {
    let status = StatusCode::from_u16(response.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
    (
        status,
        [(header::CONTENT_TYPE, XML_CONTENT_TYPE)],
        response.to_xml(),
    )
}

/// `application/xml`, `text/xml` and any `+xml` media type
fn is_xml(headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let media_type = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    media_type == "application/xml" || media_type == "text/xml" || media_type.ends_with("+xml")
}
