//! Request logging middleware
//!
//! Every HTTP request gets an identifier (the incoming `X-Request-ID` header,
//! or a fresh UUID) that is stored in the task-local request context and on a
//! tracing span for the duration of the request. One line is logged when the
//! request arrives and one when the response leaves.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, info_span, Instrument};

use crate::config::scope_request_id;
use crate::utils::helpers::generate_request_id;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Request id from the incoming header, or a new one
pub fn request_id_from_headers(headers: &HeaderMap) -> String {
    headers
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(generate_request_id)
}

/// Best guess at the client address behind any proxies
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    if let Some(forwarded) = header("x-forwarded-for") {
        if let Some(first) = forwarded.split(',').map(str::trim).find(|ip| !ip.is_empty()) {
            return first.to_string();
        }
    }
    if let Some(real_ip) = header("x-real-ip") {
        return real_ip.to_string();
    }
    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Log before and after each request, within a request id scope
pub async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = request_id_from_headers(request.headers());
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client = client_ip(request.headers(), peer);
    let user_agent = request
        .headers()
        .get(axum::http::header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();

    let span = info_span!("request", request_id = %request_id);
    let scope_id = request_id.clone();
    let handling = async move {
        info!(
            method = %method,
            path = %path,
            request_id = %request_id,
            client_ip = %client,
            user_agent = %user_agent,
            "⏩ Request"
        );

        let mut response = next.run(request).await;

        info!(
            method = %method,
            path = %path,
            request_id = %request_id,
            status = response.status().as_u16(),
            "⏪ Response"
        );

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    };

    scope_request_id(scope_id, handling.instrument(span)).await
}
