//! Request middleware: trusted-host filtering and the processing-time header.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::{AppState, errors::Error};

pub const PROCESS_TIME_HEADER: HeaderName = HeaderName::from_static("x-process-time");

/// Whether `host` (without port) is matched by `allowed`.
///
/// An empty list or a `*` entry allows everything; `*.example.com` matches any subdomain.
fn host_allowed(host: &str, allowed: &[String]) -> bool {
    if allowed.is_empty() {
        return true;
    }

    let host = host.to_ascii_lowercase();
    allowed.iter().any(|pattern| {
        let pattern = pattern.to_ascii_lowercase();
        if pattern == "*" {
            true
        } else if let Some(suffix) = pattern.strip_prefix("*.") {
            host.len() > suffix.len() + 1 && host.ends_with(suffix) && host[..host.len() - suffix.len()].ends_with('.')
        } else {
            pattern == host
        }
    })
}

/// Hostname the request was addressed to, without any port
fn request_host(request: &Request) -> Option<String> {
    let raw = match request.headers().get(header::HOST) {
        Some(value) => value.to_str().ok()?.to_string(),
        None => request.uri().authority()?.as_str().to_string(),
    };

    let host = if let Some(rest) = raw.strip_prefix('[') {
        // IPv6 literal, e.g. [::1]:7000
        rest.split(']').next().unwrap_or_default().to_string()
    } else {
        raw.split(':').next().unwrap_or_default().to_string()
    };

    Some(host)
}

pub(crate) fn trusted_host(state: &AppState, request: Request) -> Result<Request, Error> {
    let allowed = &state.config.allowed_hosts;
    if allowed.is_empty() {
        return Ok(request);
    }

    match request_host(&request) {
        Some(host) if host_allowed(&host, allowed) => Ok(request),
        host => {
            debug!("Rejected request for untrusted host {:?}", host);
            Err(Error::BadRequest {
                message: "Invalid host header".to_string(),
            })
        }
    }
}

/// Reject requests whose `Host` is not in `allowed_hosts`
pub async fn trusted_host_middleware(State(state): State<AppState>, request: Request, next: Next) -> Result<Response, Error> {
    let request = trusted_host(&state, request)?;
    Ok(next.run(request).await)
}

/// Add an `X-Process-Time` header with the handling time in seconds
pub async fn process_time_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let mut response = next.run(request).await;

    let elapsed = start.elapsed().as_secs_f64();
    if let Ok(value) = HeaderValue::from_str(&format!("{elapsed:.6}")) {
        response.headers_mut().insert(PROCESS_TIME_HEADER, value);
    }

    response
}
