//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, context
//! extraction, static file dispatch and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, Body};
use crate::logger::{self, AccessLogEntry};
use hyper::body::Body as _;
use hyper::header::{HeaderValue, IF_MODIFIED_SINCE, IF_NONE_MATCH, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) request path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Body>, Infallible> {
    let started = Instant::now();
    let method = req.method();
    let uri = req.uri();
    let headers = req.headers();

    let mut response = if let Some(resp) = check_http_method(method) {
        resp
    } else {
        let ctx = RequestContext {
            path: uri.path(),
            query: uri.query(),
            is_head: *method == Method::HEAD,
            if_none_match: headers.get(IF_NONE_MATCH).and_then(|v| v.to_str().ok()),
            if_modified_since: headers
                .get(IF_MODIFIED_SINCE)
                .and_then(|v| v.to_str().ok()),
        };
        static_files::serve(&ctx, &state).await
    };

    match HeaderValue::from_str(&state.config.http.server_name) {
        Ok(server) => {
            response.headers_mut().insert(SERVER, server);
        }
        Err(e) => logger::log_warning(&format!("Invalid server name header: {e}")),
    }

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            uri.path_and_query()
                .map_or_else(|| uri.path().to_string(), ToString::to_string),
        );
        entry.http_version = version_label(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
            .unwrap_or(usize::MAX);
        entry.referer = header_string(headers, &REFERER);
        entry.user_agent = header_string(headers, &USER_AGENT);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Only GET and HEAD are served; everything else gets 501
fn check_http_method(method: &Method) -> Option<Response<Body>> {
    if method == Method::GET || method == Method::HEAD {
        return None;
    }
    Some(http::build_error_response(
        StatusCode::NOT_IMPLEMENTED,
        Some(&format!("Unsupported method ('{method}')")),
        false,
    ))
}

fn header_string(headers: &hyper::HeaderMap, name: &hyper::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::{BodyExt, Empty};
    use hyper::body::Bytes;

    fn state_for(root: &std::path::Path) -> Arc<AppState> {
        let mut cfg = Config::default();
        cfg.static_files.root_dir = root.display().to_string();
        cfg.logging.access_log = false;
        Arc::new(AppState::new(cfg).unwrap())
    }

    fn request(method: Method, uri: &str) -> Request<Empty<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Empty::new())
            .unwrap()
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let dir = tempfile::tempdir().unwrap();
        let response = handle_request(request(Method::POST, "/"), state_for(dir.path()), peer())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Unsupported method (&#x27;POST&#x27;)"));
    }

    #[tokio::test]
    async fn test_server_header_is_set() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        let state = state_for(dir.path());

        let ok = handle_request(request(Method::GET, "/a.txt"), Arc::clone(&state), peer())
            .await
            .unwrap();
        let missing = handle_request(request(Method::GET, "/b.txt"), state, peer())
            .await
            .unwrap();

        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(ok.headers()[SERVER], "NoCacheHTTP/0.1");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(missing.headers()[SERVER], "NoCacheHTTP/0.1");
    }

    #[tokio::test]
    async fn test_access_log_enabled_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "abc").unwrap();
        let mut cfg = Config::default();
        cfg.static_files.root_dir = dir.path().display().to_string();
        cfg.logging.access_log_format = "json".to_string();
        let state = Arc::new(AppState::new(cfg).unwrap());

        let response = handle_request(request(Method::GET, "/a.txt?x=1"), state, peer())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_version_label() {
        assert_eq!(version_label(hyper::Version::HTTP_10), "1.0");
        assert_eq!(version_label(hyper::Version::HTTP_11), "1.1");
    }
}
