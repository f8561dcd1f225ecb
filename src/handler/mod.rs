//! Request handling entry point
//!
//! Validates the HTTP method, builds the request context and dispatches to
//! static file serving. Every request produces exactly one access log line.

pub mod static_files;

use crate::config::AppState;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let path = req.uri().path();
    let is_head = *method == Method::HEAD;

    let response = match check_http_method(method) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext { path, is_head };
            static_files::serve(&ctx, &state).await
        }
    };

    if state.config.logging.access_log {
        logger::log_access(
            &peer_addr,
            method,
            path,
            response.status().as_u16(),
            content_length(&response),
        );
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Response size for the access log, taken from the Content-Length header
fn content_length(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("Content-Length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_gate() {
        assert!(check_http_method(&Method::GET).is_none());
        assert!(check_http_method(&Method::HEAD).is_none());

        let options = check_http_method(&Method::OPTIONS).expect("OPTIONS is answered directly");
        assert_eq!(options.status(), 204);

        let post = check_http_method(&Method::POST).expect("POST is rejected");
        assert_eq!(post.status(), 405);
        assert_eq!(post.headers()["Allow"], "GET, HEAD, OPTIONS");
    }
}
