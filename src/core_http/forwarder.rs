use crate::capture::{CaptureLog, Channel};
use crate::constants::{HTTP_HEADER_TIMEOUT, MAX_HTTP_HEAD};
use crate::core_ftpcommand::utils::to_segments;
use crate::core_http::request::{content_type, parse_target};
use crate::core_network::error::NetworkError;
use crate::core_tls::TlsConnection;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::header::{HeaderValue, CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::{TokioIo, TokioTimer};
use log::{debug, info};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};

/// Serves files from the DTD directory to connections that spoke first.
pub struct HttpForwarder {
    root: PathBuf,
    capture: Arc<CaptureLog>,
    tls: Arc<TlsConnection>,
}

impl HttpForwarder {
    pub fn new(root: PathBuf, capture: Arc<CaptureLog>, tls: Arc<TlsConnection>) -> Self {
        Self { root, capture, tls }
    }

    /// Takes over a classified connection. `stream` still yields the bytes
    /// consumed during classification.
    pub async fn handle<S>(&self, stream: S, peer: SocketAddr, is_tls: bool) -> Result<(), NetworkError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        if !is_tls {
            return self.serve(stream, peer).await;
        }

        if !self.tls.is_ready() {
            debug!("First HTTPS client {}, building TLS context", peer);
        }
        // A context that cannot be built is a handoff failure, not a peer error.
        let tls_stream = match self.tls.accept_tls(stream).await {
            Ok(tls_stream) => tls_stream,
            Err(source) if source.is_setup_failure() => {
                return Err(NetworkError::HandoffFailure { peer, source });
            }
            Err(e) => return Err(e.into()),
        };
        debug!("TLS handshake completed with {}", peer);
        self.serve(tls_stream, peer).await
    }

    async fn serve<S>(&self, stream: S, peer: SocketAddr) -> Result<(), NetworkError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let service = service_fn(move |request: Request<Incoming>| async move {
            Ok::<_, Infallible>(self.respond(request, peer).await)
        });

        let mut builder = http1::Builder::new();
        builder
            .keep_alive(false)
            .max_buf_size(MAX_HTTP_HEAD)
            .timer(TokioTimer::new())
            .header_read_timeout(HTTP_HEADER_TIMEOUT);

        match builder.serve_connection(TokioIo::new(stream), service).await {
            Ok(()) => Ok(()),
            // hyper already answered malformed requests; slow or vanished
            // clients are their own problem
            Err(e) if e.is_parse() || e.is_timeout() || e.is_incomplete_message() => {
                debug!("HTTP client {} dropped: {}", peer, e);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn respond(&self, request: Request<Incoming>, peer: SocketAddr) -> Response<Full<Bytes>> {
        let request_line = format!(
            "{} {} {:?}",
            request.method(),
            request.uri(),
            request.version()
        );
        info!("HTTP request from {}: {}", peer, request_line);
        if let Some(agent) = request
            .headers()
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
        {
            info!("HTTP client {} identifies as {}", peer, agent);
        }
        self.capture.record(peer, Channel::Http, &request_line).await;

        let head_only = request.method() == Method::HEAD;
        let response = if request.method() != Method::GET && !head_only {
            reply(StatusCode::METHOD_NOT_ALLOWED, "text/plain", Bytes::new(), false)
        } else {
            self.serve_file(&request.uri().to_string(), peer, head_only)
                .await
        };
        info!("HTTP response to {}: {}", peer, response.status());
        response
    }

    async fn serve_file(&self, target: &str, peer: SocketAddr, head_only: bool) -> Response<Full<Bytes>> {
        let not_found = || reply(StatusCode::NOT_FOUND, "text/plain", Bytes::new(), head_only);

        let Some(target) = parse_target(target) else {
            return reply(StatusCode::BAD_REQUEST, "text/plain", Bytes::new(), head_only);
        };
        for (key, value) in &target.query {
            info!("HTTP query parameter from {}: {}={}", peer, key, value);
        }

        if target.segments.iter().any(|s| s.contains(['/', '\\'])) {
            return not_found();
        }
        let segments = match to_segments(&[], &target.segments.join("/")) {
            Ok(segments) if !segments.is_empty() => segments,
            _ => return not_found(),
        };
        let file = segments
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment));

        match tokio::fs::read(&file).await {
            Ok(body) => {
                let name = segments.last().map(String::as_str).unwrap_or_default();
                reply(StatusCode::OK, content_type(name), Bytes::from(body), head_only)
            }
            Err(e) => {
                debug!("Cannot serve {:?} to {}: {}", file, peer, e);
                not_found()
            }
        }
    }
}

/// Builds a response that closes the connection. HEAD keeps the length of
/// the body it does not carry.
fn reply(
    status: StatusCode,
    content_type: &'static str,
    body: Bytes,
    head_only: bool,
) -> Response<Full<Bytes>> {
    let length = body.len();
    let body = if head_only { Bytes::new() } else { body };

    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
    headers.insert(CONNECTION, HeaderValue::from_static("close"));
    response
}
