//! Per-request tracing context
//!
//! Plugged into tower-http's `TraceLayer`: every request gets one
//! `http_request` span carrying correlation ids and HTTP metadata, and the
//! response status is recorded on it when the handler finishes.

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request, Response};
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::trace::{MakeSpan, OnResponse};
use tracing::{field, info, Span};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Correlation ids and HTTP metadata of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    pub trace_id: String,
    pub span_id: String,
    pub method: String,
    pub path: String,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestContext {
    pub fn from_request<B>(request: &Request<B>) -> Self {
        let headers = request.headers();

        let request_id = header_value(headers, REQUEST_ID_HEADER)
            .or_else(|| header_value(headers, CORRELATION_ID_HEADER))
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let path = match request.uri().query().filter(|q| !q.is_empty()) {
            Some(query) => format!("{}?{}", request.uri().path(), query),
            None => request.uri().path().to_string(),
        };

        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Self {
            request_id,
            trace_id: random_hex(32),
            span_id: random_hex(16),
            method: request.method().to_string(),
            path,
            client_ip: client_ip(headers).or(peer),
            user_agent: header_value(headers, "user-agent").map(str::to_string),
        }
    }
}

/// First hop of X-Forwarded-For, then X-Real-IP
fn client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = header_value(headers, "x-forwarded-for") {
        let first = forwarded.split(',').next().unwrap_or(forwarded).trim();
        if !first.is_empty() {
            return Some(first.to_string());
        }
    }
    header_value(headers, "x-real-ip").map(str::to_string)
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn random_hex(len: usize) -> String {
    let value = Uuid::new_v4().simple().to_string();
    value[..len.min(value.len())].to_string()
}

/// Opens the `http_request` span
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let ctx = RequestContext::from_request(request);

        let span = tracing::info_span!(
            "http_request",
            request_id = %ctx.request_id,
            trace_id = %ctx.trace_id,
            span_id = %ctx.span_id,
            http.method = %ctx.method,
            http.path = %ctx.path,
            http.client_ip = field::Empty,
            http.user_agent = field::Empty,
            http.status = field::Empty,
        );

        if let Some(ip) = &ctx.client_ip {
            span.record("http.client_ip", ip.as_str());
        }
        if let Some(agent) = &ctx.user_agent {
            span.record("http.user_agent", agent.as_str());
        }

        span
    }
}

/// Records the final status on the request span
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordStatus;

impl<B> OnResponse<B> for RecordStatus {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status().as_u16();
        span.record("http.status", status);
        info!(status, latency_ms = latency.as_millis() as u64, "request completed");
    }
}
