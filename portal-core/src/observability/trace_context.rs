//! W3C Trace Context propagation for calls to the fleet API.
//!
//! See: https://www.w3.org/TR/trace-context/

use opentelemetry::trace::TraceContextExt;
use reqwest::header::HeaderMap;
use reqwest::Method;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Header name for W3C traceparent
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Header name for W3C tracestate
pub const TRACESTATE_HEADER: &str = "tracestate";

/// Header name for request correlation ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Inject the current span's trace context as traceparent/tracestate headers.
///
/// Nothing is written when there is no valid OpenTelemetry context, e.g. when
/// the portal runs without an OTLP endpoint.
pub fn inject_trace_context(headers: &mut HeaderMap) {
    let span = Span::current();
    let context = span.context();
    let otel_span = context.span();
    let span_context = otel_span.span_context();

    if !span_context.is_valid() {
        return;
    }

    // version-trace_id-span_id-trace_flags
    let traceparent = format!(
        "00-{}-{}-{:02x}",
        span_context.trace_id(),
        span_context.span_id(),
        span_context.trace_flags().to_u8()
    );
    if let Ok(value) = traceparent.parse() {
        headers.insert(TRACEPARENT_HEADER, value);
    }

    let tracestate = span_context.trace_state().header();
    if !tracestate.is_empty() {
        if let Ok(value) = tracestate.parse() {
            headers.insert(TRACESTATE_HEADER, value);
        }
    }
}

/// A reqwest request that gets trace headers injected when sent.
pub struct TracedRequest {
    request: reqwest::RequestBuilder,
}

impl TracedRequest {
    pub fn new(request: reqwest::RequestBuilder) -> Self {
        Self { request }
    }

    fn map(self, f: impl FnOnce(reqwest::RequestBuilder) -> reqwest::RequestBuilder) -> Self {
        Self {
            request: f(self.request),
        }
    }

    pub fn json<T: serde::Serialize + ?Sized>(self, body: &T) -> Self {
        self.map(|request| request.json(body))
    }

    /// Appended to the URL's query string.
    pub fn query<T: serde::Serialize + ?Sized>(self, params: &T) -> Self {
        self.map(|request| request.query(params))
    }

    /// `application/x-www-form-urlencoded` body.
    pub fn form<T: serde::Serialize + ?Sized>(self, fields: &T) -> Self {
        self.map(|request| request.form(fields))
    }

    pub fn bearer_auth<T: std::fmt::Display>(self, token: T) -> Self {
        self.map(|request| request.bearer_auth(token))
    }

    pub async fn send(self) -> Result<reqwest::Response, reqwest::Error> {
        let mut headers = HeaderMap::new();
        inject_trace_context(&mut headers);

        self.request.headers(headers).send().await
    }
}

/// Start traced requests from a shared `reqwest::Client`.
pub trait TracedClientExt {
    fn traced(&self, method: Method, url: &str) -> TracedRequest;
}

impl TracedClientExt for reqwest::Client {
    fn traced(&self, method: Method, url: &str) -> TracedRequest {
        TracedRequest::new(self.request(method, url))
    }
}
