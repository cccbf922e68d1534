//! W3C Trace Context propagation for outgoing provider API calls.
//!
//! When an OpenTelemetry propagator is registered globally, the current
//! span's `traceparent`/`tracestate` are copied onto the vendor request so
//! the call shows up in the caller's trace. Without a propagator nothing is
//! added.

use opentelemetry::propagation::Injector;
use opentelemetry::{Context, global};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

struct HeaderMapInjector<'a>(&'a mut HeaderMap);

impl Injector for HeaderMapInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(&value),
        ) else {
            return;
        };
        self.0.insert(name, value);
    }
}

/// Trace headers for the current context. Empty when tracing is disabled.
pub fn trace_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let cx = Context::current();
    global::get_text_map_propagator(|propagator| {
        propagator.inject_context(&cx, &mut HeaderMapInjector(&mut headers));
    });
    headers
}

/// Add the current trace context to an outgoing request.
pub fn inject_trace_context(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    builder.headers(trace_headers())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_propagator_means_no_headers() {
        assert!(trace_headers().is_empty());
    }
}
