use std::time::Instant;

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};
use tracing::warn;

lazy_static! {
    // Proxy metrics
    pub static ref PROXY_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "proxy_requests_total",
        "Total number of proxy requests received, by collector path",
        &["path"]
    ).unwrap();

    pub static ref UPSTREAM_FAILURES: IntCounterVec = register_int_counter_vec!(
        "upstream_failures_total",
        "Collector calls that ended in an error, by collector path",
        &["path"]
    ).unwrap();

    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        "proxy_request_duration_seconds",
        "Proxy request duration in seconds",
        &["path"],
        vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0]
    ).unwrap();
}

/// Counts a request on construction and observes its duration on drop.
pub struct RequestTimer {
    path: &'static str,
    start: Instant,
}

impl RequestTimer {
    pub fn new(path: &'static str) -> Self {
        PROXY_REQUESTS.with_label_values(&[path]).inc();
        Self {
            path,
            start: Instant::now(),
        }
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        REQUEST_DURATION
            .with_label_values(&[self.path])
            .observe(duration);
    }
}

pub fn record_upstream_failure(path: &str) {
    UPSTREAM_FAILURES.with_label_values(&[path]).inc();
}

/// Text exposition for the `/internal/metrics` endpoint.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&prometheus::gather(), &mut buffer) {
        warn!("failed to encode prometheus metrics: {}", err);
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_failures_are_counted_per_path() {
        let before = UPSTREAM_FAILURES
            .with_label_values(&["/metrics/volume"])
            .get();
        record_upstream_failure("/metrics/volume");
        let after = UPSTREAM_FAILURES
            .with_label_values(&["/metrics/volume"])
            .get();
        assert_eq!(after, before + 1);
    }

    #[test]
    fn render_includes_registered_families() {
        let _timer = RequestTimer::new("/metrics/error");
        drop(_timer);
        let text = render();
        assert!(text.contains("proxy_requests_total"));
        assert!(text.contains("proxy_request_duration_seconds"));
    }
}
