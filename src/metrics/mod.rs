// Prometheus metrics for the image proxy
//
// Registered once in the default registry and exported by the scrape
// endpoint bound to `server.metrics_port`:
// - Request counters by outcome (ok, invalid_spec, not_found, upstream_error)
// - Request latency histograms by kind (passthrough, transform)
// - Transform counters and latency

use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter, register_int_counter_vec,
    Histogram, HistogramVec, IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use std::time::Duration;

/// Global metrics registry for the proxy
pub struct ProxyMetrics {
    /// Requests by outcome
    pub requests: IntCounterVec,

    /// End-to-end request duration (in seconds) by request kind
    pub request_duration: HistogramVec,

    /// Successful transforms
    pub transforms: IntCounter,

    /// Time spent inside the transformer (in seconds)
    pub transform_duration: Histogram,
}

static METRICS: OnceLock<ProxyMetrics> = OnceLock::new();

impl ProxyMetrics {
    /// Initialize and return the global metrics instance
    ///
    /// Subsequent calls return the same instance.
    pub fn global() -> &'static Self {
        METRICS.get_or_init(|| {
            let requests = register_int_counter_vec!(
                "imageview_requests_total",
                "Total number of requests by outcome",
                &["outcome"] // ok, invalid_spec, not_found, upstream_error
            )
            .expect("Failed to register imageview_requests_total metric");

            let request_duration = register_histogram_vec!(
                "imageview_request_duration_seconds",
                "Duration of requests in seconds",
                &["kind"], // passthrough, transform
                vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
            )
            .expect("Failed to register imageview_request_duration_seconds metric");

            let transforms = register_int_counter!(
                "imageview_transforms_total",
                "Total number of successful image transforms"
            )
            .expect("Failed to register imageview_transforms_total metric");

            let transform_duration = register_histogram!(
                "imageview_transform_duration_seconds",
                "Duration of image transforms in seconds",
                vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
            )
            .expect("Failed to register imageview_transform_duration_seconds metric");

            ProxyMetrics {
                requests,
                request_duration,
                transforms,
                transform_duration,
            }
        })
    }

    /// Record a finished request
    pub fn record_request(&self, outcome: &str, kind: &str, duration: Duration) {
        self.requests.with_label_values(&[outcome]).inc();
        self.request_duration
            .with_label_values(&[kind])
            .observe(duration.as_secs_f64());
    }

    /// Record a successful transform
    pub fn record_transform(&self, duration: Duration) {
        self.transforms.inc();
        self.transform_duration.observe(duration.as_secs_f64());
    }
}
