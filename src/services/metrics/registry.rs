use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, IntCounter, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

const NAMESPACE: &str = "studytainment";

/// Central metrics registry for the booking platform
pub struct MetricsRegistry {
    registry: Registry,

    // HTTP Metrics
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,

    // Booking Metrics
    pub bookings_total: CounterVec,
    pub payments_total: CounterVec,
    pub tickets_issued_total: IntCounter,

    // Auth Metrics
    pub refresh_rotations_total: CounterVec,
}

impl MetricsRegistry {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests").namespace(NAMESPACE),
            &["method", "endpoint", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request duration")
                .namespace(NAMESPACE)
                .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        let bookings_total = CounterVec::new(
            Opts::new("bookings_total", "Booking attempts by outcome").namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(bookings_total.clone()))?;

        let payments_total = CounterVec::new(
            Opts::new("payments_total", "Payment verifications by outcome").namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(payments_total.clone()))?;

        let tickets_issued_total = IntCounter::with_opts(
            Opts::new("tickets_issued_total", "Tickets minted").namespace(NAMESPACE),
        )?;
        registry.register(Box::new(tickets_issued_total.clone()))?;

        let refresh_rotations_total = CounterVec::new(
            Opts::new("refresh_rotations_total", "Refresh token rotations by outcome")
                .namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(refresh_rotations_total.clone()))?;

        Ok(Arc::new(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            bookings_total,
            payments_total,
            tickets_issued_total,
            refresh_rotations_total,
        }))
    }

    pub fn record_booking(&self, outcome: &str) {
        self.bookings_total.with_label_values(&[outcome]).inc();
    }

    pub fn record_payment(&self, outcome: &str) {
        self.payments_total.with_label_values(&[outcome]).inc();
    }

    pub fn record_refresh(&self, outcome: &str) {
        self.refresh_rotations_total.with_label_values(&[outcome]).inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
