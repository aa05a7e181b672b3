use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Authentication metrics
    pub token_fetch_requests: IntCounter,
    pub token_fetch_failures: IntCounterVec,
    pub token_fetch_duration: Histogram,

    // Composition metrics
    pub provider_selections: IntCounterVec,
    pub persons_clients_created: IntCounter,

    // Upstream data calls
    pub upstream_requests: IntCounterVec,

    // Config
    pub config_validation_errors: IntCounter,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("dashboard".into()), None)
            .expect("static metrics prefix is valid");

        let metrics: Arc<Metrics> = Arc::new(Self {
            token_fetch_requests: IntCounter::new("token_fetch_requests_total", "Access token requests sent to the authentication service").expect("metric definition"),
            token_fetch_failures: IntCounterVec::new(Opts::new("token_fetch_failures_total", "Access token failures by reason"), &["reason"]).expect("metric definition"),
            token_fetch_duration: Histogram::with_opts(HistogramOpts::new("token_fetch_duration_seconds", "Access token fetch duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0])).expect("metric definition"),

            provider_selections: IntCounterVec::new(Opts::new("provider_selections_total", "Provider implementation selected per capability"), &["capability", "implementation"]).expect("metric definition"),
            persons_clients_created: IntCounter::new("persons_clients_created_total", "Authenticated Persons API clients handed out").expect("metric definition"),

            upstream_requests: IntCounterVec::new(Opts::new("upstream_requests_total", "Upstream data requests by system and outcome"), &["upstream", "outcome"]).expect("metric definition"),

            config_validation_errors: IntCounter::new("config_validation_errors_total", "Validation errors during startup").expect("metric definition"),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_fetch_requests.clone())).expect("unique metric");
        reg.register(Box::new(metrics.token_fetch_failures.clone())).expect("unique metric");
        reg.register(Box::new(metrics.token_fetch_duration.clone())).expect("unique metric");
        reg.register(Box::new(metrics.provider_selections.clone())).expect("unique metric");
        reg.register(Box::new(metrics.persons_clients_created.clone())).expect("unique metric");
        reg.register(Box::new(metrics.upstream_requests.clone())).expect("unique metric");
        reg.register(Box::new(metrics.config_validation_errors.clone())).expect("unique metric");

        metrics
    }

    /// Prometheus text exposition of every registered metric.
    pub fn encode_text(&self) -> anyhow::Result<String> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
