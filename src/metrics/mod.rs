// Private module declaration
mod server;

use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};

// Re-export for public API
pub use server::start_metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for the order endpoints
// ============================================================================
//
// - Operation outcomes (ok, not_found, invalid, error) per order operation
// - Operation latency
// - Line items written by create / add-lines
//
// Scraped from a separate listener via /metrics.
// ============================================================================

/// Outcome label attached to every recorded operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    NotFound,
    Invalid,
    Error,
}

impl Outcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotFound => "not_found",
            Self::Invalid => "invalid",
            Self::Error => "error",
        }
    }
}

pub struct Metrics {
    registry: Registry,
    pub operations_total: IntCounterVec,
    pub operation_duration: HistogramVec,
    pub lines_written: IntCounter,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let operations_total = IntCounterVec::new(
            Opts::new("orders_operations_total", "Total order operations by outcome"),
            &["operation", "outcome"],
        )?;
        registry.register(Box::new(operations_total.clone()))?;

        let operation_duration = HistogramVec::new(
            HistogramOpts::new(
                "orders_operation_duration_seconds",
                "Order operation duration",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["operation"],
        )?;
        registry.register(Box::new(operation_duration.clone()))?;

        let lines_written = IntCounter::new(
            "order_lines_written_total",
            "Total order lines persisted by create and add-lines",
        )?;
        registry.register(Box::new(lines_written.clone()))?;

        Ok(Self {
            registry,
            operations_total,
            operation_duration,
            lines_written,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_operation(&self, operation: &str, outcome: Outcome, duration_secs: f64) {
        self.operations_total
            .with_label_values(&[operation, outcome.as_str()])
            .inc();
        self.operation_duration
            .with_label_values(&[operation])
            .observe(duration_secs);
    }

    pub fn record_lines_written(&self, count: usize) {
        self.lines_written.inc_by(count as u64);
    }
}
