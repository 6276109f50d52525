use std::env;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Per-process turn counters.
#[derive(Debug, Default)]
pub struct AppMetrics {
    turns_total: AtomicU64,
    extraction_failures_total: AtomicU64,
    resolution_failures_total: AtomicU64,
    degraded_lookups_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub turns_total: u64,
    pub extraction_failures_total: u64,
    pub resolution_failures_total: u64,
    pub degraded_lookups_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_turn(&self) {
        self.turns_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_extraction_failure(&self) {
        self.extraction_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_resolution_failure(&self) {
        self.resolution_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_degraded_lookup(&self) {
        self.degraded_lookups_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let turns = self.turns_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            turns_total: turns,
            extraction_failures_total: self.extraction_failures_total.load(Ordering::Relaxed),
            resolution_failures_total: self.resolution_failures_total.load(Ordering::Relaxed),
            degraded_lookups_total: self.degraded_lookups_total.load(Ordering::Relaxed),
            avg_latency_millis: if turns == 0 {
                0.0
            } else {
                latency as f64 / turns as f64
            },
        }
    }
}

/// Installs the global subscriber once. JSON lines on stderr unless
/// `SANCHARI_LOG_FORMAT=pretty`.
pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,sanchari_agents=info,sanchari_services=info",
                service_name
            ))
        });

        let pretty = env::var("SANCHARI_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("pretty"))
            .unwrap_or(false);

        if pretty {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        } else {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(io::stderr)
                .init();
        }
    });
}
