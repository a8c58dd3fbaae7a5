//! Prometheus metrics
//!
//! Counters are recorded through the `metrics` facade and rendered by a
//! process-wide Prometheus recorder installed on first use. Recording
//! before installation is a no-op.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::server::StreamOutcome;
use crate::types::{FaultKind, Provider};

/// Pre-defined metric names
pub mod metric_names {
    pub const REQUESTS_TOTAL: &str = "llm_emulator_requests_total";
    pub const FAULTS_TOTAL: &str = "llm_emulator_faults_total";
    pub const STREAMS_TOTAL: &str = "llm_emulator_streams_total";
    pub const TOKENS_INPUT: &str = "llm_emulator_tokens_input_total";
    pub const TOKENS_OUTPUT: &str = "llm_emulator_tokens_output_total";
}

static PROMETHEUS: OnceCell<Option<PrometheusHandle>> = OnceCell::new();

/// Install the Prometheus recorder once and return its handle. Returns
/// `None` if another recorder was installed first.
pub fn install_metrics() -> Option<PrometheusHandle> {
    PROMETHEUS
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "Prometheus recorder not installed");
                None
            }
        })
        .clone()
}

/// Current metrics in Prometheus text format
pub fn render_metrics() -> String {
    install_metrics().map(|handle| handle.render()).unwrap_or_default()
}

/// Count one request that reached a provider handler
pub fn record_request(provider: Provider, stream: bool) {
    ::metrics::counter!(
        metric_names::REQUESTS_TOTAL,
        "provider" => provider.as_str(),
        "stream" => if stream { "true" } else { "false" }
    )
    .increment(1);
}

/// Count one injected fault
pub fn record_fault(provider: Provider, kind: FaultKind) {
    ::metrics::counter!(
        metric_names::FAULTS_TOTAL,
        "provider" => provider.as_str(),
        "kind" => kind.as_str()
    )
    .increment(1);
}

/// Count one finished stream
pub fn record_stream(provider: Provider, outcome: StreamOutcome) {
    ::metrics::counter!(
        metric_names::STREAMS_TOTAL,
        "provider" => provider.as_str(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Add estimated token usage
pub fn record_tokens(provider: Provider, input: u32, output: u32) {
    ::metrics::counter!(metric_names::TOKENS_INPUT, "provider" => provider.as_str())
        .increment(u64::from(input));
    ::metrics::counter!(metric_names::TOKENS_OUTPUT, "provider" => provider.as_str())
        .increment(u64::from(output));
}
