//! Metrics for provider calls
//!
//! Counters and histograms are emitted through the `metrics` facade. The
//! library installs no recorder; whichever exporter the host application
//! installs picks them up.

use crate::api::Usage;

/// Describe all metrics (call once at startup, after installing a recorder)
pub fn describe_metrics() {
    metrics::describe_counter!(
        "aitools_provider_calls_total",
        "Total number of provider calls by endpoint and outcome"
    );
    metrics::describe_histogram!(
        "aitools_provider_call_duration_seconds",
        "Provider call duration in seconds"
    );
    metrics::describe_counter!(
        "aitools_tokens_total",
        "Total tokens reported by the provider"
    );
    metrics::describe_counter!(
        "aitools_downloads_total",
        "Total asset download slots by result"
    );
    metrics::describe_counter!(
        "aitools_uploads_total",
        "Total object store uploads by result"
    );
}

/// Record a provider call
pub fn record_call(endpoint: &str, outcome: &str, duration_secs: f64) {
    metrics::counter!(
        "aitools_provider_calls_total",
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "aitools_provider_call_duration_seconds",
        "endpoint" => endpoint.to_string()
    )
    .record(duration_secs);
}

/// Record tokens reported for one call
pub fn record_tokens(token_type: &str, count: u64, model: &str) {
    metrics::counter!(
        "aitools_tokens_total",
        "type" => token_type.to_string(),
        "model" => model.to_string()
    )
    .increment(count);
}

/// Record prompt and completion tokens from a usage block
pub fn record_usage(usage: &Usage, model: &str) {
    record_tokens("prompt", u64::from(usage.prompt_tokens), model);
    record_tokens("completion", u64::from(usage.completion_tokens), model);
}

/// Record one download slot (`ok`, `failed`, `skipped`)
pub fn record_download(result: &str) {
    metrics::counter!("aitools_downloads_total", "result" => result.to_string()).increment(1);
}

/// Record an object store upload
pub fn record_upload(store: &str, result: &str) {
    metrics::counter!(
        "aitools_uploads_total",
        "store" => store.to_string(),
        "result" => result.to_string()
    )
    .increment(1);
}
