//! Store request metrics.

use metrics::{counter, histogram};

pub mod names {
    /// Store requests by operation, collection and status.
    pub const REQUESTS_TOTAL: &str = "store_requests_total";
    pub const RETRIES_TOTAL: &str = "store_retries_total";
    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "store_request_duration_seconds";
}

pub fn record_request(operation: &str, collection: &str, status: u16, latency_secs: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "collection" => collection.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_secs);
}

pub fn record_retry(operation: &str) {
    counter!(names::RETRIES_TOTAL, "operation" => operation.to_string()).increment(1);
}
