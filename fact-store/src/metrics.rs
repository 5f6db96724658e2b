//! Prometheus metrics for the persistence layer

use lazy_static::lazy_static;
use prometheus::{register_counter_vec, register_histogram_vec, CounterVec, HistogramVec};

lazy_static! {
    /// Attestation store operations by outcome
    pub static ref STORE_OPS_TOTAL: CounterVec = register_counter_vec!(
        "fact_store_ops_total",
        "Attestation store operations",
        &["operation", "status"]
    )
    .unwrap();

    /// Attestation store operation duration
    pub static ref STORE_OP_DURATION: HistogramVec = register_histogram_vec!(
        "fact_store_op_duration_seconds",
        "Attestation store operation duration in seconds",
        &["operation"]
    )
    .unwrap();

    /// Transaction log appends by outcome
    pub static ref LOG_APPEND_TOTAL: CounterVec = register_counter_vec!(
        "fact_store_log_append_total",
        "Transaction log appends",
        &["status"]
    )
    .unwrap();

    /// Event bus publishes by topic and outcome
    pub static ref BUS_PUBLISH_TOTAL: CounterVec = register_counter_vec!(
        "fact_store_bus_publish_total",
        "Event bus publishes",
        &["topic", "status"]
    )
    .unwrap();
}
