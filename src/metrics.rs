use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Histogram, register_counter, register_counter_vec, register_histogram,
};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("testgen_requests_total", "Total number of generate requests").unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter =
        register_counter!("testgen_rate_limited_total", "Requests rejected by the local rate limiter").unwrap();
    pub static ref UPSTREAM_ERRORS: CounterVec = register_counter_vec!(
        "testgen_upstream_errors_total",
        "Failed completion calls by error kind",
        &["kind"]
    )
    .unwrap();
    pub static ref GENERATION_LATENCY: Histogram = register_histogram!(
        "testgen_generation_latency_seconds",
        "Completion call latency in seconds"
    )
    .unwrap();
}
