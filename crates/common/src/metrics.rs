use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static RECORDS_CREATED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "records_created_total",
        "Records created, by entity",
        &["entity"]
    )
    .expect("register records_created_total")
});

pub static RECORDS_DELETED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "records_deleted_total",
        "Records actually removed by delete requests, by entity",
        &["entity"]
    )
    .expect("register records_deleted_total")
});

pub static USER_CHECKS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "user_checks_total",
        "Cross-service user existence checks, by outcome",
        &["outcome"]
    )
    .expect("register user_checks_total")
});

pub fn record_created(entity: &str) {
    RECORDS_CREATED_TOTAL.with_label_values(&[entity]).inc();
}

pub fn record_deleted(entity: &str) {
    RECORDS_DELETED_TOTAL.with_label_values(&[entity]).inc();
}

pub fn user_check(outcome: &str) {
    USER_CHECKS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        record_created("test_entity");
        user_check("validated");
        let (status, body) = encode_metrics();
        assert_eq!(status, axum::http::StatusCode::OK);
        assert!(body.contains("records_created_total"));
        assert!(body.contains("user_checks_total"));
    }
}
