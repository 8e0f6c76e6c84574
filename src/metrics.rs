use lazy_static::lazy_static;
use prometheus::{
    IntCounterVec, IntGaugeVec, register_int_counter_vec, register_int_gauge_vec,
};

// all series are labelled by the guarded action ("invitations", "free_tools")
lazy_static! {
    pub static ref ADMISSION_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "admission_requests_total",
        "Total admission checks",
        &["limiter"]
    )
    .unwrap();
    pub static ref ADMISSION_ALLOWED: IntCounterVec = register_int_counter_vec!(
        "admission_allowed_total",
        "Admission checks that were allowed",
        &["limiter"]
    )
    .unwrap();
    pub static ref ADMISSION_DENIED: IntCounterVec = register_int_counter_vec!(
        "admission_denied_total",
        "Admission checks that were denied",
        &["limiter"]
    )
    .unwrap();
    pub static ref TRACKED_KEYS: IntGaugeVec = register_int_gauge_vec!(
        "admission_tracked_keys",
        "Current number of buckets held by a limiter",
        &["limiter"]
    )
    .unwrap();
    pub static ref SWEPT_KEYS: IntCounterVec = register_int_counter_vec!(
        "admission_swept_keys_total",
        "Expired buckets removed by the sweeper",
        &["limiter"]
    )
    .unwrap();
}
