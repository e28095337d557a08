//! Follow-graph metrics

use prometheus::IntCounterVec;

lazy_static::lazy_static! {
    pub static ref FOLLOW_EVENTS_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "social_follow_events_total",
        "Follow and unfollow requests by outcome",
        &["action", "outcome"]
    ).unwrap();
}

/// `action` is `follow` or `unfollow`; `outcome` is e.g. `created`, `already_exists`,
/// `removed`, `noop`, `rejected` or `failed`.
pub fn record_follow_event(action: &str, outcome: &str) {
    FOLLOW_EVENTS_TOTAL
        .with_label_values(&[action, outcome])
        .inc();
}
