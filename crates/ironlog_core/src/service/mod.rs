//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Assign ids and timestamps; keep callers decoupled from storage details.

use chrono::{DateTime, Timelike, Utc};

pub mod progress_service;
pub mod seed;
pub mod template_service;
pub mod workout_service;

/// Current instant truncated to the millisecond precision stored on disk.
pub(crate) fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(now.nanosecond() / 1_000_000 * 1_000_000)
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::now_millis;

    #[test]
    fn now_millis_has_no_sub_millisecond_part() {
        assert_eq!(now_millis().timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
