//! Timestamp storage format.
//!
//! Every `created_at`/`updated_at` column holds fixed-width UTC text
//! (`2026-10-14T08:30:00.000000Z`). Rows and report bounds are encoded by the
//! same function, so string comparison in SQL matches time order.

use chrono::{DateTime, SubsecRound, Utc};

const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Drops precision finer than what [`encode`] keeps.
pub fn truncate(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(6)
}

pub fn encode(at: DateTime<Utc>) -> String {
    at.format(FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_encoding_is_fixed_width_and_ordered() {
        let a = Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap();
        let b = a + Duration::microseconds(1);
        let c = a + Duration::hours(5);

        let (ea, eb, ec) = (encode(a), encode(b), encode(c));
        assert_eq!(ea, "2026-10-14T09:00:00.000000Z");
        assert_eq!(ea.len(), eb.len());
        assert!(ea < eb && eb < ec);
    }

    #[test]
    fn test_truncate_keeps_microseconds() {
        let at = Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap()
            + Duration::nanoseconds(1_234_567);
        assert_eq!(encode(truncate(at)), "2026-10-14T09:00:00.001234Z");
        assert_eq!(truncate(truncate(at)), truncate(at));
    }
}
