use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// A single cached payload and the moment it was last confirmed by the
/// server, either by a successful fetch or by a successful write echo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub value: Value,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            fetched_at: Utc::now(),
        }
    }

    /// True while the entry is younger than the given TTL.
    /// Clock skew producing a future `fetched_at` counts as fresh.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        let age = Utc::now() - self.fetched_at;
        match age.to_std() {
            Ok(age) => age < ttl,
            Err(_) => true,
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.fetched_at).num_minutes()
    }

    /// Human-readable age for admin status lines ("12m ago", "2h ago").
    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew (negative ages)
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            let remaining_mins = minutes % 60;
            if remaining_mins >= 30 {
                // Round up: 1h 30m+ becomes 2h
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            let remaining_hours = (minutes % 1440) / 60;
            if remaining_hours >= 12 {
                // Round up: 1d 12h+ becomes 2d
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use serde_json::json;

    #[test]
    fn test_new_entry_is_fresh() {
        let entry = CacheEntry::new(json!({"name": "hammer"}));
        assert!(entry.is_fresh(Duration::from_secs(300)));
    }

    #[test]
    fn test_entry_goes_stale_after_ttl() {
        let mut entry = CacheEntry::new(json!([1, 2, 3]));
        entry.fetched_at = Utc::now() - ChronoDuration::seconds(301);
        assert!(!entry.is_fresh(Duration::from_secs(300)));
    }

    #[test]
    fn test_future_timestamp_counts_as_fresh() {
        let mut entry = CacheEntry::new(json!(null));
        entry.fetched_at = Utc::now() + ChronoDuration::seconds(30);
        assert!(entry.is_fresh(Duration::from_secs(300)));
    }

    #[test]
    fn test_age_display_just_now() {
        let entry = CacheEntry::new(json!("x"));
        assert_eq!(entry.age_display(), "just now");
    }

    #[test]
    fn test_age_display_minutes_and_hours() {
        let mut entry = CacheEntry::new(json!("x"));
        entry.fetched_at = Utc::now() - ChronoDuration::minutes(12);
        assert_eq!(entry.age_display(), "12m ago");

        entry.fetched_at = Utc::now() - ChronoDuration::minutes(95);
        // 1h 35m rounds up to 2h
        assert_eq!(entry.age_display(), "2h ago");
    }
}
