use chrono::{DateTime, Utc};

/// Items younger than this are considered too fresh to rewrite safely.
pub const MIN_AGE_HOURS: i64 = 48;

/// Eligibility verdict for a candidate item's publication timestamp.
#[derive(Debug, Clone, Copy)]
pub struct AgeDecision {
    pub passed: bool,
    pub age_hours: i64,
    pub required_hours: i64,
}

/// Classify an item as old enough to rewrite.
pub fn check_age(published_at: DateTime<Utc>) -> AgeDecision {
    check_age_at(published_at, Utc::now())
}

fn check_age_at(published_at: DateTime<Utc>, now: DateTime<Utc>) -> AgeDecision {
    let age_hours = (now - published_at).num_seconds() as f64 / 3600.0;
    AgeDecision {
        // The unrounded age decides; the rounded value is for reporting.
        passed: age_hours >= MIN_AGE_HOURS as f64,
        age_hours: age_hours.round() as i64,
        required_hours: MIN_AGE_HOURS,
    }
}
