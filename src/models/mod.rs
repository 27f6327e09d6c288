pub mod coupon;
pub mod user_wellness_pass;
pub mod user_wellness_pass_day;
pub mod user_wellness_state;
pub mod wellness_pass;
pub mod wellness_pass_day;

use chrono::{DateTime, Utc};

use crate::domain::DomainError;

/// Timestamps are persisted as RFC 3339 text.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| DomainError::Internal(format!("invalid timestamp '{}': {}", raw, e)))
}
