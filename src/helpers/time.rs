use chrono::{DateTime, Duration, Utc};
use tokio::time::Instant;

/// Expiry instant for a relative lifetime, as reported by `expires_in`.
pub fn expires_in_seconds(seconds: u64) -> Option<DateTime<Utc>> {
    let seconds = i64::try_from(seconds).ok()?;
    Utc::now().checked_add_signed(Duration::try_seconds(seconds)?)
}

/// Expiry instant for an absolute unix timestamp, as carried by a JWT `exp` claim.
pub fn from_unix_seconds(exp: u64) -> Option<DateTime<Utc>> {
    i64::try_from(exp)
        .ok()
        .and_then(|exp| DateTime::from_timestamp(exp, 0))
}

pub fn get_instant() -> Instant {
    Instant::now()
}
