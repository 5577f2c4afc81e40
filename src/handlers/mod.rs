pub mod bookings;
pub mod health;
pub mod services;

use chrono::{DateTime, NaiveDate};

use crate::errors::AppError;
use crate::models::BookingStatus;
use crate::services::time::normalize_time;

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp. A timestamp keeps the
/// calendar day of its own offset.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    let s = raw.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))
        .map_err(|_| AppError::BadRequest(format!("invalid date: {s}")))
}

pub(crate) fn parse_time(field: &str, raw: &str) -> Result<String, AppError> {
    normalize_time(raw.trim())
        .ok_or_else(|| AppError::BadRequest(format!("{field} must be HH:MM, got {raw:?}")))
}

pub(crate) fn parse_status(raw: &str) -> Result<BookingStatus, AppError> {
    BookingStatus::from_wire(raw.trim())
        .ok_or_else(|| AppError::BadRequest(format!("unknown booking status: {raw}")))
}

pub(crate) fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(())
}
