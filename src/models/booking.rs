use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub client_id: String,
    pub barber_id: String,
    pub service_id: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Completed => "COMPLETED",
        }
    }

    /// Unknown values fall back to `Pending`, the state every booking starts in.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "CONFIRMED" => BookingStatus::Confirmed,
            "CANCELLED" => BookingStatus::Cancelled,
            "COMPLETED" => BookingStatus::Completed,
            _ => BookingStatus::Pending,
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Some(BookingStatus::Pending),
            "CONFIRMED" => Some(BookingStatus::Confirmed),
            "CANCELLED" => Some(BookingStatus::Cancelled),
            "COMPLETED" => Some(BookingStatus::Completed),
            _ => None,
        }
    }

    /// Pending and confirmed bookings occupy the barber's time.
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

impl Booking {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    // Any status may replace any other; a cancelled booking can still be confirmed.
    pub fn confirm(&mut self, now: NaiveDateTime) {
        self.set_status(BookingStatus::Confirmed, now);
    }

    pub fn cancel(&mut self, now: NaiveDateTime) {
        self.set_status(BookingStatus::Cancelled, now);
    }

    pub fn complete(&mut self, now: NaiveDateTime) {
        self.set_status(BookingStatus::Completed, now);
    }

    pub fn set_status(&mut self, status: BookingStatus, now: NaiveDateTime) {
        self.status = status;
        self.updated_at = now;
    }
}

/// Input for a new booking; status defaults to pending.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub client_id: String,
    pub barber_id: String,
    pub service_id: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: Option<BookingStatus>,
    pub notes: Option<String>,
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct BookingPatch {
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub status: Option<BookingStatus>,
    pub notes: Option<String>,
}

impl BookingPatch {
    pub fn touches_schedule(&self) -> bool {
        self.date.is_some() || self.start_time.is_some() || self.end_time.is_some()
    }
}

pub const BOOKINGS_PAGE_SIZE: i64 = 20;

/// Listing criteria. Filters combine with AND; `page` is 1-based.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub client_id: Option<String>,
    pub barber_id: Option<String>,
    pub status: Option<BookingStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<u32>,
}
