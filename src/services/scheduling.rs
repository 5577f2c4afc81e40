use chrono::NaiveDate;

use crate::db::SchedulingStore;
use crate::models::{AvailabilityReport, TimeSlot};
use crate::services::slots::generate_slots;
use crate::services::time::{overlaps, time_to_minutes};

#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("booking not found")]
    BookingNotFound,

    #[error("service not found")]
    ServiceNotFound,

    #[error("barber is not available at the requested time")]
    BarberNotAvailable,

    #[error("invalid time slot")]
    InvalidTimeSlot,

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// True when no active booking of `barber_id` on `date` overlaps `[start_time, end_time)`.
///
/// `exclude_booking_id` leaves one booking out of the scan so a booking can be
/// moved onto (part of) its own current interval.
pub async fn is_barber_available(
    store: &dyn SchedulingStore,
    barber_id: &str,
    date: NaiveDate,
    start_time: &str,
    end_time: &str,
    exclude_booking_id: Option<&str>,
) -> Result<bool, SchedulingError> {
    let start = time_to_minutes(start_time).ok_or(SchedulingError::InvalidTimeSlot)?;
    let end = time_to_minutes(end_time).ok_or(SchedulingError::InvalidTimeSlot)?;

    let bookings = store.find_bookings_by_barber_and_date(barber_id, date).await?;

    let conflict = bookings
        .iter()
        .filter(|b| b.is_active())
        .filter(|b| exclude_booking_id != Some(b.id.as_str()))
        .find(|b| match (time_to_minutes(&b.start_time), time_to_minutes(&b.end_time)) {
            (Some(b_start), Some(b_end)) => overlaps(start, end, b_start, b_end),
            _ => {
                tracing::warn!(booking_id = %b.id, "stored booking has malformed times, ignoring");
                false
            }
        });

    if let Some(existing) = conflict {
        tracing::debug!(
            barber_id,
            %date,
            start_time,
            end_time,
            conflicting_booking = %existing.id,
            "requested interval is taken"
        );
    }

    Ok(conflict.is_none())
}

/// Full grid for the service's duration, each slot flagged free or taken.
pub async fn get_available_slots(
    store: &dyn SchedulingStore,
    barber_id: &str,
    service_id: &str,
    date: NaiveDate,
) -> Result<AvailabilityReport, SchedulingError> {
    let service = store
        .find_service_by_id(service_id)
        .await?
        .ok_or(SchedulingError::ServiceNotFound)?;

    let busy: Vec<(u32, u32)> = store
        .find_bookings_by_barber_and_date(barber_id, date)
        .await?
        .iter()
        .filter(|b| b.is_active())
        .filter_map(|b| Some((time_to_minutes(&b.start_time)?, time_to_minutes(&b.end_time)?)))
        .collect();

    let available_slots = generate_slots(service.duration)
        .into_iter()
        .map(|candidate| {
            // Generated times are always canonical.
            let start = time_to_minutes(&candidate.start_time).unwrap_or_default();
            let end = time_to_minutes(&candidate.end_time).unwrap_or_default();
            let is_available = !busy
                .iter()
                .any(|&(b_start, b_end)| overlaps(start, end, b_start, b_end));
            TimeSlot {
                start_time: candidate.start_time,
                end_time: candidate.end_time,
                is_available,
            }
        })
        .collect();

    Ok(AvailabilityReport {
        barber_id: barber_id.to_string(),
        service_id: service_id.to_string(),
        date,
        service_duration: service.duration,
        available_slots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, queries, SqliteStore};
    use crate::models::{Booking, BookingStatus, Service};
    use chrono::Utc;
    use rusqlite::Connection;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_booking(id: &str, date: &str, start: &str, end: &str, status: BookingStatus) -> Booking {
        let now = Utc::now().naive_utc();
        Booking {
            id: id.to_string(),
            client_id: "client-1".to_string(),
            barber_id: "barber-1".to_string(),
            service_id: "service-1".to_string(),
            date: day(date),
            start_time: start.to_string(),
            end_time: end.to_string(),
            status,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn make_service(id: &str, duration: u32) -> Service {
        let now = Utc::now().naive_utc();
        Service {
            id: id.to_string(),
            barber_id: "barber-1".to_string(),
            name: "Haircut".to_string(),
            description: None,
            duration,
            price: 30.0,
            category: "haircut".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn store_with(bookings: &[Booking], services: &[Service]) -> SqliteStore {
        let conn = setup_db();
        for b in bookings {
            queries::create_booking(&conn, b).unwrap();
        }
        for s in services {
            queries::create_service(&conn, s).unwrap();
        }
        SqliteStore::new(conn)
    }

    #[tokio::test]
    async fn test_free_when_no_bookings() {
        let store = store_with(&[], &[]);
        let free = is_barber_available(&store, "barber-1", day("2024-12-15"), "10:00", "10:30", None)
            .await
            .unwrap();
        assert!(free);
    }

    #[tokio::test]
    async fn test_overlapping_request_is_rejected() {
        let store = store_with(
            &[make_booking("existing", "2024-12-15", "10:00", "10:30", BookingStatus::Confirmed)],
            &[],
        );
        let free = is_barber_available(&store, "barber-1", day("2024-12-15"), "10:15", "10:45", None)
            .await
            .unwrap();
        assert!(!free);
    }

    #[tokio::test]
    async fn test_adjacent_request_is_accepted() {
        let store = store_with(
            &[make_booking("existing", "2024-12-15", "10:00", "10:30", BookingStatus::Confirmed)],
            &[],
        );
        let free = is_barber_available(&store, "barber-1", day("2024-12-15"), "10:30", "11:00", None)
            .await
            .unwrap();
        assert!(free);
    }

    #[tokio::test]
    async fn test_other_day_and_other_barber_do_not_conflict() {
        let mut other_barber = make_booking("b2", "2024-12-15", "10:00", "10:30", BookingStatus::Pending);
        other_barber.barber_id = "barber-2".to_string();
        let store = store_with(
            &[
                make_booking("b1", "2024-12-16", "10:00", "10:30", BookingStatus::Pending),
                other_barber,
            ],
            &[],
        );
        let free = is_barber_available(&store, "barber-1", day("2024-12-15"), "10:00", "10:30", None)
            .await
            .unwrap();
        assert!(free);
    }

    #[tokio::test]
    async fn test_cancelled_and_completed_do_not_block() {
        let store = store_with(
            &[
                make_booking("b1", "2024-12-15", "10:00", "10:30", BookingStatus::Cancelled),
                make_booking("b2", "2024-12-15", "10:00", "10:30", BookingStatus::Completed),
            ],
            &[],
        );
        let free = is_barber_available(&store, "barber-1", day("2024-12-15"), "10:00", "10:30", None)
            .await
            .unwrap();
        assert!(free);
    }

    #[tokio::test]
    async fn test_excluded_booking_is_ignored() {
        let store = store_with(
            &[make_booking("self", "2024-12-15", "10:00", "10:30", BookingStatus::Pending)],
            &[],
        );
        let free = is_barber_available(
            &store,
            "barber-1",
            day("2024-12-15"),
            "10:00",
            "10:30",
            Some("self"),
        )
        .await
        .unwrap();
        assert!(free);
    }

    #[tokio::test]
    async fn test_malformed_request_time() {
        let store = store_with(&[], &[]);
        let result =
            is_barber_available(&store, "barber-1", day("2024-12-15"), "25:00", "10:30", None).await;
        assert!(matches!(result, Err(SchedulingError::InvalidTimeSlot)));
    }

    #[tokio::test]
    async fn test_slots_for_unknown_service() {
        let store = store_with(&[], &[]);
        let result = get_available_slots(&store, "barber-1", "missing", day("2024-12-15")).await;
        assert!(matches!(result, Err(SchedulingError::ServiceNotFound)));
    }

    #[tokio::test]
    async fn test_slots_mark_booked_interval() {
        let store = store_with(
            &[make_booking("b1", "2024-12-15", "09:00", "09:30", BookingStatus::Pending)],
            &[make_service("service-1", 30)],
        );
        let report = get_available_slots(&store, "barber-1", "service-1", day("2024-12-15"))
            .await
            .unwrap();

        assert_eq!(report.service_duration, 30);
        assert_eq!(report.available_slots.len(), 19);

        for slot in &report.available_slots {
            let expected = slot.start_time != "09:00";
            assert_eq!(slot.is_available, expected, "{slot:?}");
        }
        assert_eq!(report.free_slots().count(), 18);
    }

    #[tokio::test]
    async fn test_long_service_blocks_neighbouring_starts() {
        let store = store_with(
            &[make_booking("b1", "2024-12-15", "10:00", "10:30", BookingStatus::Confirmed)],
            &[make_service("long", 60)],
        );
        let report = get_available_slots(&store, "barber-1", "long", day("2024-12-15"))
            .await
            .unwrap();

        let taken: Vec<&str> = report
            .available_slots
            .iter()
            .filter(|s| !s.is_available)
            .map(|s| s.start_time.as_str())
            .collect();
        assert_eq!(taken, vec!["09:30", "10:00"]);
    }
}
