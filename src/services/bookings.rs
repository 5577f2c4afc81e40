use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Local, NaiveDate, NaiveDateTime};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::db::SchedulingStore;
use crate::models::{AvailabilityReport, Booking, BookingFilter, BookingPatch, BookingStatus, NewBooking};
use crate::services::scheduling::{self, SchedulingError};
use crate::services::slots::{BUSINESS_CLOSE_MINUTES, BUSINESS_OPEN_MINUTES};
use crate::services::time::time_to_minutes;

pub type Clock = fn() -> NaiveDateTime;

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Business-rule check for a requested interval.
///
/// Rejects bookings starting before `now`, starting before opening, ending
/// after closing, or not ending after they start.
pub fn validate_time_slot(date: NaiveDate, start_time: &str, end_time: &str, now: NaiveDateTime) -> bool {
    let (Some(start), Some(end)) = (time_to_minutes(start_time), time_to_minutes(end_time)) else {
        return false;
    };

    let Some(starts_at) = date.and_hms_opt(start / 60, start % 60, 0) else {
        return false;
    };
    if starts_at < now {
        return false;
    }

    if start < BUSINESS_OPEN_MINUTES || end > BUSINESS_CLOSE_MINUTES {
        return false;
    }

    end > start
}

/// One async mutex per barber, created on first use and dropped once nobody
/// holds or waits on it.
#[derive(Default)]
struct BarberLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl BarberLocks {
    async fn acquire(&self, barber_id: &str) -> BarberGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(barber_id.to_string()).or_default().clone()
        };

        BarberGuard {
            locks: self,
            barber_id: barber_id.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Handles are only cloned under the map lock, so a count of one means
    /// the map holds the last reference.
    fn evict_if_idle(&self, barber_id: &str) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(barber_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(barber_id);
        }
    }
}

struct BarberGuard<'a> {
    locks: &'a BarberLocks,
    barber_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for BarberGuard<'_> {
    fn drop(&mut self) {
        // Unlock first so this guard's own handle no longer counts.
        drop(self.guard.take());
        self.locks.evict_if_idle(&self.barber_id);
    }
}

/// Validates and applies booking state changes.
///
/// Every write holds the barber's lock from its final read to the store
/// write, so two requests for the same barber cannot both pass the
/// availability check, and a status change cannot write back an interval
/// that a reschedule has since replaced.
pub struct BookingService {
    store: Arc<dyn SchedulingStore>,
    clock: Clock,
    barber_locks: BarberLocks,
}

impl BookingService {
    pub fn new(store: Arc<dyn SchedulingStore>) -> Self {
        Self::with_clock(store, local_now)
    }

    pub fn with_clock(store: Arc<dyn SchedulingStore>, clock: Clock) -> Self {
        Self {
            store,
            clock,
            barber_locks: BarberLocks::default(),
        }
    }

    pub async fn create_booking(&self, data: NewBooking) -> Result<Booking, SchedulingError> {
        let _guard = self.barber_locks.acquire(&data.barber_id).await;

        self.ensure_slot_bookable(&data.barber_id, data.date, &data.start_time, &data.end_time, None)
            .await?;

        let now = (self.clock)();
        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            client_id: data.client_id,
            barber_id: data.barber_id,
            service_id: data.service_id,
            date: data.date,
            start_time: data.start_time,
            end_time: data.end_time,
            status: data.status.unwrap_or(BookingStatus::Pending),
            notes: data.notes,
            created_at: now,
            updated_at: now,
        };

        self.store.create_booking(&booking).await?;

        tracing::info!(
            booking_id = %booking.id,
            barber_id = %booking.barber_id,
            date = %booking.date,
            start_time = %booking.start_time,
            end_time = %booking.end_time,
            "booking created"
        );

        Ok(booking)
    }

    pub async fn find_booking_by_id(&self, id: &str) -> Result<Booking, SchedulingError> {
        self.store
            .find_booking_by_id(id)
            .await?
            .ok_or(SchedulingError::BookingNotFound)
    }

    pub async fn find_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, SchedulingError> {
        Ok(self.store.find_bookings(filter).await?)
    }

    pub async fn find_bookings_by_client(&self, client_id: &str, page: u32) -> Result<Vec<Booking>, SchedulingError> {
        self.find_bookings(&BookingFilter {
            client_id: Some(client_id.to_string()),
            page: Some(page),
            ..Default::default()
        })
        .await
    }

    pub async fn find_bookings_by_barber(&self, barber_id: &str, page: u32) -> Result<Vec<Booking>, SchedulingError> {
        self.find_bookings(&BookingFilter {
            barber_id: Some(barber_id.to_string()),
            page: Some(page),
            ..Default::default()
        })
        .await
    }

    pub async fn find_bookings_by_date_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Booking>, SchedulingError> {
        self.find_bookings(&BookingFilter {
            start_date: Some(start_date),
            end_date: Some(end_date),
            ..Default::default()
        })
        .await
    }

    pub async fn find_bookings_by_barber_and_date(
        &self,
        barber_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, SchedulingError> {
        Ok(self.store.find_bookings_by_barber_and_date(barber_id, date).await?)
    }

    pub async fn update_booking(&self, id: &str, patch: BookingPatch) -> Result<Booking, SchedulingError> {
        let (_guard, mut booking) = self.lock_booking(id).await?;

        if patch.touches_schedule() {
            let date = patch.date.unwrap_or(booking.date);
            let start_time = patch.start_time.as_deref().unwrap_or(booking.start_time.as_str());
            let end_time = patch.end_time.as_deref().unwrap_or(booking.end_time.as_str());

            self.ensure_slot_bookable(&booking.barber_id, date, start_time, end_time, Some(id))
                .await?;
        }

        if let Some(date) = patch.date {
            booking.date = date;
        }
        if let Some(start_time) = patch.start_time {
            booking.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            booking.end_time = end_time;
        }
        if let Some(status) = patch.status {
            booking.status = status;
        }
        if let Some(notes) = patch.notes {
            booking.notes = Some(notes);
        }
        booking.updated_at = (self.clock)();

        self.store.save_booking(&booking).await?;

        tracing::info!(booking_id = %booking.id, status = booking.status.as_str(), "booking updated");

        Ok(booking)
    }

    pub async fn confirm_booking(&self, id: &str) -> Result<Booking, SchedulingError> {
        self.transition(id, Booking::confirm).await
    }

    pub async fn cancel_booking(&self, id: &str) -> Result<Booking, SchedulingError> {
        self.transition(id, Booking::cancel).await
    }

    pub async fn complete_booking(&self, id: &str) -> Result<Booking, SchedulingError> {
        self.transition(id, Booking::complete).await
    }

    /// Reviews or other records pointing at the booking are left untouched.
    pub async fn delete_booking(&self, id: &str) -> Result<(), SchedulingError> {
        let (_guard, _) = self.lock_booking(id).await?;
        self.store.delete_booking(id).await?;
        tracing::info!(booking_id = %id, "booking deleted");
        Ok(())
    }

    /// Advisory point check; nothing is reserved.
    pub async fn check_barber_availability(
        &self,
        barber_id: &str,
        date: NaiveDate,
        start_time: &str,
        end_time: &str,
        exclude_booking_id: Option<&str>,
    ) -> Result<bool, SchedulingError> {
        scheduling::is_barber_available(
            self.store.as_ref(),
            barber_id,
            date,
            start_time,
            end_time,
            exclude_booking_id,
        )
        .await
    }

    pub async fn get_available_slots(
        &self,
        barber_id: &str,
        service_id: &str,
        date: NaiveDate,
    ) -> Result<AvailabilityReport, SchedulingError> {
        scheduling::get_available_slots(self.store.as_ref(), barber_id, service_id, date).await
    }

    async fn transition(
        &self,
        id: &str,
        apply: fn(&mut Booking, NaiveDateTime),
    ) -> Result<Booking, SchedulingError> {
        let (_guard, mut booking) = self.lock_booking(id).await?;
        let previous = booking.status;
        apply(&mut booking, (self.clock)());

        self.store.save_booking(&booking).await?;

        tracing::info!(
            booking_id = %booking.id,
            from = previous.as_str(),
            to = booking.status.as_str(),
            "booking status changed"
        );

        Ok(booking)
    }

    /// Takes the owning barber's lock and returns the booking as read inside it.
    /// Barber ids never change, so the first read only locates the lock.
    async fn lock_booking(&self, id: &str) -> Result<(BarberGuard<'_>, Booking), SchedulingError> {
        let barber_id = self.find_booking_by_id(id).await?.barber_id;
        let guard = self.barber_locks.acquire(&barber_id).await;
        let booking = self.find_booking_by_id(id).await?;
        Ok((guard, booking))
    }

    /// Availability first, then business rules. Caller must hold the barber lock.
    async fn ensure_slot_bookable(
        &self,
        barber_id: &str,
        date: NaiveDate,
        start_time: &str,
        end_time: &str,
        exclude_booking_id: Option<&str>,
    ) -> Result<(), SchedulingError> {
        let available = scheduling::is_barber_available(
            self.store.as_ref(),
            barber_id,
            date,
            start_time,
            end_time,
            exclude_booking_id,
        )
        .await?;
        if !available {
            return Err(SchedulingError::BarberNotAvailable);
        }

        if !validate_time_slot(date, start_time, end_time, (self.clock)()) {
            return Err(SchedulingError::InvalidTimeSlot);
        }

        Ok(())
    }
}
