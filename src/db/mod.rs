pub mod migrations;
pub mod queries;

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::models::{Booking, BookingFilter, Service};

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .context("failed to set database pragmas")?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}

/// Persistence seen by the scheduling engine.
///
/// `find_bookings_by_barber_and_date` returns only pending and confirmed
/// bookings; callers still filter on status themselves.
#[async_trait]
pub trait SchedulingStore: Send + Sync {
    async fn find_bookings_by_barber_and_date(
        &self,
        barber_id: &str,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<Booking>>;
    async fn find_booking_by_id(&self, id: &str) -> anyhow::Result<Option<Booking>>;
    async fn find_bookings(&self, filter: &BookingFilter) -> anyhow::Result<Vec<Booking>>;
    async fn create_booking(&self, booking: &Booking) -> anyhow::Result<()>;
    async fn save_booking(&self, booking: &Booking) -> anyhow::Result<()>;
    async fn delete_booking(&self, id: &str) -> anyhow::Result<()>;

    async fn find_service_by_id(&self, id: &str) -> anyhow::Result<Option<Service>>;
    async fn find_services_by_barber(&self, barber_id: &str) -> anyhow::Result<Vec<Service>>;
    async fn create_service(&self, service: &Service) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub fn open(path: &str) -> anyhow::Result<Self> {
        Ok(Self::new(init_db(path)?))
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database connection lock poisoned"))
    }
}

#[async_trait]
impl SchedulingStore for SqliteStore {
    async fn find_bookings_by_barber_and_date(
        &self,
        barber_id: &str,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<Booking>> {
        let db = self.lock()?;
        queries::get_active_bookings_for_barber_on(&db, barber_id, date)
    }

    async fn find_booking_by_id(&self, id: &str) -> anyhow::Result<Option<Booking>> {
        let db = self.lock()?;
        queries::get_booking_by_id(&db, id)
    }

    async fn find_bookings(&self, filter: &BookingFilter) -> anyhow::Result<Vec<Booking>> {
        let db = self.lock()?;
        queries::find_bookings(&db, filter)
    }

    async fn create_booking(&self, booking: &Booking) -> anyhow::Result<()> {
        let db = self.lock()?;
        queries::create_booking(&db, booking)
    }

    async fn save_booking(&self, booking: &Booking) -> anyhow::Result<()> {
        let db = self.lock()?;
        if !queries::save_booking(&db, booking)? {
            anyhow::bail!("booking {} vanished before it could be saved", booking.id);
        }
        Ok(())
    }

    async fn delete_booking(&self, id: &str) -> anyhow::Result<()> {
        let db = self.lock()?;
        queries::delete_booking(&db, id)?;
        Ok(())
    }

    async fn find_service_by_id(&self, id: &str) -> anyhow::Result<Option<Service>> {
        let db = self.lock()?;
        queries::get_service_by_id(&db, id)
    }

    async fn find_services_by_barber(&self, barber_id: &str) -> anyhow::Result<Vec<Service>> {
        let db = self.lock()?;
        queries::get_services_for_barber(&db, barber_id)
    }

    async fn create_service(&self, service: &Service) -> anyhow::Result<()> {
        let db = self.lock()?;
        queries::create_service(&db, service)
    }
}
