use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingFilter, BookingStatus, Service, BOOKINGS_PAGE_SIZE};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const BOOKING_COLUMNS: &str = "id, client_id, barber_id, service_id, date, start_time, end_time, status, notes, created_at, updated_at";
const SERVICE_COLUMNS: &str = "id, barber_id, name, description, duration_minutes, price, category, is_active, created_at, updated_at";

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, client_id, barber_id, service_id, date, start_time, end_time, status, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            booking.id,
            booking.client_id,
            booking.barber_id,
            booking.service_id,
            booking.date.format(DATE_FORMAT).to_string(),
            booking.start_time,
            booking.end_time,
            booking.status.as_str(),
            booking.notes,
            booking.created_at.format(TIMESTAMP_FORMAT).to_string(),
            booking.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

/// Writes the mutable fields of an existing booking. Returns false if no row matched.
pub fn save_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET date = ?1, start_time = ?2, end_time = ?3, status = ?4, notes = ?5, updated_at = ?6
         WHERE id = ?7",
        params![
            booking.date.format(DATE_FORMAT).to_string(),
            booking.start_time,
            booking.end_time,
            booking.status.as_str(),
            booking.notes,
            booking.updated_at.format(TIMESTAMP_FORMAT).to_string(),
            booking.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Pending and confirmed bookings for one barber on one calendar day.
pub fn get_active_bookings_for_barber_on(
    conn: &Connection,
    barber_id: &str,
    date: NaiveDate,
) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE barber_id = ?1 AND date = ?2 AND status IN ('PENDING', 'CONFIRMED')
         ORDER BY start_time ASC"
    ))?;

    let rows = stmt.query_map(
        params![barber_id, date.format(DATE_FORMAT).to_string()],
        |row| Ok(parse_booking_row(row)),
    )?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn find_bookings(conn: &Connection, filter: &BookingFilter) -> anyhow::Result<Vec<Booking>> {
    let mut clauses: Vec<&str> = vec![];
    let mut values: Vec<Box<dyn ToSql>> = vec![];

    if let Some(client_id) = &filter.client_id {
        clauses.push("client_id = ?");
        values.push(Box::new(client_id.clone()));
    }
    if let Some(barber_id) = &filter.barber_id {
        clauses.push("barber_id = ?");
        values.push(Box::new(barber_id.clone()));
    }
    if let Some(status) = filter.status {
        clauses.push("status = ?");
        values.push(Box::new(status.as_str()));
    }
    if let Some(start) = filter.start_date {
        clauses.push("date >= ?");
        values.push(Box::new(start.format(DATE_FORMAT).to_string()));
    }
    if let Some(end) = filter.end_date {
        clauses.push("date <= ?");
        values.push(Box::new(end.format(DATE_FORMAT).to_string()));
    }

    let mut sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings");
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY date ASC, start_time ASC");

    if let Some(page) = filter.page {
        let offset = (i64::from(page.max(1)) - 1) * BOOKINGS_PAGE_SIZE;
        sql.push_str(" LIMIT ? OFFSET ?");
        values.push(Box::new(BOOKINGS_PAGE_SIZE));
        values.push(Box::new(offset));
    }

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn ToSql> = values.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let date_str: String = row.get(4)?;
    let status_str: String = row.get(7)?;
    let created_at_str: String = row.get(9)?;
    let updated_at_str: String = row.get(10)?;

    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
        .with_context(|| format!("booking {id} has invalid date: {date_str}"))?;

    Ok(Booking {
        client_id: row.get(1)?,
        barber_id: row.get(2)?,
        service_id: row.get(3)?,
        date,
        start_time: row.get(5)?,
        end_time: row.get(6)?,
        status: BookingStatus::parse(&status_str),
        notes: row.get(8)?,
        created_at: parse_timestamp("booking", &id, "created_at", &created_at_str)?,
        updated_at: parse_timestamp("booking", &id, "updated_at", &updated_at_str)?,
        id,
    })
}

// ── Services ──

pub fn create_service(conn: &Connection, service: &Service) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO services (id, barber_id, name, description, duration_minutes, price, category, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            service.id,
            service.barber_id,
            service.name,
            service.description,
            service.duration,
            service.price,
            service.category,
            service.is_active as i32,
            service.created_at.format(TIMESTAMP_FORMAT).to_string(),
            service.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_service_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Service>> {
    let result = conn.query_row(
        &format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = ?1"),
        params![id],
        |row| Ok(parse_service_row(row)),
    );

    match result {
        Ok(service) => Ok(Some(service?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_services_for_barber(conn: &Connection, barber_id: &str) -> anyhow::Result<Vec<Service>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SERVICE_COLUMNS} FROM services WHERE barber_id = ?1 ORDER BY name ASC"
    ))?;
    let rows = stmt.query_map(params![barber_id], |row| Ok(parse_service_row(row)))?;

    let mut services = vec![];
    for row in rows {
        services.push(row??);
    }
    Ok(services)
}

fn parse_service_row(row: &rusqlite::Row) -> anyhow::Result<Service> {
    let id: String = row.get(0)?;
    let created_at_str: String = row.get(8)?;
    let updated_at_str: String = row.get(9)?;

    Ok(Service {
        created_at: parse_timestamp("service", &id, "created_at", &created_at_str)?,
        updated_at: parse_timestamp("service", &id, "updated_at", &updated_at_str)?,
        id,
        barber_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        duration: row.get(4)?,
        price: row.get(5)?,
        category: row.get(6)?,
        is_active: row.get::<_, i32>(7)? != 0,
    })
}

fn parse_timestamp(table: &str, id: &str, column: &str, raw: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .with_context(|| format!("{table} {id} has invalid {column}: {raw}"))
}
