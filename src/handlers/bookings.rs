use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{parse_date, parse_status, parse_time, require};
use crate::errors::AppError;
use crate::models::{AvailabilityReport, Booking, BookingFilter, BookingPatch, BookingStatus, NewBooking};
use crate::state::AppState;

#[derive(Serialize)]
pub struct BookingEnvelope {
    booking: Booking,
}

#[derive(Serialize)]
pub struct StatusEnvelope {
    booking: BookingStatusView,
}

#[derive(Serialize)]
pub struct BookingStatusView {
    id: String,
    status: BookingStatus,
}

impl From<Booking> for StatusEnvelope {
    fn from(b: Booking) -> Self {
        Self {
            booking: BookingStatusView {
                id: b.id,
                status: b.status,
            },
        }
    }
}

// POST /bookings
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub client_id: String,
    pub barber_id: String,
    pub service_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl CreateBookingRequest {
    fn into_new_booking(self) -> Result<NewBooking, AppError> {
        require("clientId", &self.client_id)?;
        require("barberId", &self.barber_id)?;
        require("serviceId", &self.service_id)?;

        Ok(NewBooking {
            date: parse_date(&self.date)?,
            start_time: parse_time("startTime", &self.start_time)?,
            end_time: parse_time("endTime", &self.end_time)?,
            status: self.status.as_deref().map(parse_status).transpose()?,
            client_id: self.client_id,
            barber_id: self.barber_id,
            service_id: self.service_id,
            notes: self.notes,
        })
    }
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let data = body.into_new_booking()?;
    let booking = state.bookings.create_booking(data).await?;
    Ok((StatusCode::CREATED, Json(BookingEnvelope { booking })))
}

// GET /bookings
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsQuery {
    pub client_id: Option<String>,
    pub barber_id: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<u32>,
}

#[derive(Serialize)]
pub struct BookingList {
    bookings: Vec<Booking>,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<BookingList>, AppError> {
    let start_date = query.start_date.as_deref().map(parse_date).transpose()?;
    let end_date = query.end_date.as_deref().map(parse_date).transpose()?;

    // A full date range returns every match; anything else is paged.
    let page = match (start_date, end_date) {
        (Some(_), Some(_)) => query.page,
        _ => Some(query.page.unwrap_or(1)),
    };

    let filter = BookingFilter {
        client_id: query.client_id,
        barber_id: query.barber_id,
        status: query.status.as_deref().map(parse_status).transpose()?,
        start_date,
        end_date,
        page,
    };

    let bookings = state.bookings.find_bookings(&filter).await?;
    Ok(Json(BookingList { bookings }))
}

// GET /bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BookingEnvelope>, AppError> {
    let booking = state.bookings.find_booking_by_id(&id).await?;
    Ok(Json(BookingEnvelope { booking }))
}

// PUT /bookings/:id
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl UpdateBookingRequest {
    fn into_patch(self) -> Result<BookingPatch, AppError> {
        Ok(BookingPatch {
            date: self.date.as_deref().map(parse_date).transpose()?,
            start_time: self
                .start_time
                .as_deref()
                .map(|t| parse_time("startTime", t))
                .transpose()?,
            end_time: self
                .end_time
                .as_deref()
                .map(|t| parse_time("endTime", t))
                .transpose()?,
            status: self.status.as_deref().map(parse_status).transpose()?,
            notes: self.notes,
        })
    }
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateBookingRequest>,
) -> Result<Json<BookingEnvelope>, AppError> {
    let patch = body.into_patch()?;
    let booking = state.bookings.update_booking(&id, patch).await?;
    Ok(Json(BookingEnvelope { booking }))
}

// DELETE /bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.bookings.delete_booking(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /bookings/:id/confirm
pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StatusEnvelope>, AppError> {
    let booking = state.bookings.confirm_booking(&id).await?;
    Ok(Json(booking.into()))
}

// POST /bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StatusEnvelope>, AppError> {
    let booking = state.bookings.cancel_booking(&id).await?;
    Ok(Json(booking.into()))
}

// POST /bookings/:id/complete
pub async fn complete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StatusEnvelope>, AppError> {
    let booking = state.bookings.complete_booking(&id).await?;
    Ok(Json(booking.into()))
}

// POST /bookings/check-availability
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAvailabilityRequest {
    pub barber_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub exclude_booking_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAvailabilityResponse {
    available: bool,
    barber_id: String,
    date: chrono::NaiveDate,
    start_time: String,
    end_time: String,
}

pub async fn check_availability(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CheckAvailabilityRequest>,
) -> Result<Json<CheckAvailabilityResponse>, AppError> {
    require("barberId", &body.barber_id)?;
    let date = parse_date(&body.date)?;
    let start_time = parse_time("startTime", &body.start_time)?;
    let end_time = parse_time("endTime", &body.end_time)?;

    let available = state
        .bookings
        .check_barber_availability(
            &body.barber_id,
            date,
            &start_time,
            &end_time,
            body.exclude_booking_id.as_deref(),
        )
        .await?;

    Ok(Json(CheckAvailabilityResponse {
        available,
        barber_id: body.barber_id,
        date,
        start_time,
        end_time,
    }))
}

// POST /bookings/available-slots
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlotsRequest {
    pub barber_id: String,
    pub service_id: String,
    pub date: String,
}

pub async fn available_slots(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AvailableSlotsRequest>,
) -> Result<Json<AvailabilityReport>, AppError> {
    require("barberId", &body.barber_id)?;
    require("serviceId", &body.service_id)?;
    let date = parse_date(&body.date)?;

    let report = state
        .bookings
        .get_available_slots(&body.barber_id, &body.service_id, date)
        .await?;

    tracing::debug!(
        barber_id = %report.barber_id,
        %date,
        free = report.free_slots().count(),
        total = report.available_slots.len(),
        "computed available slots"
    );

    Ok(Json(report))
}
