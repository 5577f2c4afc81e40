use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::require;
use crate::errors::AppError;
use crate::models::{Service, MAX_SERVICE_DURATION_MINUTES, MIN_SERVICE_DURATION_MINUTES};
use crate::services::SchedulingError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ServiceEnvelope {
    service: Service,
}

// POST /services
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub barber_id: String,
    pub name: String,
    pub description: Option<String>,
    pub duration: u32,
    pub price: f64,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn create_service(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    require("barberId", &body.barber_id)?;
    require("name", &body.name)?;
    if !(MIN_SERVICE_DURATION_MINUTES..=MAX_SERVICE_DURATION_MINUTES).contains(&body.duration) {
        return Err(AppError::BadRequest(format!(
            "duration must be between {MIN_SERVICE_DURATION_MINUTES} and {MAX_SERVICE_DURATION_MINUTES} minutes"
        )));
    }
    if !body.price.is_finite() || body.price < 0.0 {
        return Err(AppError::BadRequest("price must be a non-negative number".to_string()));
    }

    let now = Utc::now().naive_utc();
    let service = Service {
        id: Uuid::new_v4().to_string(),
        barber_id: body.barber_id,
        name: body.name,
        description: body.description,
        duration: body.duration,
        price: body.price,
        category: body.category.unwrap_or_default(),
        is_active: body.is_active.unwrap_or(true),
        created_at: now,
        updated_at: now,
    };

    state.store.create_service(&service).await?;
    tracing::info!(service_id = %service.id, barber_id = %service.barber_id, duration = service.duration, "service created");

    Ok((StatusCode::CREATED, Json(ServiceEnvelope { service })))
}

// GET /services/:id
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ServiceEnvelope>, AppError> {
    let service = state
        .store
        .find_service_by_id(&id)
        .await?
        .ok_or(SchedulingError::ServiceNotFound)?;
    Ok(Json(ServiceEnvelope { service }))
}

// GET /barbers/:barber_id/services
#[derive(Serialize)]
pub struct ServiceList {
    services: Vec<Service>,
}

pub async fn list_barber_services(
    State(state): State<Arc<AppState>>,
    Path(barber_id): Path<String>,
) -> Result<Json<ServiceList>, AppError> {
    let services = state.store.find_services_by_barber(&barber_id).await?;
    Ok(Json(ServiceList { services }))
}
