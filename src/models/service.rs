use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const MIN_SERVICE_DURATION_MINUTES: u32 = 15;
/// 08:00 to 18:00.
pub const MAX_SERVICE_DURATION_MINUTES: u32 = 600;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub barber_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Minutes.
    pub duration: u32,
    pub price: f64,
    pub category: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
