use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A grid position before bookings are taken into account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotCandidate {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start_time: String,
    pub end_time: String,
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    pub barber_id: String,
    pub service_id: String,
    pub date: NaiveDate,
    pub service_duration: u32,
    pub available_slots: Vec<TimeSlot>,
}

impl AvailabilityReport {
    pub fn free_slots(&self) -> impl Iterator<Item = &TimeSlot> {
        self.available_slots.iter().filter(|s| s.is_available)
    }
}
