use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::SchedulingStore;
use crate::services::BookingService;

pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn SchedulingStore>,
    pub bookings: BookingService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn SchedulingStore>) -> Self {
        Self {
            config,
            bookings: BookingService::new(store.clone()),
            store,
        }
    }
}
