use crate::db::Store;
use crate::services::Clock;
use crate::time_utils::AppTimezone;
use chrono::Utc;
use std::sync::Arc;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub session_key: Vec<u8>,
    pub timezone: AppTimezone,
    pub dev_login: bool,
}

impl AppState {
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn clock(&self) -> Clock {
        Clock::at(Utc::now(), self.timezone)
    }
}

pub type SharedState = Arc<AppState>;
