//! Shared fixtures for the integration test-suite.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use ab_api::AppState;
use ab_core::{BoardService, Clock, ThreadStore};
use ab_db_memory::MemoryThreadStore;
use ab_db_sqlite::SqliteThreadStore;
use actix_web::web;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Clock that moves forward one second on every reading, so that every
/// operation in a test gets its own distinct instant.
pub struct StepClock {
    base: DateTime<Utc>,
    ticks: AtomicI64,
}

impl StepClock {
    pub fn new() -> Self {
        Self {
            base: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            ticks: AtomicI64::new(0),
        }
    }
}

impl Default for StepClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        self.base + Duration::seconds(self.ticks.fetch_add(1, Ordering::SeqCst))
    }
}

pub fn service_over(store: Arc<dyn ThreadStore>) -> BoardService {
    BoardService::with_clock(store, Arc::new(StepClock::new()))
}

pub fn memory_service() -> BoardService {
    service_over(Arc::new(MemoryThreadStore::new()))
}

pub async fn sqlite_service() -> BoardService {
    let store = SqliteThreadStore::new("sqlite::memory:").await.unwrap();
    service_over(Arc::new(store))
}

pub fn state(service: BoardService) -> web::Data<AppState> {
    web::Data::new(AppState { service })
}
