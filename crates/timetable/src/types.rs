use std::sync::Arc;

use crate::auth::SessionStore;
use crate::config::AppConfig;
use crate::db::Storage;
use crate::solver::{SolverClient, SolverError};

/// State shared by every request handler.
pub struct AppState {
    /// The storage handle, opened by the caller before the server starts.
    pub storage: Arc<dyn Storage>,
    pub sessions: SessionStore,
    pub solver: SolverClient,
    /// Slot length used by derived room and faculty views.
    pub slot_minutes: u32,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, config: &AppConfig) -> Result<Self, SolverError> {
        Ok(Self {
            storage,
            sessions: SessionStore::new(config.auth.session_ttl()),
            solver: SolverClient::new(&config.solver)?,
            slot_minutes: config.scheduler.slot_duration_minutes,
        })
    }
}
