//! Application state for the HTTP server.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::PipelineSettings;
use crate::services::{BaseDataset, JobTracker, Session};
use crate::sources::CsvSource;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Loaded dataset with the current selection and view
    pub session: Arc<RwLock<Session>>,
    /// Where reloads fetch the tables from
    pub source: Arc<dyn CsvSource>,
    pub pipeline: PipelineSettings,
    pub job_tracker: JobTracker,
}

impl AppState {
    pub fn new(session: Session, source: Arc<dyn CsvSource>, pipeline: PipelineSettings) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            source,
            pipeline,
            job_tracker: JobTracker::new(),
        }
    }

    /// The dataset currently served.
    pub fn dataset(&self) -> Arc<BaseDataset> {
        Arc::clone(self.session.read().dataset())
    }
}
