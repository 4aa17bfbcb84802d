//! Service layer: orchestration between sources, the pipeline and the HTTP layer.
//!
//! - [`dataset`]: fetch and merge the source tables into the base dataset
//! - [`session`]: the loaded dataset plus the current selection and view
//! - [`job_tracker`]: progress of background dataset reloads
//! - [`reload`]: the background reload itself

pub mod dataset;
pub mod job_tracker;
pub mod reload;
pub mod session;

pub use dataset::{
    build_base_dataset, fetch_tables, load_base_dataset, BaseDataset, DatasetError, SourceTables,
};
pub use job_tracker::{Job, JobKind, JobStatus, JobTracker, LogEntry, LogLevel};
pub use reload::reload_dataset_async;
pub use session::Session;
