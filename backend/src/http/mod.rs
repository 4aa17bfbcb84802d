//! HTTP server module.
//!
//! Exposes the chart pipeline as a REST API for a rendering client. Handlers
//! work against a shared [`Session`](crate::services::Session); every chart
//! response is recomputed from the base dataset.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing and validation                         │
//! │  - JSON serialization/deserialization                     │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - Session: dataset, selection, view                      │
//! │  - Background reloads and job tracking                    │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Pipeline (pipeline/, parsing/, sources/)                 │
//! │  - CSV acquisition and parsing                            │
//! │  - Merge, trim, selection filter, extents                 │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
