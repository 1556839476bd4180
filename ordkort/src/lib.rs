//! Ordkort - daily word content service
//!
//! Teachers submit one word (and optional theme) per classroom per day.
//! The service turns it into learner material:
//!
//! - translations into every first language present in the classroom
//! - one illustration, generated or a deterministic SVG card
//! - three leveled reading texts, generated or from templates
//! - a battery of auto-gradable tasks per level
//!
//! It also assembles weekly tests from approved words, records approvals
//! and scores task answers.
//!
//! # Architecture
//!
//! ```text
//!   HTTP (axum)  /functions/v1/*
//!        │
//!        ▼
//! ┌───────────────────┐      ┌──────────────────────────────┐
//! │ DailyContent      │─────▶│ providers (ordkort-agent)    │
//! │ Pipeline          │      │ translate / image / text     │
//! └─────────┬─────────┘      └──────────────────────────────┘
//!           ▼
//! ┌───────────────────┐
//! │ RecordStore +     │  memory (dev) or hosted REST backend
//! │ ObjectStore       │
//! └───────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod routes;
pub mod store;
pub mod weekly;

pub use config::Args;
pub use error::GatewayError;
pub use pipeline::{
    DailyContentPipeline, GenerationOutcome, GenerationRequest, PipelineConfig, Providers, Stage,
};
pub use routes::{create_router, AppState};
pub use store::{
    MemoryStore, ObjectStore, RecordStore, RestBackend, RestConfig, StoreError, StoreProvider,
    Stores,
};
