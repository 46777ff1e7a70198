//! # EpochKV
//!
//! An in-memory record store keyed by `(key, timestamp)` with:
//! - Flat-file persistence (full rewrite on every mutation)
//! - Single-writer/multi-reader concurrency model
//! - HTTP API for CRUD access
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     HTTP Router (axum)                       │
//! │              GET / POST / PUT / DELETE /records              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                 │
//! │           RwLock<HashMap<RecordId, Record>>                  │
//! │   (readers in parallel, each writer fully exclusive)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌──────────────┐
//!               │    Codec     │
//!               │  (CSV rows)  │
//!               └──────┬───────┘
//!                      │
//!                      ▼
//!               ┌──────────────┐
//!               │ Backing file │
//!               │ records.csv  │
//!               └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod codec;
pub mod engine;
pub mod http;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{EpochError, Result};
pub use config::Config;
pub use engine::Engine;
pub use record::{Record, RecordId};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of EpochKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
