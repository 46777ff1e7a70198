//! HTTP Module
//!
//! The request-facing adapter: routes HTTP verbs to engine operations
//! and translates outcomes to transport-level responses. Holds no state
//! of its own beyond a shared handle to the engine.
//!
//! ## Verb Mapping
//! - `GET /records?key=..&timestamp=..`    → 200 + record, or 404
//! - `POST /records` (record body)         → 201 + Location, or 409
//! - `PUT /records` (record body)          → 200 if replaced, 201 if new
//! - `DELETE /records?key=..&timestamp=..` → 200, or 404

mod response;
mod routes;

pub use response::ErrorResponse;
pub use routes::{router, RecordQuery};
