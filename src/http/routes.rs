//! Record routes
//!
//! CRUD handlers over a shared engine handle. The adapter owns the
//! response-status decisions the engine deliberately does not make: it
//! calls `get` before `update` to pick 200 vs 201, and builds the
//! Location value addressing a newly created record.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::engine::Engine;
use crate::error::Result;
use crate::record::Record;

/// Identity selector taken from query parameters
#[derive(Debug, Deserialize)]
pub struct RecordQuery {
    pub key: String,
    pub timestamp: i64,
}

/// Build the application router around a shared engine handle
pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route(
            "/records",
            get(get_record)
                .post(create_record)
                .put(update_record)
                .delete(delete_record),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(engine)
}

//
// ─────────────────────────────────────────────────────────────
// GET /records?key=..&timestamp=..
// Return the record at the identity, or 404
// ─────────────────────────────────────────────────────────────
//
async fn get_record(
    State(engine): State<Arc<Engine>>,
    Query(query): Query<RecordQuery>,
) -> std::result::Result<Json<Record>, StatusCode> {
    match engine.get(&query.key, query.timestamp) {
        Some(record) => Ok(Json(record)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

//
// ─────────────────────────────────────────────────────────────
// POST /records
// Create at a fresh identity: 201 + Location, or 409
// ─────────────────────────────────────────────────────────────
//
async fn create_record(
    State(engine): State<Arc<Engine>>,
    Json(record): Json<Record>,
) -> Result<Response> {
    let created = engine.create(record)?;
    Ok(created_response(created))
}

//
// ─────────────────────────────────────────────────────────────
// PUT /records
// Upsert: 200 if the identity existed, 201 + Location if new.
// The existence check races with concurrent mutations; a record
// deleted or created between the get and the update can misreport
// the status. Accepted, matching the engine's upsert contract.
// ─────────────────────────────────────────────────────────────
//
async fn update_record(
    State(engine): State<Arc<Engine>>,
    Json(record): Json<Record>,
) -> Result<Response> {
    let existing = engine.get(&record.key, record.timestamp);
    let updated = engine.update(record)?;

    if existing.is_some() {
        Ok(Json(updated).into_response())
    } else {
        Ok(created_response(updated))
    }
}

//
// ─────────────────────────────────────────────────────────────
// DELETE /records?key=..&timestamp=..
// Remove the identity: 200 if removed, 404 if absent
// ─────────────────────────────────────────────────────────────
//
async fn delete_record(
    State(engine): State<Arc<Engine>>,
    Query(query): Query<RecordQuery>,
) -> Result<StatusCode> {
    if engine.delete(&query.key, query.timestamp)? {
        Ok(StatusCode::OK)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

/// 201 response carrying the record and a Location addressing it
fn created_response(record: Record) -> Response {
    let location = format!(
        "/records?key={}&timestamp={}",
        record.key, record.timestamp
    );

    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(record),
    )
        .into_response()
}
