//! Engine Module
//!
//! The core storage engine: owns the in-memory store and keeps the
//! backing file synchronized with every accepted mutation.
//!
//! ## Responsibilities
//! - Load the backing file into memory at startup
//! - Guarantee safe concurrent access to the store
//! - Rewrite the backing file after every accepted mutation
//!
//! ## Concurrency Model: parallel readers, exclusive writers
//!
//! A single `RwLock` protects the whole store *and* the backing-file
//! operations:
//!
//! - **Reads** (`get`): shared acquisition, run in parallel, never
//!   trigger persistence.
//! - **Writes** (`create`/`update`/`delete`): exclusive acquisition held
//!   across both the map mutation and the full-file rewrite. No reader
//!   or other writer can observe the store while a mutation (including
//!   its file write) is in flight, so a reader that starts after a
//!   writer finishes always sees that writer's result.
//!
//! The engine performs no background work and spawns no threads; every
//! operation is synchronous and blocks the calling thread for lock
//! acquisition and file I/O.

use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::codec;
use crate::config::Config;
use crate::error::{EpochError, Result};
use crate::record::{Record, RecordId};

/// In-memory mapping from identity to record
type Store = HashMap<RecordId, Record>;

/// The storage engine
///
/// Constructed once at process start and shared (via `Arc`) with every
/// request handler; the engine is the sole owner of the store and the
/// sole reader/writer of the backing file.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Path of the backing file ({data_dir}/records.csv)
    store_path: PathBuf,

    /// The store, guarded together with the backing file
    store: RwLock<Store>,
}

impl Engine {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const STORE_FILENAME: &'static str = "records.csv";

    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Create the data directory if it doesn't exist
    /// 2. Load every record from the backing file, if one exists
    /// 3. Ready to serve requests
    ///
    /// An absent backing file is a valid empty store. A malformed file
    /// (unparsable row, non-numeric timestamp, I/O failure) is fatal:
    /// the engine refuses to start rather than serve a possibly
    /// incomplete store.
    pub fn open(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;

        let store_path = config.data_dir.join(Self::STORE_FILENAME);

        let store = if store_path.exists() {
            let file = fs::File::open(&store_path)?;
            let records = codec::read_records(&mut BufReader::new(file))?;

            tracing::info!(
                "Loaded {} records from {}",
                records.len(),
                store_path.display()
            );

            records.into_iter().map(|r| (r.id(), r)).collect()
        } else {
            tracing::info!(
                "No backing file at {}, starting empty",
                store_path.display()
            );
            Store::new()
        };

        Ok(Self {
            config,
            store_path,
            store: RwLock::new(store),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Get the record at an identity
    ///
    /// Pure read: runs under the shared lock, in parallel with other
    /// readers, and never touches the backing file.
    pub fn get(&self, key: &str, timestamp: i64) -> Option<Record> {
        let store = self.store.read();
        store.get(&RecordId::new(key, timestamp)).cloned()
    }

    /// Create a record at a fresh identity
    ///
    /// Fails with `Conflict` if the identity already exists, leaving the
    /// store and the backing file untouched. On success the whole store
    /// has been persisted before this returns.
    pub fn create(&self, record: Record) -> Result<Record> {
        let mut store = self.store.write();

        let id = record.id();
        if store.contains_key(&id) {
            return Err(EpochError::Conflict {
                key: id.key,
                timestamp: id.timestamp,
            });
        }

        store.insert(id, record.clone());
        self.persist(&store)?;

        tracing::debug!(key = %record.key, timestamp = record.timestamp, "created record");
        Ok(record)
    }

    /// Insert or replace the record at its identity (upsert)
    ///
    /// Does not report whether this was an insert or a replace; a caller
    /// that needs the distinction performs a `get` first and accepts the
    /// get-then-update race.
    pub fn update(&self, record: Record) -> Result<Record> {
        let mut store = self.store.write();

        store.insert(record.id(), record.clone());
        self.persist(&store)?;

        tracing::debug!(key = %record.key, timestamp = record.timestamp, "updated record");
        Ok(record)
    }

    /// Remove the record at an identity
    ///
    /// Returns `Ok(true)` if a record was removed (and the store has been
    /// persisted), `Ok(false)` if the identity was absent, in which case
    /// nothing is written to the backing file.
    pub fn delete(&self, key: &str, timestamp: i64) -> Result<bool> {
        let mut store = self.store.write();

        if store.remove(&RecordId::new(key, timestamp)).is_none() {
            return Ok(false);
        }

        self.persist(&store)?;

        tracing::debug!(key, timestamp, "deleted record");
        Ok(true)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Rewrite the backing file with the full store contents
    ///
    /// Called with the write lock held, so no reader can observe the
    /// window between deleting the old file and finishing the new one.
    /// Row order is the map's iteration order and is not stable across
    /// runs.
    fn persist(&self, store: &Store) -> Result<()> {
        if self.store_path.exists() {
            fs::remove_file(&self.store_path).map_err(|e| {
                EpochError::Persistence(format!(
                    "removing {}: {}",
                    self.store_path.display(),
                    e
                ))
            })?;
        }

        let file = fs::File::create(&self.store_path).map_err(|e| {
            EpochError::Persistence(format!(
                "creating {}: {}",
                self.store_path.display(),
                e
            ))
        })?;

        let mut writer = BufWriter::new(file);
        codec::write_records(&mut writer, store.values()).map_err(|e| {
            EpochError::Persistence(format!(
                "writing {}: {}",
                self.store_path.display(),
                e
            ))
        })?;

        writer.flush().map_err(|e| {
            EpochError::Persistence(format!(
                "flushing {}: {}",
                self.store_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of records in the store
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    /// Path of the backing file
    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
