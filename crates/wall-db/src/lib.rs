pub mod error;
pub mod migrations;
pub mod queries;

use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{info, warn};

pub use error::{Result, StoreError};
pub use migrations::SchemaResource;

const READER_POOL_SIZE: usize = 4;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Which failures the store tolerates instead of reporting.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    /// Log and skip schema resources that fail to apply.
    pub ignore_schema_errors: bool,
    /// Serve an empty result when a display read (entry list, visitor
    /// count) fails.
    pub degrade_on_read_error: bool,
}

/// The guestbook store: one writer plus a round-robin pool of read-only
/// connections. In-memory databases have no readers and read through the
/// writer.
pub struct Database {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    reader_idx: AtomicUsize,
    options: StoreOptions,
}

impl Database {
    pub fn open(path: &Path, resources: &[SchemaResource], options: StoreOptions) -> Result<Self> {
        let mut writer = Connection::open(path)?;
        writer.busy_timeout(BUSY_TIMEOUT)?;

        // WAL mode for concurrent reads
        writer.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&mut writer, resources, options.ignore_schema_errors)?;

        let mut readers = Vec::with_capacity(READER_POOL_SIZE);
        for _ in 0..READER_POOL_SIZE {
            let conn = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            conn.busy_timeout(BUSY_TIMEOUT)?;
            readers.push(Mutex::new(conn));
        }

        info!(
            "Database opened at {} (1 writer + {} readers)",
            path.display(),
            READER_POOL_SIZE
        );
        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            reader_idx: AtomicUsize::new(0),
            options,
        })
    }

    pub fn open_in_memory(resources: &[SchemaResource], options: StoreOptions) -> Result<Self> {
        let mut writer = Connection::open_in_memory()?;
        migrations::run(&mut writer, resources, options.ignore_schema_errors)?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers: Vec::new(),
            reader_idx: AtomicUsize::new(0),
            options,
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        if self.readers.is_empty() {
            return self.with_conn_mut(|conn| f(conn));
        }

        let idx = self.reader_idx.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[idx]
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        f(&conn)
    }

    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self
            .writer
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        f(&mut conn)
    }

    /// Runs a display read, substituting `T::default()` for a failure when
    /// `degrade_on_read_error` is set.
    fn read_or_default<F, T>(&self, what: &str, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
        T: Default,
    {
        match self.with_conn(f) {
            Err(e) if self.options.degrade_on_read_error => {
                warn!("Failed to {}, serving empty result: {}", what, e);
                Ok(T::default())
            }
            other => other,
        }
    }
}
