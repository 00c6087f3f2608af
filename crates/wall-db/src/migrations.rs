use std::path::Path;

use rusqlite::Connection;
use tracing::{info, warn};

use crate::error::{Result, StoreError};

/// File extension a resource needs to be picked up.
pub const SCHEMA_EXTENSION: &str = "sql";

/// One named unit of SQL, e.g. `0002_guestbook_entries.sql`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaResource {
    pub name: String,
    pub sql: String,
}

impl SchemaResource {
    pub fn new(name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql: sql.into(),
        }
    }
}

const EMBEDDED: &[(&str, &str)] = &[
    ("0001_visitors.sql", include_str!("../migrations/0001_visitors.sql")),
    (
        "0002_guestbook_entries.sql",
        include_str!("../migrations/0002_guestbook_entries.sql"),
    ),
    (
        "0003_visitors_unique_fingerprint.sql",
        include_str!("../migrations/0003_visitors_unique_fingerprint.sql"),
    ),
];

/// Resources compiled into the binary.
pub fn embedded() -> Vec<SchemaResource> {
    EMBEDDED
        .iter()
        .map(|(name, sql)| SchemaResource::new(*name, *sql))
        .collect()
}

/// Reads every schema file in `dir`. Other files are skipped.
pub fn load_dir(dir: &Path) -> Result<Vec<SchemaResource>> {
    let read_err = |source| StoreError::ResourceDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut resources = Vec::new();
    for dir_entry in std::fs::read_dir(dir).map_err(read_err)? {
        let path = dir_entry.map_err(read_err)?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !path.is_file() || !is_schema_file(name) {
            continue;
        }

        let sql = std::fs::read_to_string(&path).map_err(|source| StoreError::ResourceDir {
            path: path.clone(),
            source,
        })?;
        resources.push(SchemaResource::new(name, sql));
    }

    Ok(resources)
}

pub fn is_schema_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext == SCHEMA_EXTENSION)
}

/// Drops non-schema resources and orders the rest by name.
pub fn ordered(resources: &[SchemaResource]) -> Vec<&SchemaResource> {
    let mut selected: Vec<&SchemaResource> = resources
        .iter()
        .filter(|r| is_schema_file(&r.name))
        .collect();
    selected.sort_by(|a, b| a.name.cmp(&b.name));
    selected
}

/// Applies each resource in its own transaction, in filename order.
///
/// With `ignore_errors` a failing resource is logged and rolled back and the
/// rest still run. Otherwise the first failure is returned. Returns how many
/// resources applied cleanly.
pub fn run(conn: &mut Connection, resources: &[SchemaResource], ignore_errors: bool) -> Result<usize> {
    let mut applied = 0;

    for resource in ordered(resources) {
        match apply(conn, resource) {
            Ok(()) => {
                info!("Applied schema resource {}", resource.name);
                applied += 1;
            }
            Err(e) if ignore_errors => {
                warn!("Skipping schema resource {}: {}", resource.name, e);
            }
            Err(source) => {
                return Err(StoreError::Schema {
                    resource: resource.name.clone(),
                    source,
                });
            }
        }
    }

    info!("Database migrations complete ({} applied)", applied);
    Ok(applied)
}

fn apply(conn: &mut Connection, resource: &SchemaResource) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(&resource.sql)?;
    tx.commit()
}
