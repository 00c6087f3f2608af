use rand::seq::IndexedRandom;
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior};
use tracing::debug;

use wall_types::models::{Entry, NewEntry, PALETTE, Visitor};

use crate::Database;
use crate::error::Result;

impl Database {
    // -- Visitors --

    pub fn get_visitor(&self, fingerprint: &str) -> Result<Option<Visitor>> {
        self.with_conn(|conn| query_visitor(conn, fingerprint))
    }

    /// Returns the visitor for `fingerprint`, creating it with a random
    /// palette color on first sight. Concurrent callers with the same
    /// fingerprint all get the one row the unique index lets through.
    pub fn get_or_create_visitor(&self, fingerprint: &str) -> Result<Visitor> {
        if let Some(visitor) = self.get_visitor(fingerprint)? {
            return Ok(visitor);
        }

        let color = random_color();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let inserted = tx.execute(
                "INSERT INTO visitors (ip_hash, assigned_color) VALUES (?1, ?2)
                 ON CONFLICT(ip_hash) DO NOTHING",
                (fingerprint, color),
            )?;

            let visitor = tx.query_row(
                "SELECT id, ip_hash, assigned_color FROM visitors WHERE ip_hash = ?1",
                [fingerprint],
                visitor_from_row,
            )?;
            tx.commit()?;

            if inserted > 0 {
                debug!("New visitor #{} assigned {}", visitor.id, visitor.assigned_color);
            }
            Ok(visitor)
        })
    }

    pub fn count_visitors(&self) -> Result<i64> {
        self.read_or_default("count visitors", |conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM visitors", [], |row| row.get(0))?)
        })
    }

    // -- Entries --

    /// All entries, newest first.
    pub fn list_entries(&self) -> Result<Vec<Entry>> {
        self.read_or_default("list entries", query_entries)
    }

    pub fn create_entry(&self, entry: &NewEntry) -> Result<Entry> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO guestbook_entries (name, message, color) VALUES (?1, ?2, ?3)",
                (&entry.name, &entry.message, &entry.color),
            )?;

            Ok(Entry {
                id: conn.last_insert_rowid(),
                name: entry.name.clone(),
                message: entry.message.clone(),
                color: entry.color.clone(),
            })
        })
    }
}

fn random_color() -> &'static str {
    PALETTE.choose(&mut rand::rng()).copied().unwrap_or(PALETTE[0])
}

fn query_visitor(conn: &Connection, fingerprint: &str) -> Result<Option<Visitor>> {
    let visitor = conn
        .query_row(
            "SELECT id, ip_hash, assigned_color FROM visitors WHERE ip_hash = ?1",
            [fingerprint],
            visitor_from_row,
        )
        .optional()?;

    Ok(visitor)
}

fn visitor_from_row(row: &Row<'_>) -> rusqlite::Result<Visitor> {
    Ok(Visitor {
        id: row.get(0)?,
        fingerprint: row.get(1)?,
        assigned_color: row.get(2)?,
    })
}

fn query_entries(conn: &Connection) -> Result<Vec<Entry>> {
    let mut stmt =
        conn.prepare("SELECT id, name, message, color FROM guestbook_entries ORDER BY id DESC")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(Entry {
                id: row.get(0)?,
                name: row.get(1)?,
                message: row.get(2)?,
                color: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
