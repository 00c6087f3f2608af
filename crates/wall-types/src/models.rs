use serde::{Deserialize, Serialize};

/// Colors handed out to new visitors. A visitor keeps theirs forever.
pub const PALETTE: [&str; 12] = [
    "#ff6b6b", "#ffa726", "#ffee58", "#66bb6a",
    "#42a5f5", "#7e57c2", "#ec407a", "#26a69a",
    "#ff7043", "#8d6e63", "#78909c", "#5c6bc0",
];

pub const MAX_NAME_CHARS: usize = 15;
pub const MAX_MESSAGE_CHARS: usize = 40;

/// A client recognized by its address fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visitor {
    pub id: i64,
    pub fingerprint: String,
    pub assigned_color: String,
}

/// A stored guestbook entry. Entries are never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub name: String,
    pub message: String,
    pub color: String,
}

/// An entry that passed validation and is ready to be inserted.
///
/// Only `CreateEntryRequest::validate` builds one outside of tests, so
/// `message` and `color` are non-empty and both text fields are already
/// truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub name: String,
    pub message: String,
    pub color: String,
}
