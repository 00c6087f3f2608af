use serde::{Deserialize, Serialize};

use crate::models::{Entry, MAX_MESSAGE_CHARS, MAX_NAME_CHARS, NewEntry};

// -- Entries --

#[derive(Debug, Default, Deserialize)]
pub struct CreateEntryRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub color: String,
}

/// Returned by `CreateEntryRequest::validate` when a required field is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingField;

impl CreateEntryRequest {
    /// Checks required fields and truncates `name` and `message` to their
    /// display limits. Limits count chars, not bytes.
    pub fn validate(self) -> Result<NewEntry, MissingField> {
        if self.message.is_empty() || self.color.is_empty() {
            return Err(MissingField);
        }

        Ok(NewEntry {
            name: truncate_chars(self.name, MAX_NAME_CHARS),
            message: truncate_chars(self.message, MAX_MESSAGE_CHARS),
            color: self.color,
        })
    }
}

fn truncate_chars(mut s: String, max: usize) -> String {
    if let Some((idx, _)) = s.char_indices().nth(max) {
        s.truncate(idx);
    }
    s
}

// -- Wall --

/// Everything the wall page shows.
#[derive(Debug, Clone, Serialize)]
pub struct WallPage {
    pub visitor_number: i64,
    pub visitor_color: String,
    pub total_visitors: i64,
    pub entries: Vec<Entry>,
    pub tile_colors: Vec<String>,
}
