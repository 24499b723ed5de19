use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Folder
// ---------------------------------------------------------------------------

/// A named container for notes. The id is assigned by the store on insert
/// and is never client-supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: i64,
    pub folder_name: String,
}

/// Payload for inserting a folder. Carries no id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFolder {
    pub folder_name: String,
}

impl NewFolder {
    pub fn new(folder_name: impl Into<String>) -> Self {
        Self {
            folder_name: folder_name.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Note
// ---------------------------------------------------------------------------

/// A note inside a folder. `content` is persisted verbatim, including any
/// markup the client sent; sanitization happens on the read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub note_name: String,
    pub folder_id: i64,
    pub content: String,
    pub date_modified: DateTime<Utc>,
}

/// Payload for inserting a note. `date_modified` falls back to the insert
/// time when the client omits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNote {
    pub note_name: String,
    pub folder_id: i64,
    pub content: String,
    pub date_modified: Option<DateTime<Utc>>,
}

impl NewNote {
    pub fn new(note_name: impl Into<String>, folder_id: i64, content: impl Into<String>) -> Self {
        Self {
            note_name: note_name.into(),
            folder_id,
            content: content.into(),
            date_modified: None,
        }
    }

    pub fn with_date_modified(mut self, date_modified: DateTime<Utc>) -> Self {
        self.date_modified = Some(date_modified);
        self
    }
}
