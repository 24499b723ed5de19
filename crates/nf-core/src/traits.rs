use async_trait::async_trait;

use crate::error::NfResult;
use crate::model::*;

/// Storage backend for folders.
#[async_trait]
pub trait FolderStore: Send + Sync {
    /// Insert a folder and return it with its store-assigned id.
    async fn insert(&self, new: &NewFolder) -> NfResult<Folder>;
    async fn get(&self, id: i64) -> NfResult<Option<Folder>>;
    /// All folders in insertion (id) order.
    async fn list(&self) -> NfResult<Vec<Folder>>;
}

/// Storage backend for notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Insert a note and return it with its store-assigned id and resolved
    /// `date_modified`.
    async fn insert(&self, new: &NewNote) -> NfResult<Note>;
    async fn get(&self, id: i64) -> NfResult<Option<Note>>;
    /// All notes in insertion (id) order.
    async fn list(&self) -> NfResult<Vec<Note>>;
    /// Delete by id. Returns `false` when no row matched.
    async fn delete(&self, id: i64) -> NfResult<bool>;
}
