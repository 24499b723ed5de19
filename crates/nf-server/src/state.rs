use std::sync::Arc;

use nf_core::{FolderStore, NoteStore};

/// Shared application state.
///
/// Handlers receive their store handles here instead of reaching for any
/// process-global database; lifecycle is owned by the process entry point.
pub struct AppState {
    pub folders: Arc<dyn FolderStore>,
    pub notes: Arc<dyn NoteStore>,
}

impl AppState {
    pub fn new(folders: Arc<dyn FolderStore>, notes: Arc<dyn NoteStore>) -> Self {
        Self { folders, notes }
    }

    /// Build state from a single backend that serves both resources.
    pub fn with_store<S>(store: Arc<S>) -> Self
    where
        S: FolderStore + NoteStore + 'static,
    {
        Self {
            folders: Arc::clone(&store) as Arc<dyn FolderStore>,
            notes: store as Arc<dyn NoteStore>,
        }
    }
}
