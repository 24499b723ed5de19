use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use nf_core::*;

/// Default number of connections in the pool.
/// SQLite WAL mode supports 1 writer + N readers, so even a small pool
/// eliminates head-of-line blocking for concurrent read queries.
const DEFAULT_POOL_SIZE: usize = 4;

/// SQLite-backed store for folders and notes.
pub struct SqliteStore {
    /// Connection pool — round-robin across `DEFAULT_POOL_SIZE` connections.
    /// Each connection is independently protected by a Mutex so callers can
    /// run synchronous rusqlite operations without holding an async lock.
    pool: Vec<Mutex<Connection>>,
    /// Atomic counter for round-robin slot selection.
    next_slot: AtomicUsize,
}

impl SqliteStore {
    /// Execute a synchronous closure with a pooled database connection.
    ///
    /// Picks the next connection via round-robin, locks it, runs the
    /// closure, then releases. Because the closure is `FnOnce` (not async),
    /// the `MutexGuard` is guaranteed to drop before any `.await` — making
    /// the enclosing future `Send`.
    fn with_conn<F, T>(&self, f: F) -> NfResult<T>
    where
        F: FnOnce(&Connection) -> NfResult<T>,
    {
        let idx = self.next_slot.fetch_add(1, Ordering::Relaxed) % self.pool.len();
        let conn = self.pool[idx]
            .lock()
            .map_err(|e| NfError::Storage(e.to_string()))?;
        f(&conn)
    }

    fn open_connection(path: &Path) -> NfResult<Connection> {
        let conn = Connection::open(path)
            .map_err(|e| NfError::Storage(format!("failed to open sqlite: {e}")))?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON; PRAGMA busy_timeout=5000;",
        )
        .map_err(|e| NfError::Storage(format!("pragma error: {e}")))?;

        Ok(conn)
    }

    pub fn open(path: &Path) -> NfResult<Self> {
        let mut pool = Vec::with_capacity(DEFAULT_POOL_SIZE);
        for _ in 0..DEFAULT_POOL_SIZE {
            pool.push(Mutex::new(Self::open_connection(path)?));
        }

        let store = Self {
            pool,
            next_slot: AtomicUsize::new(0),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn open_in_memory() -> NfResult<Self> {
        // In-memory DBs: use a shared cache URI so all pool connections see
        // the same data. Without this, each Connection::open_in_memory()
        // gets its own isolated database.
        //
        // SQLITE_OPEN_URI is required for rusqlite to parse the URI; the
        // default OpenFlags do NOT include it.
        static MEMDB_SEQ: AtomicUsize = AtomicUsize::new(0);
        let uri = format!(
            "file:memdb{}?mode=memory&cache=shared",
            MEMDB_SEQ.fetch_add(1, Ordering::Relaxed)
        );
        let flags = rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
            | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
            | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX
            | rusqlite::OpenFlags::SQLITE_OPEN_URI;
        let mut pool = Vec::with_capacity(DEFAULT_POOL_SIZE);
        for _ in 0..DEFAULT_POOL_SIZE {
            let conn = Connection::open_with_flags(&uri, flags)
                .map_err(|e| NfError::Storage(format!("failed to open in-memory sqlite: {e}")))?;
            conn.execute_batch("PRAGMA foreign_keys=ON;")
                .map_err(|e| NfError::Storage(format!("pragma error: {e}")))?;
            pool.push(Mutex::new(conn));
        }

        let store = Self {
            pool,
            next_slot: AtomicUsize::new(0),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> NfResult<()> {
        // Migrations run on slot 0 only — they need exclusive access.
        let conn = self.pool[0]
            .lock()
            .map_err(|e| NfError::Storage(e.to_string()))?;

        // Table-driven migration registry; 001 creates schema_version.
        const MIGRATIONS: &[(i64, &str)] =
            &[(1, include_str!("../migrations/001_initial.sql"))];

        conn.execute_batch(MIGRATIONS[0].1)
            .map_err(|e| NfError::Migration(format!("migration 001 failed: {e}")))?;

        let max_version: i64 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_version",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        for &(version, sql) in &MIGRATIONS[1..] {
            if version <= max_version {
                continue;
            }
            conn.execute_batch(sql)
                .map_err(|e| NfError::Migration(format!("migration {version:03} failed: {e}")))?;
        }

        tracing::debug!(
            applied_up_to = MIGRATIONS.last().map(|(v, _)| *v).unwrap_or(0),
            "migrations complete"
        );

        Ok(())
    }

    fn row_to_folder(row: &rusqlite::Row<'_>) -> rusqlite::Result<Folder> {
        Ok(Folder {
            id: row.get(0)?,
            folder_name: row.get(1)?,
        })
    }

    fn row_to_note(row: &rusqlite::Row<'_>) -> rusqlite::Result<Note> {
        let date_raw: String = row.get(4)?;
        let date_modified = parse_datetime(4, &date_raw)?;
        Ok(Note {
            id: row.get(0)?,
            note_name: row.get(1)?,
            folder_id: row.get(2)?,
            content: row.get(3)?,
            date_modified,
        })
    }
}

fn parse_datetime(column: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                Type::Text,
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("bad timestamp {raw:?}: {e}"),
                )),
            )
        })
}

#[async_trait]
impl FolderStore for SqliteStore {
    async fn insert(&self, new: &NewFolder) -> NfResult<Folder> {
        let folder_name = new.folder_name.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO folders (folder_name) VALUES (?1)",
                params![folder_name],
            )
            .map_err(|e| NfError::Storage(format!("insert folder failed: {e}")))?;

            Ok(Folder {
                id: conn.last_insert_rowid(),
                folder_name,
            })
        })
    }

    async fn get(&self, id: i64) -> NfResult<Option<Folder>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, folder_name FROM folders WHERE id = ?1",
                params![id],
                Self::row_to_folder,
            )
            .optional()
            .map_err(|e| NfError::Storage(e.to_string()))
        })
    }

    async fn list(&self) -> NfResult<Vec<Folder>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, folder_name FROM folders ORDER BY id")
                .map_err(|e| NfError::Storage(e.to_string()))?;

            let folders = stmt
                .query_map([], Self::row_to_folder)
                .map_err(|e| NfError::Storage(e.to_string()))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| NfError::Storage(e.to_string()))?;

            Ok(folders)
        })
    }
}

#[async_trait]
impl NoteStore for SqliteStore {
    async fn insert(&self, new: &NewNote) -> NfResult<Note> {
        let note = Note {
            id: 0,
            note_name: new.note_name.clone(),
            folder_id: new.folder_id,
            content: new.content.clone(),
            date_modified: new.date_modified.unwrap_or_else(Utc::now),
        };
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO notes (note_name, folder_id, content, date_modified)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    note.note_name,
                    note.folder_id,
                    note.content,
                    note.date_modified.to_rfc3339(),
                ],
            )
            .map_err(|e| NfError::Storage(format!("insert note failed: {e}")))?;

            Ok(Note {
                id: conn.last_insert_rowid(),
                ..note
            })
        })
    }

    async fn get(&self, id: i64) -> NfResult<Option<Note>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, note_name, folder_id, content, date_modified
                 FROM notes WHERE id = ?1",
                params![id],
                Self::row_to_note,
            )
            .optional()
            .map_err(|e| NfError::Storage(e.to_string()))
        })
    }

    async fn list(&self) -> NfResult<Vec<Note>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, note_name, folder_id, content, date_modified
                     FROM notes ORDER BY id",
                )
                .map_err(|e| NfError::Storage(e.to_string()))?;

            let notes = stmt
                .query_map([], Self::row_to_note)
                .map_err(|e| NfError::Storage(e.to_string()))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| NfError::Storage(e.to_string()))?;

            Ok(notes)
        })
    }

    async fn delete(&self, id: i64) -> NfResult<bool> {
        self.with_conn(|conn| {
            let rows = conn
                .execute("DELETE FROM notes WHERE id = ?1", params![id])
                .map_err(|e| NfError::Storage(format!("delete note failed: {e}")))?;
            Ok(rows > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_folder(store: &SqliteStore, name: &str) -> Folder {
        FolderStore::insert(store, &NewFolder::new(name))
            .await
            .expect("insert folder")
    }

    #[tokio::test]
    async fn folder_ids_are_sequential_and_listed_in_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        let a = seed_folder(&store, "Important").await;
        let b = seed_folder(&store, "Super").await;
        let c = seed_folder(&store, "Spangley").await;
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));

        let listed = FolderStore::list(&store).await.unwrap();
        assert_eq!(listed, vec![a, b, c]);
    }

    #[tokio::test]
    async fn folder_get_returns_none_for_missing_id() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(FolderStore::get(&store, 12345).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn note_insert_defaults_date_modified() {
        let store = SqliteStore::open_in_memory().unwrap();
        let folder = seed_folder(&store, "Animals").await;

        let before = Utc::now();
        let note = NoteStore::insert(&store, &NewNote::new("Lions", folder.id, "Lions are cool."))
            .await
            .unwrap();
        assert!(note.date_modified >= before);
        assert!(note.date_modified <= Utc::now());

        let fetched = NoteStore::get(&store, note.id).await.unwrap().unwrap();
        assert_eq!(fetched, note);
    }

    #[tokio::test]
    async fn note_insert_preserves_explicit_date_modified() {
        let store = SqliteStore::open_in_memory().unwrap();
        let folder = seed_folder(&store, "Animals").await;

        let stamp: DateTime<Utc> = "2019-01-03T00:00:00Z".parse().unwrap();
        let note = NoteStore::insert(
            &store,
            &NewNote::new("Lions", folder.id, "Lions are cool.").with_date_modified(stamp),
        )
        .await
        .unwrap();
        assert_eq!(note.date_modified, stamp);

        let fetched = NoteStore::get(&store, note.id).await.unwrap().unwrap();
        assert_eq!(fetched.date_modified, stamp);
    }

    #[tokio::test]
    async fn note_content_round_trips_verbatim() {
        let store = SqliteStore::open_in_memory().unwrap();
        let folder = seed_folder(&store, "Naughty").await;

        let raw = r#"Bad image <img src="https://url.to.file.which/does-not.exist" onerror="alert(document.cookie);">."#;
        let note = NoteStore::insert(&store, &NewNote::new("Naughty", folder.id, raw))
            .await
            .unwrap();

        // The store never rewrites content; sanitization is a read-path concern.
        let fetched = NoteStore::get(&store, note.id).await.unwrap().unwrap();
        assert_eq!(fetched.content, raw);
    }

    #[tokio::test]
    async fn note_delete_removes_exactly_one() {
        let store = SqliteStore::open_in_memory().unwrap();
        let folder = seed_folder(&store, "Animals").await;

        let mut ids = Vec::new();
        for name in ["Lions", "Tigers", "Bears"] {
            let note = NoteStore::insert(&store, &NewNote::new(name, folder.id, "..."))
                .await
                .unwrap();
            ids.push(note.id);
        }

        assert!(NoteStore::delete(&store, ids[1]).await.unwrap());
        assert!(!NoteStore::delete(&store, ids[1]).await.unwrap());

        let remaining: Vec<i64> = NoteStore::list(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(remaining, vec![ids[0], ids[2]]);
    }

    #[tokio::test]
    async fn note_insert_with_unknown_folder_is_a_storage_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = NoteStore::insert(&store, &NewNote::new("Orphan", 999, "..."))
            .await
            .expect_err("foreign key should reject");
        assert!(matches!(err, NfError::Storage(_)));
    }

    #[tokio::test]
    async fn deleting_a_folder_cascades_to_its_notes() {
        let store = SqliteStore::open_in_memory().unwrap();
        let keep = seed_folder(&store, "Keep").await;
        let drop = seed_folder(&store, "Drop").await;

        NoteStore::insert(&store, &NewNote::new("Kept", keep.id, "..."))
            .await
            .unwrap();
        NoteStore::insert(&store, &NewNote::new("Dropped", drop.id, "..."))
            .await
            .unwrap();

        store
            .with_conn(|conn| {
                conn.execute("DELETE FROM folders WHERE id = ?1", params![drop.id])
                    .map_err(|e| NfError::Storage(e.to_string()))
            })
            .unwrap();

        let notes = NoteStore::list(&store).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].note_name, "Kept");
    }

    #[tokio::test]
    async fn open_persists_across_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("noteful.sqlite");

        {
            let store = SqliteStore::open(&path).unwrap();
            let folder = seed_folder(&store, "Durable").await;
            NoteStore::insert(&store, &NewNote::new("Persisted", folder.id, "still here"))
                .await
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let notes = NoteStore::list(&store).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].note_name, "Persisted");
    }
}
