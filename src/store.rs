// Store client - the one SQLite connection shared by every request
// Constructed explicitly at startup and handed to the router as state

use rusqlite::Connection;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::db::{self, Record, StoreError, StoreResult};
use crate::resource::ResourceKind;

#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open (or create) the database file and make sure both tables exist
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        db::setup_database(&conn)?;
        info!(path = %path.display(), "database opened");

        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        db::setup_database(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    pub fn create(&self, kind: ResourceKind, name: &str) -> StoreResult<Record> {
        let conn = self.lock()?;
        let record = db::insert_record(&conn, kind, name)?;
        debug!(resource = %kind, id = record.id, "record created");
        Ok(record)
    }

    pub fn list(&self, kind: ResourceKind) -> StoreResult<Vec<Record>> {
        let conn = self.lock()?;
        db::get_all_records(&conn, kind)
    }

    pub fn get(&self, kind: ResourceKind, id: i64) -> StoreResult<Option<Record>> {
        let conn = self.lock()?;
        db::get_record(&conn, kind, id)
    }

    pub fn update(
        &self,
        kind: ResourceKind,
        id: i64,
        changes: &Map<String, Value>,
    ) -> StoreResult<usize> {
        let conn = self.lock()?;
        db::update_record(&conn, kind, id, changes)
    }

    pub fn delete(&self, kind: ResourceKind, id: i64) -> StoreResult<usize> {
        let conn = self.lock()?;
        db::delete_record(&conn, kind, id)
    }

    pub fn count(&self, kind: ResourceKind) -> StoreResult<i64> {
        let conn = self.lock()?;
        db::count_records(&conn, kind)
    }

    /// Close the connection at shutdown
    ///
    /// Only the last handle can close it explicitly; if other clones are still
    /// alive the connection is closed when the final one drops.
    pub fn close(self) -> StoreResult<()> {
        match Arc::try_unwrap(self.conn) {
            Ok(mutex) => {
                let conn = mutex.into_inner().map_err(|_| StoreError::Poisoned)?;
                conn.close().map_err(|(_, e)| StoreError::Sqlite(e))?;
                info!("database closed");
                Ok(())
            }
            Err(shared) => {
                warn!(
                    handles = Arc::strong_count(&shared),
                    "store still shared at shutdown, deferring close to drop"
                );
                Ok(())
            }
        }
    }
}
