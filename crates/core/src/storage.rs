use std::collections::HashMap;

use chrono::Utc;
use rusqlite::{named_params, Connection, OptionalExtension};
use thiserror::Error;

use crate::config::AppConfig;
use crate::model::Task;

/// Slot holding the serialized task collection.
pub const TASKS_SLOT: &str = "tasks";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("key/value store error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to encode or decode stored tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Named text slots, the only persistence primitive the core needs.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

/// SQLite-backed store. One row per slot in the `kv` table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn initialize(config: &AppConfig) -> StorageResult<Self> {
        let conn = Connection::open(config.db_path())?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let store = Self { conn };
        store.apply_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.apply_migrations()?;
        Ok(store)
    }

    fn apply_migrations(&self) -> StorageResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
             );",
        )?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = :key",
                named_params! { ":key": key },
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (:key, :value, :updated_at)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            named_params! {
                ":key": key,
                ":value": value,
                ":updated_at": Utc::now().to_rfc3339(),
            },
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = :key", named_params! { ":key": key })?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.slots.remove(key);
        Ok(())
    }
}

/// Load the task collection. Absent, unreadable or malformed data yields an empty list.
pub fn load_tasks(store: &dyn KeyValueStore) -> Vec<Task> {
    match try_load_tasks(store) {
        Ok(tasks) => tasks,
        Err(err) => {
            tracing::warn!(error = %err, slot = TASKS_SLOT, "failed to load tasks, starting empty");
            Vec::new()
        }
    }
}

pub fn try_load_tasks(store: &dyn KeyValueStore) -> StorageResult<Vec<Task>> {
    let Some(raw) = store.get(TASKS_SLOT)? else {
        tracing::debug!(slot = TASKS_SLOT, "no stored tasks");
        return Ok(Vec::new());
    };
    let tasks: Vec<Task> = serde_json::from_str(&raw)?;
    tracing::debug!(count = tasks.len(), "loaded tasks");
    Ok(tasks)
}

pub fn try_save_tasks(store: &mut dyn KeyValueStore, tasks: &[Task]) -> StorageResult<()> {
    let data = serde_json::to_string(tasks)?;
    store.set(TASKS_SLOT, &data)
}

/// Best-effort write. Failures are logged and dropped; in-memory state stays authoritative.
pub fn save_tasks(store: &mut dyn KeyValueStore, tasks: &[Task]) {
    if let Err(err) = try_save_tasks(store, tasks) {
        tracing::error!(error = %err, slot = TASKS_SLOT, "failed to persist tasks");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn temp_config() -> (AppConfig, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let data_dir = dir.path().to_path_buf();
        std::fs::create_dir_all(&data_dir).expect("create data dir");
        let config = AppConfig::from_data_dir(data_dir).expect("config");
        (config, dir)
    }

    fn sample_tasks() -> Vec<Task> {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let mut done = Task::new("Buy milk", "", "3", created);
        done.completed = true;
        done.updated_at = created + chrono::Duration::hours(1);
        vec![done, Task::new("Write report", "Q2 numbers", "1", created)]
    }

    #[test]
    fn sqlite_store_round_trips_task_slot() {
        let (config, _dir) = temp_config();
        let tasks = sample_tasks();
        {
            let mut store = SqliteStore::initialize(&config).expect("init store");
            try_save_tasks(&mut store, &tasks).expect("save");
        }

        let store = SqliteStore::initialize(&config).expect("reopen store");
        assert_eq!(load_tasks(&store), tasks);
    }

    #[test]
    fn set_overwrites_existing_slot() {
        let mut store = SqliteStore::in_memory().expect("store");
        store.set("k", "one").expect("set");
        store.set("k", "two").expect("set again");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("two"));

        store.remove("k").expect("remove");
        assert_eq!(store.get("k").expect("get"), None);
    }

    #[test]
    fn missing_slot_loads_empty() {
        let store = MemoryStore::new();
        assert!(load_tasks(&store).is_empty());
    }

    #[test]
    fn corrupt_slot_falls_back_to_empty() {
        let mut store = MemoryStore::new();
        store.set(TASKS_SLOT, "{not json").expect("set");
        assert!(try_load_tasks(&store).is_err());
        assert!(load_tasks(&store).is_empty());
    }

    #[test]
    fn stored_records_use_iso_timestamps() {
        let mut store = MemoryStore::new();
        try_save_tasks(&mut store, &sample_tasks()).expect("save");
        let raw = store.get(TASKS_SLOT).expect("get").expect("slot present");

        assert!(raw.contains("\"createdAt\":\"2024-05-01T10:00:00Z\""));
        assert!(raw.contains("\"updatedAt\":\"2024-05-01T11:00:00Z\""));
    }
}
