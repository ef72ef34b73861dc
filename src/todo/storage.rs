use super::models::TodoList;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    #[error("invalid snapshot: {0}")]
    Invalid(String),
}

/// Where the list collection lives between runs.
pub trait Storage {
    fn load(&self) -> Result<Vec<TodoList>, StorageError>;
    fn save(&mut self, lists: &[TodoList]) -> Result<(), StorageError>;
}

#[derive(Debug, Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    lists: &'a [TodoList],
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Snapshot {
    Versioned { version: u32, lists: Vec<TodoList> },
    // Bare array written before snapshots carried a version.
    Legacy(Vec<TodoList>),
}

pub fn serialize_lists(lists: &[TodoList]) -> Result<String, StorageError> {
    let snapshot = SnapshotRef {
        version: SNAPSHOT_VERSION,
        lists,
    };
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

pub fn parse_lists(content: &str) -> Result<Vec<TodoList>, StorageError> {
    let lists = match serde_json::from_str::<Snapshot>(content)? {
        Snapshot::Versioned { version, lists } => {
            if version == 0 || version > SNAPSHOT_VERSION {
                return Err(StorageError::UnsupportedVersion(version));
            }
            lists
        }
        Snapshot::Legacy(lists) => {
            debug!("reading unversioned snapshot");
            lists
        }
    };
    validate(&lists)?;
    Ok(lists)
}

fn validate(lists: &[TodoList]) -> Result<(), StorageError> {
    let mut list_ids = HashSet::new();
    for list in lists {
        if list.name.trim().is_empty() {
            return Err(StorageError::Invalid(format!("list {} has an empty name", list.id)));
        }
        if !list_ids.insert(list.id) {
            return Err(StorageError::Invalid(format!("duplicate list id {}", list.id)));
        }

        let mut item_ids = HashSet::new();
        for item in &list.items {
            if item.text.trim().is_empty() {
                return Err(StorageError::Invalid(format!(
                    "item {} in list '{}' has empty text",
                    item.id, list.name
                )));
            }
            if !item_ids.insert(item.id) {
                return Err(StorageError::Invalid(format!(
                    "duplicate item id {} in list '{}'",
                    item.id, list.name
                )));
            }
        }
    }
    Ok(())
}

/// JSON snapshot file, fully rewritten on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Vec<TodoList>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("no data file at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };
        let lists = parse_lists(&content)
            .inspect_err(|e| error!("rejected {}: {}", self.path.display(), e))?;
        info!("loaded {} list(s) from {}", lists.len(), self.path.display());
        Ok(lists)
    }

    fn save(&mut self, lists: &[TodoList]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let content = serialize_lists(lists)?;
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, content).map_err(|e| self.io_error(e))?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.io_error(e));
        }
        debug!("saved {} list(s) to {}", lists.len(), self.path.display());
        Ok(())
    }
}

/// Keeps the serialized snapshot in memory and counts writes.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    pub snapshot: Option<String>,
    pub writes: usize,
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn load(&self) -> Result<Vec<TodoList>, StorageError> {
        match &self.snapshot {
            Some(content) => parse_lists(content),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, lists: &[TodoList]) -> Result<(), StorageError> {
        self.snapshot = Some(serialize_lists(lists)?);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::models::{Item, Priority};
    use tempfile::TempDir;

    fn sample_lists() -> Vec<TodoList> {
        let mut groceries = TodoList::new(2, "Courses".to_string());
        groceries.items.push(Item::new(4, "Oeufs".to_string(), Priority::Urgent));
        groceries.items.push(Item::new(3, "Lait".to_string(), Priority::Medium));
        vec![groceries, TodoList::new(1, "Travail".to_string())]
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("absent.json"));
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut storage = JsonFileStorage::new(dir.path().join("nested").join("lists.json"));

        storage.save(&sample_lists()).unwrap();
        assert_eq!(storage.load().unwrap(), sample_lists());
        assert!(!dir.path().join("nested").join("lists.json.tmp").exists());
    }

    #[test]
    fn test_save_overwrites_whole_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut storage = JsonFileStorage::new(dir.path().join("lists.json"));
        storage.save(&sample_lists()).unwrap();

        let mut lists = sample_lists();
        lists[0].items.clear();
        storage.save(&lists).unwrap();

        let loaded = storage.load().unwrap();
        assert!(loaded[0].items.is_empty());
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn test_snapshot_layout() {
        let json = serialize_lists(&sample_lists()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["lists"][0]["name"], "Courses");
        assert_eq!(value["lists"][0]["items"][0]["priority"], "Urgente");
    }

    #[test]
    fn test_legacy_array_is_accepted() {
        let content = r#"[{"id":1,"name":"Maison","todos":[{"id":2,"text":"Ranger","priority":"Basse"}]}]"#;
        let lists = parse_lists(content).unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].items[0].text, "Ranger");
    }

    #[test]
    fn test_legacy_file_is_rewritten_as_versioned() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lists.json");
        fs::write(
            &path,
            r#"[{"id":1,"name":"Maison","todos":[{"id":2,"text":"Ranger","priority":"Basse"}]}]"#,
        )
        .unwrap();

        let mut storage = JsonFileStorage::new(&path);
        let lists = storage.load().unwrap();
        storage.save(&lists).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["lists"][0]["items"][0]["text"], "Ranger");
        assert!(!written.contains("todos"));
        assert_eq!(storage.load().unwrap(), lists);
    }

    #[test]
    fn test_unreadable_data_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path());
        assert!(matches!(storage.load(), Err(StorageError::Io { .. })));
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lists.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupied"), "x").unwrap();

        let mut storage = JsonFileStorage::new(&path);
        assert!(matches!(storage.save(&sample_lists()), Err(StorageError::Io { .. })));
        assert!(!dir.path().join("lists.json.tmp").exists());
    }

    #[test]
    fn test_future_version_is_rejected() {
        let content = r#"{"version":99,"lists":[]}"#;
        assert!(matches!(
            parse_lists(content),
            Err(StorageError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(parse_lists("{not json"), Err(StorageError::Json(_))));
        assert!(matches!(
            parse_lists(r#"{"version":1,"lists":[{"id":"x"}]}"#),
            Err(StorageError::Json(_))
        ));
    }

    #[test]
    fn test_duplicate_item_ids_are_rejected() {
        let content = r#"{"version":1,"lists":[{"id":1,"name":"A","items":[
            {"id":5,"text":"x","priority":"Basse"},
            {"id":5,"text":"y","priority":"Basse"}]}]}"#;
        assert!(matches!(parse_lists(content), Err(StorageError::Invalid(_))));
    }

    #[test]
    fn test_duplicate_list_ids_are_rejected() {
        let content = r#"{"version":1,"lists":[
            {"id":1,"name":"A","items":[]},
            {"id":1,"name":"B","items":[]}]}"#;
        assert!(matches!(parse_lists(content), Err(StorageError::Invalid(_))));
    }

    #[test]
    fn test_blank_names_are_rejected() {
        let content = r#"{"version":1,"lists":[{"id":1,"name":"  ","items":[]}]}"#;
        assert!(matches!(parse_lists(content), Err(StorageError::Invalid(_))));
    }

    #[test]
    fn test_memory_storage_counts_writes() {
        let mut storage = MemoryStorage::default();
        storage.save(&sample_lists()).unwrap();
        storage.save(&[]).unwrap();
        assert_eq!(storage.writes, 2);
        assert!(storage.load().unwrap().is_empty());
    }
}
