//! Key-value stores backing [`State`](crate::State) entries.
//!
//! Values are stored as JSON, so that the stored format does not depend on the Rust types used to access them.

use crate::{error::ResultExt, E, R};
use serde_json::{Map, Value};
use std::{
	collections::HashMap, fs, path::{Path, PathBuf}, sync::Mutex
};

/// Storage of values that survive extension restarts.
pub trait Memento: Send+Sync {
	/// Read the value stored under the key, if any.
	fn get(&self, key: &str) -> R<Option<Value>>;
	/// Store a value under the key, or remove the key if the value is [`None`].
	/// The change is durable when this function returns.
	fn update(&self, key: &str, value: Option<Value>) -> R<()>;
}

/// Memento kept in a single JSON file, rewritten on every update.
#[derive(Debug)]
pub struct FileMemento {
	path: PathBuf,
	values: Mutex<Map<String, Value>>,
}

impl FileMemento {
	/// Open the store, reading the file if it exists.
	/// The file and its parent directories are only created on the first update.
	pub fn open(path: impl Into<PathBuf>) -> R<FileMemento> {
		let path = path.into();
		let values = if path.exists() {
			let raw = fs::read_to_string(&path).wrap(format!("failed to read state from {}", path.display()))?;
			match serde_json::from_str(&raw).wrap(format!("state file {} is not valid JSON", path.display()))? {
				Value::Object(values) => values,
				_ => return Err(E::error(format!("state file {} does not contain a JSON object", path.display()))),
			}
		} else {
			Map::new()
		};
		Ok(FileMemento { path, values: Mutex::new(values) })
	}

	/// Path of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn save(&self, values: &Map<String, Value>) -> R<()> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent).wrap(format!("failed to create directory {}", parent.display()))?;
		}
		let tmp = self.path.with_extension("tmp");
		fs::write(&tmp, serde_json::to_string_pretty(values)?).wrap(format!("failed to write state to {}", tmp.display()))?;
		fs::rename(&tmp, &self.path).wrap(format!("failed to replace {}", self.path.display()))?;
		Ok(())
	}
}

impl Memento for FileMemento {
	fn get(&self, key: &str) -> R<Option<Value>> {
		let values = self.values.lock().map_err(|_| E::error("state store poisoned"))?;
		Ok(values.get(key).cloned())
	}

	fn update(&self, key: &str, value: Option<Value>) -> R<()> {
		let mut values = self.values.lock().map_err(|_| E::error("state store poisoned"))?;
		let mut staged = values.clone();
		match value {
			Some(value) => staged.insert(key.to_owned(), value),
			None => staged.remove(key),
		};
		log::debug!("persisting {} to {}", key, self.path.display());
		self.save(&staged)?;
		*values = staged;
		Ok(())
	}
}

/// Memento kept in memory, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryMemento {
	values: Mutex<HashMap<String, Value>>,
}

impl MemoryMemento {
	/// Create an empty store.
	pub fn new() -> MemoryMemento {
		MemoryMemento::default()
	}
}

impl Memento for MemoryMemento {
	fn get(&self, key: &str) -> R<Option<Value>> {
		Ok(self.values.lock().map_err(|_| E::error("state store poisoned"))?.get(key).cloned())
	}

	fn update(&self, key: &str, value: Option<Value>) -> R<()> {
		let mut values = self.values.lock().map_err(|_| E::error("state store poisoned"))?;
		match value {
			Some(value) => values.insert(key.to_owned(), value),
			None => values.remove(key),
		};
		Ok(())
	}
}

#[test]
fn test_file_memento_survives_reopen() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("nested").join("state.json");
	let memento = FileMemento::open(&path).unwrap();
	assert_eq!(memento.get("sio2.apiData").unwrap(), None);
	assert!(!path.exists());
	memento.update("sio2.apiData", Some(serde_json::json!({"name": "szkopul"}))).unwrap();
	memento.update("other", Some(Value::Bool(true))).unwrap();
	memento.update("other", None).unwrap();
	let reopened = FileMemento::open(&path).unwrap();
	assert_eq!(reopened.get("sio2.apiData").unwrap(), Some(serde_json::json!({"name": "szkopul"})));
	assert_eq!(reopened.get("other").unwrap(), None);
}

#[test]
fn test_file_memento_rejects_garbage() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("state.json");
	fs::write(&path, "[1, 2, 3]").unwrap();
	assert!(FileMemento::open(&path).is_err());
}

#[test]
fn test_failed_save_keeps_old_value() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("state.json");
	let memento = FileMemento::open(&path).unwrap();
	memento.update("sio2.apiData", Some(serde_json::json!({"name": "szkopul"}))).unwrap();
	fs::remove_file(&path).unwrap();
	fs::create_dir(&path).unwrap();
	assert!(memento.update("sio2.apiData", Some(serde_json::json!({"name": "mimuw"}))).is_err());
	assert!(memento.update("sio2.apiData", None).is_err());
	assert_eq!(memento.get("sio2.apiData").unwrap(), Some(serde_json::json!({"name": "szkopul"})));
}

#[test]
fn test_unwritable_directory() {
	let dir = tempfile::tempdir().unwrap();
	fs::write(dir.path().join("blocker"), "").unwrap();
	let memento = FileMemento::open(dir.path().join("blocker").join("state.json")).unwrap();
	assert!(memento.update("sio2.apiSavedUrls", Some(serde_json::json!([]))).is_err());
	assert_eq!(memento.get("sio2.apiSavedUrls").unwrap(), None);
}
