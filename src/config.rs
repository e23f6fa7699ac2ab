use evscode::{error::ResultExt, E, R};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
	fs, path::{Path, PathBuf}
};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	/// File keeping the saved profiles and the active one.
	pub state_path: PathBuf,
	/// Directory containing `assets/points/*.svg` and `media/pdf.worker.min.js`.
	pub assets_dir: PathBuf,
	pub log_level: String,
	pub user_agent: String,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			state_path: config_dir().join("state.json"),
			assets_dir: PathBuf::from("."),
			log_level: "info".to_owned(),
			user_agent: format!("sio2/{} (+https://github.com/pustaczek/icie)", env!("CARGO_PKG_VERSION")),
		}
	}
}

impl Config {
	/// Load the configuration, writing the default one first if the file does not exist yet.
	pub fn load_or_create(path: Option<&Path>) -> R<Config> {
		let path = match path {
			Some(path) => path.to_owned(),
			None => default_path(),
		};
		if !path.exists() {
			log::info!("creating default configuration at {}", path.display());
			if let Some(parent) = path.parent() {
				fs::create_dir_all(parent).wrap(format!("failed to create directory {}", parent.display()))?;
			}
			fs::write(&path, serde_json::to_string_pretty(&Config::default())?).wrap(format!("failed to write {}", path.display()))?;
		}
		let raw = fs::read_to_string(&path).wrap(format!("failed to read {}", path.display()))?;
		let config: Config = serde_json::from_str(&raw).map_err(|e| malformed(&path, E::from_std(e)))?;
		config.log_level().map_err(|e| malformed(&path, e))?;
		Ok(config)
	}

	pub fn log_level(&self) -> R<LevelFilter> {
		self.log_level.parse().map_err(|_| E::error(format!("unknown log level {:?}", self.log_level)))
	}
}

fn malformed(path: &Path, e: E) -> E {
	e.context(format!("configuration file {} is malformed", path.display())).workflow_error()
}

fn config_dir() -> PathBuf {
	dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("sio2")
}

pub fn default_path() -> PathBuf {
	config_dir().join("config.json")
}

#[test]
fn test_create_default() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("sio2").join("config.json");
	let config = Config::load_or_create(Some(&path)).unwrap();
	assert!(path.exists());
	assert_eq!(config, Config::default());
	assert_eq!(config.log_level().unwrap(), LevelFilter::Info);
}

#[test]
fn test_partial_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("config.json");
	fs::write(&path, r#"{"log_level": "debug", "assets_dir": "/opt/sio2"}"#).unwrap();
	let config = Config::load_or_create(Some(&path)).unwrap();
	assert_eq!(config.log_level().unwrap(), LevelFilter::Debug);
	assert_eq!(config.assets_dir, PathBuf::from("/opt/sio2"));
	assert_eq!(config.user_agent, Config::default().user_agent);
}

#[test]
fn test_unknown_log_level() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("config.json");
	fs::write(&path, r#"{"log_level": "loud"}"#).unwrap();
	let err = Config::load_or_create(Some(&path)).unwrap_err();
	assert!(err.human().contains("is malformed"));
	assert!(err.human().contains("unknown log level"));
}
