use evscode::{error::ResultExt, Host, E, R};
use log::{LevelFilter, Metadata, Record};
use std::io::Write;

const LOG_LEVELS: &[(&str, LevelFilter)] = &[
	("hyper", LevelFilter::Info),
	("mio", LevelFilter::Info),
	("reqwest", LevelFilter::Info),
	("rustls", LevelFilter::Info),
	("want", LevelFilter::Info),
];

/// Install the logger. Records go to stderr, because stdout is reserved for the editor protocol.
pub fn initialize(level: LevelFilter) -> R<()> {
	log::set_boxed_logger(Box::new(Logger { level })).wrap("logging system initialization failed")?;
	log::set_max_level(level);
	Ok(())
}

pub async fn on_error(error: E, host: &dyn Host) {
	error.emit(host).await;
}

struct Logger {
	level: LevelFilter,
}

impl log::Log for Logger {
	fn enabled(&self, metadata: &Metadata) -> bool {
		metadata.level() <= self.level
			&& LOG_LEVELS.iter().all(|(source, filter)| metadata.level() <= *filter || !metadata.target().starts_with(source))
	}

	fn log(&self, record: &Record) {
		if self.enabled(record.metadata()) {
			let _ = writeln!(std::io::stderr().lock(), "[{}] {}: {}", record.level(), record.target(), record.args());
		}
	}

	fn flush(&self) {
		let _ = std::io::stderr().flush();
	}
}

#[test]
fn test_noisy_crates_capped() {
	use log::{Level, Log};
	let logger = Logger { level: LevelFilter::Trace };
	let meta = |level, target| Metadata::builder().level(level).target(target).build();
	assert!(logger.enabled(&meta(Level::Trace, "sio2::tree")));
	assert!(!logger.enabled(&meta(Level::Debug, "hyper::proto::h1")));
	assert!(logger.enabled(&meta(Level::Info, "reqwest::connect")));
	let logger = Logger { level: LevelFilter::Warn };
	assert!(!logger.enabled(&meta(Level::Info, "sio2::profiles")));
}
