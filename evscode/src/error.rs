//! Rich error type, supporting cancellation, backtraces, severity levels and extended logs.
//!
//! It should be used by extensions instead of custom error types, because it distinguishes errors that need to be shown to the user from
//! cancellations and expected workflow failures. Keeping this logic inside Evscode allows to keep error message format consistent across
//! all commands.

use crate::{host::Host, Message};
use backtrace::Backtrace;
use std::fmt;

/// Result type used for errors in Evscode. See [`E`] for details.
pub type R<T> = Result<T, E>;

/// Indication of how serious the error is.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Severity {
	/// Abort the operation, display an error message.
	Error,
	/// Abort the operation, do not display an error message.
	Cancel,
	/// Abort the operation, display an error message, but treat it as an expected part of the workflow.
	Workflow,
}

/// Error type used by Evscode.
///
/// See [module documentation](index.html) for details.
#[derive(Debug)]
pub struct E {
	/// Marks whose fault this error is and how serious is it.
	pub severity: Severity,
	/// List of human-facing error messages, ordered from low-level to high-level.
	pub reasons: Vec<String>,
	/// Stack trace from where the error was converted to [`E`].
	pub backtrace: Backtrace,
	/// List of extended error logs, presumably too long to be displayed to the end user.
	pub extended: Vec<String>,
}

impl E {
	/// Create an error from a user-facing string, capturing a backtrace.
	pub fn error(s: impl AsRef<str>) -> E {
		E {
			severity: Severity::Error,
			reasons: vec![s.as_ref().to_owned()],
			backtrace: Backtrace::new(),
			extended: Vec::new(),
		}
	}

	/// Create an error representing an operation cancelled by user. This error will be logged, but not displayed to the user.
	pub fn cancel() -> E {
		E { severity: Severity::Cancel, reasons: Vec::new(), backtrace: Backtrace::new(), extended: Vec::new() }
	}

	/// Convert an error implementing [`std::error::Error`] to an Evscode error. Error messages will be collected from [`std::fmt::Display`]
	/// implementations on each error in the [`std::error::Error::source`] chain.
	pub fn from_std(native: impl std::error::Error) -> E {
		let mut e = E { severity: Severity::Error, reasons: Vec::new(), backtrace: Backtrace::new(), extended: Vec::new() };
		e.reasons.push(format!("{}", native));
		let mut v: Option<&dyn std::error::Error> = native.source();
		while let Some(native) = v {
			let inner_message = format!("{}", native);
			if !e.reasons.iter().any(|reason| reason.contains(inner_message.as_str())) {
				e.reasons.push(inner_message);
			}
			v = native.source();
		}
		e.reasons.reverse();
		e
	}

	/// A short human-facing representation of the error.
	pub fn human(&self) -> String {
		let mut buf = String::new();
		for (i, reason) in self.reasons.iter().enumerate().rev() {
			buf += reason;
			if i != 0 {
				buf += "; ";
			}
		}
		buf
	}

	/// Add an additional message describing the error, which will be displayed in front of the previous ones.
	/// ```
	/// # use evscode::E;
	/// let e = E::error("DNS timed out").context("network failure").context("failed to fetch contests");
	/// assert_eq!(e.human(), "failed to fetch contests; network failure; DNS timed out");
	/// ```
	pub fn context(mut self, msg: impl AsRef<str>) -> Self {
		self.reasons.push(msg.as_ref().to_owned());
		self
	}

	/// Add an extended error log, which typically is a multiline string, like a raw server response.
	/// The log will be written to the log as a separate entry.
	pub fn extended(mut self, extended: impl AsRef<str>) -> Self {
		self.extended.push(extended.as_ref().to_owned());
		self
	}

	/// Mark the error as something common in extension's workflow, like a missing token or a server refusing a request.
	pub fn workflow_error(mut self) -> Self {
		self.severity = Severity::Workflow;
		self
	}

	/// Check whether the error represents a cancelled operation.
	pub fn is_cancel(&self) -> bool {
		self.severity == Severity::Cancel
	}

	/// Log the error and, unless it is a cancellation, show it to the end user.
	pub async fn emit(self, host: &dyn Host) {
		match self.severity {
			Severity::Cancel => log::info!("operation cancelled ({})", self.human()),
			Severity::Error | Severity::Workflow => {
				log::error!("{}", self.human());
				for extended in &self.extended {
					log::error!("{}", extended);
				}
				if self.severity == Severity::Error {
					log::debug!("{:?}", self.backtrace);
				}
				Message::new::<()>(&self.human()).error().show(host).await;
			},
		}
	}
}

impl fmt::Display for E {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.human())
	}
}

/// An extension trait for terser error handling.
pub trait ResultExt {
	/// The value type of the result.
	type Ok;
	/// Convert the error to [`E`] and add a single context layer.
	fn wrap(self, s: impl AsRef<str>) -> R<Self::Ok>;
}
impl<T, E2: std::error::Error> ResultExt for Result<T, E2> {
	type Ok = T;

	fn wrap(self, s: impl AsRef<str>) -> R<T> {
		self.map_err(|e| E::from_std(e).context(s))
	}
}
impl<T> ResultExt for Option<T> {
	type Ok = T;

	fn wrap(self, s: impl AsRef<str>) -> R<T> {
		self.ok_or_else(|| E::error(s))
	}
}

impl From<std::io::Error> for E {
	fn from(e: std::io::Error) -> Self {
		E::from_std(e)
	}
}

impl From<serde_json::Error> for E {
	fn from(e: serde_json::Error) -> Self {
		E::from_std(e)
	}
}

#[test]
fn test_reasons_order() {
	let e = E::error("connection refused").context("network failure").context("failed to fetch contests");
	assert_eq!(e.human(), "failed to fetch contests; network failure; connection refused");
	assert_eq!(e.to_string(), e.human());
}

#[test]
fn test_from_std_chain() {
	let io = std::io::Error::new(std::io::ErrorKind::NotFound, "state.json missing");
	let e = E::from_std(io).context("failed to load state");
	assert_eq!(e.human(), "failed to load state; state.json missing");
	assert_eq!(e.severity, Severity::Error);
}

#[test]
fn test_cancel() {
	let e = E::cancel();
	assert!(e.is_cancel());
	assert_eq!(e.human(), "");
	assert!(!E::error("x").workflow_error().is_cancel());
}
