use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// The active profile has no token, so the judge would refuse the request anyway.
	#[error("no token provided for {site}")]
	AuthMissing { site: String },
	/// The judge answered with a status other than 200.
	#[error("{endpoint} failed with status {status}: {body}")]
	RemoteError { endpoint: &'static str, status: u16, body: String },
	/// Judges decide the language from the file extension, so a file without one can not be submitted.
	#[error("file {filename:?} must have an extension")]
	InvalidFilename { filename: String },
	#[error("network request failed")]
	NetworkFailure(#[from] reqwest::Error),
	#[error("website link was not a valid URL")]
	MalformedURL(#[from] url::ParseError),
	#[error("unexpected response from {endpoint}")]
	UnexpectedJSON {
		endpoint: &'static str,
		resp_raw: String,
		#[source]
		inner: serde_json::Error,
	},
	#[error("could not find TLS configuration in your operating system")]
	NoTLS(#[source] reqwest::Error),
}
