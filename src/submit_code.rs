//! Read-only documents showing the source code of past submissions.
//!
//! The code travels inside the document URI, so the editor can reopen the document without asking the judge again.

use crate::{net::from_unijudge_error, tree::Node, util, Extension};
use evscode::{EventEmitter, E, R};

pub const SCHEME: &str = "sio2-submit-code";

/// Content provider for the [`SCHEME`] URIs.
pub struct SubmitCodeProvider {
	on_did_change: EventEmitter<String>,
}

impl SubmitCodeProvider {
	pub fn new() -> SubmitCodeProvider {
		SubmitCodeProvider { on_did_change: EventEmitter::new() }
	}

	/// Fired with the URI of every document whose contents may have changed.
	pub fn on_did_change(&self) -> &EventEmitter<String> {
		&self.on_did_change
	}

	pub fn update(&self, uri: &str) {
		self.on_did_change.fire(uri.to_owned());
	}

	pub fn provide(&self, uri: &str) -> R<String> {
		decode(uri)
	}
}

impl Default for SubmitCodeProvider {
	fn default() -> Self {
		SubmitCodeProvider::new()
	}
}

pub fn encode(submission: &str, filename: &str, language: &str, code: &str) -> String {
	format!(
		"{}:/{}/{}?code={}",
		SCHEME,
		urlencoding::encode(submission),
		urlencoding::encode(&format!("{}.{}", filename, language)),
		urlencoding::encode(code)
	)
}

pub fn decode(uri: &str) -> R<String> {
	let query = uri.split_once('?').map(|(_, query)| query).ok_or_else(|| E::error(format!("document {} has no query", uri)))?;
	let raw = query
		.split('&')
		.find_map(|pair| pair.strip_prefix("code="))
		.ok_or_else(|| E::error(format!("document {} does not contain any code", uri)))?;
	match urlencoding::decode(raw) {
		Ok(code) => Ok(code.into_owned()),
		Err(e) => Err(E::from_std(e).context(format!("document {} is not valid UTF-8", uri))),
	}
}

pub async fn open(ext: &Extension, node: Option<&Node>) -> R<()> {
	let (contest, submission, filename) = match node {
		Some(Node::Submission { contest, problem, submission }) => (Some(contest.id.clone()), Some(submission.id.to_string()), Some(problem.short_name.clone())),
		_ => (None, None, None),
	};
	let [contest, submission, filename] = util::get_variables(
		&*ext.host,
		[(contest, "Provide contest id"), (submission, "Provide submit id"), (filename, "Provide filename")],
	)
	.await?;
	let session = ext.session().await?;
	let code = ext.judge.submission_code(&session, &contest, &submission).await.map_err(from_unijudge_error)?;
	let uri = encode(&submission, &filename, &code.language, &code.code);
	log::debug!("opening submission {} from {} as {}", submission, contest, uri.split('?').next().unwrap_or_default());
	ext.submit_code.update(&uri);
	ext.host.show_text_document(&uri, false).await
}

#[test]
fn test_code_survives_uri() {
	let codes = [
		"",
		"int main() { return 0; }\n",
		"a&b=c?d+e%20f#g",
		"  \t\r\n  ",
		"zażółć gęślą jaźń 🦀",
		"code=1&code=2",
		"100%",
	];
	for code in codes {
		let uri = encode("12", "kon", "cpp", code);
		assert_eq!(decode(&uri).unwrap(), code);
	}
}

#[test]
fn test_uri_shape() {
	assert_eq!(encode("12", "kon", "cpp", "x y"), "sio2-submit-code:/12/kon.cpp?code=x%20y");
}

#[test]
fn test_decode_without_code() {
	assert!(decode("sio2-submit-code:/12/kon.cpp").is_err());
	assert!(decode("sio2-submit-code:/12/kon.cpp?lang=cpp").is_err());
}

#[test]
fn test_provider_announces_updates() {
	use std::sync::{Arc, Mutex};
	let provider = SubmitCodeProvider::new();
	let seen = Arc::new(Mutex::new(Vec::new()));
	let seen2 = seen.clone();
	provider.on_did_change().subscribe(move |uri: &String| seen2.lock().unwrap().push(uri.clone()));
	let uri = encode("1", "a", "py", "print(1)");
	provider.update(&uri);
	assert_eq!(*seen.lock().unwrap(), [uri.clone()]);
	assert_eq!(provider.provide(&uri).unwrap(), "print(1)");
}

#[test]
fn test_open_from_submission_node() {
	use crate::testing::{self, FakeJudge, ScriptedHost};
	use std::sync::Arc;
	use unijudge::{Contest, Submission, SubmissionCode};
	let judge = FakeJudge { code: Some(SubmissionCode { language: "cpp".to_owned(), code: "int main() {}".to_owned() }), ..FakeJudge::default() };
	let host = Arc::new(ScriptedHost::new(vec![]));
	let ext = Extension::new(host.clone(), Arc::new(evscode::MemoryMemento::new()), Arc::new(judge), "/ext", "tests").unwrap();
	futures::executor::block_on(ext.profiles.add(crate::profiles::Profile::new("j", "https://j1", "abc"))).unwrap();
	futures::executor::block_on(ext.profiles.select(&*host, 0)).unwrap();
	let node = Node::Submission {
		contest: Arc::new(Contest { id: "oi31-1".to_owned(), name: "OI".to_owned() }),
		problem: Arc::new(testing::problem(1, "kon", "Konik")),
		submission: Submission { id: 77, score: None, date: String::new(), status: "CE".to_owned() },
	};
	futures::executor::block_on(open(&ext, Some(&node))).unwrap();
	assert_eq!(host.documents(), ["sio2-submit-code:/77/kon.cpp?code=int%20main%28%29%20%7B%7D"]);
	assert!(host.input_boxes().is_empty());
}
