pub extern crate reqwest;
pub extern crate url;

mod error;
pub mod http;
pub mod json;

pub use error::{Error, Result};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Contest {
	pub id: String,
	pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Problem {
	pub id: i64,
	pub short_name: String,
	pub full_name: String,
	pub submissions_limit: i64,
	pub submissions_left: Option<i64>,
	pub round: i64,
	#[serde(default)]
	pub user_result: Option<UserResult>,
	pub can_submit: bool,
	pub statement_extension: Option<StatementExtension>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserResult {
	#[serde(default)]
	pub score: Option<String>,
	/// Judge-specific, passed through untouched.
	#[serde(default)]
	pub status: serde_json::Value,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum StatementExtension {
	#[serde(rename = ".zip")]
	Zip,
	#[serde(rename = ".pdf")]
	Pdf,
	#[serde(rename = ".ps")]
	Ps,
	#[serde(rename = ".html")]
	Html,
	#[serde(rename = ".txt")]
	Txt,
}

impl StatementExtension {
	pub fn as_str(self) -> &'static str {
		match self {
			StatementExtension::Zip => ".zip",
			StatementExtension::Pdf => ".pdf",
			StatementExtension::Ps => ".ps",
			StatementExtension::Html => ".html",
			StatementExtension::Txt => ".txt",
		}
	}
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Submission {
	pub id: i64,
	pub score: Option<String>,
	pub date: String,
	pub status: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SubmissionList {
	pub submissions: Vec<Submission>,
	pub is_truncated: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SubmissionCode {
	#[serde(rename = "lang")]
	pub language: String,
	pub code: String,
}

/// Connection to one judge instance, authorized with a single token.
#[derive(Clone, Debug)]
pub struct Session {
	pub client: http::Client,
	pub site: String,
	pub token: String,
}

impl Session {
	pub fn new(client: http::Client, site: &str, token: &str) -> Session {
		Session { client, site: site.trim_end_matches('/').to_owned(), token: token.to_owned() }
	}

	/// Build an URL on the site from raw path segments, percent-encoding each of them.
	/// An empty last segment produces a trailing slash.
	pub fn url(&self, segments: &[&str]) -> Result<Url> {
		let mut url: Url = self.site.parse()?;
		url.path_segments_mut().map_err(|()| Error::MalformedURL(url::ParseError::RelativeUrlWithCannotBeABaseBase))?.pop_if_empty().extend(segments);
		Ok(url)
	}
}

/// Reject file names the judge would not be able to assign a language to.
pub fn check_filename(filename: &str) -> Result<()> {
	if filename.contains('.') {
		Ok(())
	} else {
		Err(Error::InvalidFilename { filename: filename.to_owned() })
	}
}

#[async_trait]
pub trait Backend: Send+Sync {
	fn name_short(&self) -> &'static str;
	async fn contests(&self, session: &Session) -> Result<Vec<Contest>>;
	async fn contest_problems(&self, session: &Session, contest: &str) -> Result<Vec<Problem>>;
	async fn problem_submissions(&self, session: &Session, contest: &str, problem: &str) -> Result<SubmissionList>;
	async fn submission_code(&self, session: &Session, contest: &str, submission: &str) -> Result<SubmissionCode>;
	/// Link to the human-readable statement; does not contact the judge.
	fn problem_statement_url(&self, session: &Session, contest: &str, problem: &str) -> Result<String>;
	async fn problem_statement(&self, session: &Session, url: &str) -> Result<Vec<u8>>;
	/// Upload a solution, returning the new submission id.
	async fn problem_submit(&self, session: &Session, contest: &str, problem: &str, filename: &str, code: &str) -> Result<String>;
}

#[test]
fn test_session_url() {
	let client = http::Client::new("test").unwrap();
	let session = Session::new(client, "https://szkopul.edu.pl/", "abc");
	assert_eq!(session.site, "https://szkopul.edu.pl");
	assert_eq!(session.url(&["api", "c", "oi31-1", "problem_list", ""]).unwrap().as_str(), "https://szkopul.edu.pl/api/c/oi31-1/problem_list/");
	assert_eq!(session.url(&["api", "contest_list"]).unwrap().as_str(), "https://szkopul.edu.pl/api/contest_list");
	assert_eq!(session.url(&["c", "a b/c", "p", "x"]).unwrap().as_str(), "https://szkopul.edu.pl/c/a%20b%2Fc/p/x");
}

#[test]
fn test_session_url_with_base_path() {
	let client = http::Client::new("test").unwrap();
	let session = Session::new(client, "http://localhost:8000/sio", "");
	assert_eq!(session.url(&["api", "contest_list"]).unwrap().as_str(), "http://localhost:8000/sio/api/contest_list");
}

#[test]
fn test_check_filename() {
	assert!(check_filename("sol.cpp").is_ok());
	assert!(check_filename("a.tar.gz").is_ok());
	assert!(matches!(check_filename("solution"), Err(Error::InvalidFilename { filename }) if filename == "solution"));
}

#[test]
fn test_problem_wire_format() {
	let raw = r#"{
		"id": 7, "short_name": "kon", "full_name": "Konik", "submissions_limit": 50, "submissions_left": null,
		"round": 2, "user_result": {"score": "100", "status": "OK"}, "can_submit": true, "statement_extension": ".pdf"
	}"#;
	let problem: Problem = serde_json::from_str(raw).unwrap();
	assert_eq!(problem.short_name, "kon");
	assert_eq!(problem.submissions_left, None);
	assert_eq!(problem.statement_extension, Some(StatementExtension::Pdf));
	assert_eq!(problem.user_result.unwrap().score.as_deref(), Some("100"));
	let raw = r#"{"id": 8, "short_name": "a", "full_name": "A", "submissions_limit": 0, "submissions_left": 3,
		"round": 1, "user_result": null, "can_submit": false, "statement_extension": null}"#;
	let problem: Problem = serde_json::from_str(raw).unwrap();
	assert_eq!(problem.user_result, None);
	assert_eq!(problem.statement_extension, None);
}

#[test]
fn test_submission_code_wire_format() {
	let code: SubmissionCode = serde_json::from_str(r#"{"lang": "cpp", "code": "int main() {}"}"#).unwrap();
	assert_eq!(code.language, "cpp");
}
