use crate::Extension;
use evscode::{E, R};
use unijudge::{Error, Session};

impl Extension {
	/// Connect to the judge with the active profile, resolved anew for every request.
	pub async fn session(&self) -> R<Session> {
		let profile = self.profiles.active(&*self.host).await?;
		Ok(Session::new(self.client.clone(), &profile.base_url, &profile.token))
	}
}

pub fn from_unijudge_error(e: Error) -> E {
	match e {
		Error::AuthMissing { site } => E::error(format!("No token provided for {}", site)).workflow_error(),
		e @ Error::RemoteError { .. } | e @ Error::InvalidFilename { .. } => E::from_std(e).workflow_error(),
		Error::UnexpectedJSON { endpoint, resp_raw, inner } => {
			let extended = resp_raw.clone();
			E::from_std(Error::UnexpectedJSON { endpoint, resp_raw, inner }).extended(extended)
		},
		e @ Error::NetworkFailure(_) => E::from_std(e).context("check your internet connection"),
		e => E::from_std(e),
	}
}

#[test]
fn test_auth_missing() {
	let e = from_unijudge_error(Error::AuthMissing { site: "https://szkopul.edu.pl".to_owned() });
	assert_eq!(e.human(), "No token provided for https://szkopul.edu.pl");
	assert_eq!(e.severity, evscode::error::Severity::Workflow);
}

#[test]
fn test_remote_error_keeps_body() {
	let e = from_unijudge_error(Error::RemoteError { endpoint: "submit", status: 400, body: "Too many submissions".to_owned() });
	assert_eq!(e.human(), "submit failed with status 400: Too many submissions");
	assert_eq!(e.severity, evscode::error::Severity::Workflow);
}

#[test]
fn test_unexpected_json_logs_response() {
	let inner = serde_json::from_str::<i64>("<html>").unwrap_err();
	let e = from_unijudge_error(Error::UnexpectedJSON { endpoint: "contest_list", resp_raw: "<html>".to_owned(), inner });
	assert_eq!(e.extended, ["<html>"]);
	assert!(e.human().starts_with("unexpected response from contest_list"));
}
