use async_trait::async_trait;
use unijudge::{
	json, reqwest::multipart::{Form, Part}, url::Url, Backend, Contest, Error, Problem, Result, Session, SubmissionCode, SubmissionList
};

/// Token-authorized REST API of SIO2 instances, like szkopul.edu.pl.
pub struct Sio2;

#[async_trait]
impl Backend for Sio2 {
	fn name_short(&self) -> &'static str {
		"sio2"
	}

	async fn contests(&self, session: &Session) -> Result<Vec<Contest>> {
		if session.token.is_empty() {
			return Err(Error::AuthMissing { site: session.site.clone() });
		}
		let url = session.url(&["api", "contest_list"])?;
		log::debug!("GET {}", url);
		let resp = session.client.get(url, &session.token).send().await?;
		json::from_resp(resp, "contest_list").await
	}

	async fn contest_problems(&self, session: &Session, contest: &str) -> Result<Vec<Problem>> {
		let url = session.url(&["api", "c", contest, "problem_list", ""])?;
		log::debug!("GET {}", url);
		let resp = session.client.get(url, &session.token).send().await?;
		json::from_resp(resp, "problem_list").await
	}

	async fn problem_submissions(&self, session: &Session, contest: &str, problem: &str) -> Result<SubmissionList> {
		let url = session.url(&["api", "c", contest, "problem_submissions", problem, ""])?;
		log::debug!("GET {}", url);
		let resp = session.client.get(url, &session.token).send().await?;
		json::from_resp(resp, "problem_submissions").await
	}

	async fn submission_code(&self, session: &Session, contest: &str, submission: &str) -> Result<SubmissionCode> {
		let url = session.url(&["api", "c", contest, "problem_submission_code", submission, ""])?;
		log::debug!("GET {}", url);
		let resp = session.client.get(url, &session.token).send().await?;
		json::from_resp(resp, "problem_submission_code").await
	}

	fn problem_statement_url(&self, session: &Session, contest: &str, problem: &str) -> Result<String> {
		Ok(session.url(&["c", contest, "p", problem])?.into())
	}

	async fn problem_statement(&self, session: &Session, url: &str) -> Result<Vec<u8>> {
		let url: Url = url.parse()?;
		log::debug!("GET {}", url);
		let resp = session.client.download(url, &session.token).send().await?;
		let resp = json::require_ok(resp, "problem_statement").await?;
		Ok(resp.bytes().await?.to_vec())
	}

	async fn problem_submit(&self, session: &Session, contest: &str, problem: &str, filename: &str, code: &str) -> Result<String> {
		unijudge::check_filename(filename)?;
		let url = session.url(&["api", "c", contest, "submit", problem])?;
		log::debug!("POST {} with {:?}", url, filename);
		let form = Form::new().part("file", Part::bytes(code.as_bytes().to_vec()).file_name(filename.to_owned()));
		let resp = session.client.post(url, &session.token).multipart(form).send().await?;
		let resp = json::require_ok(resp, "submit").await?;
		Ok(resp.text().await?.trim().to_owned())
	}
}
