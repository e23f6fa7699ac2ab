use async_trait::async_trait;
use evscode::{
	host::{DocumentPanel, InputBoxOptions, MessageOptions, QuickPickOptions, QuickPickResponse, TextDocument}, Host, R
};
use std::{
	collections::VecDeque, sync::{Mutex, MutexGuard}
};
use unijudge::{Backend, Contest, Error, Problem, Result, Session, SubmissionCode, SubmissionList};

/// Answer given by the user to the next prompt.
pub enum Reply {
	Input(Option<&'static str>),
	Pick(Option<QuickPickResponse>),
	Message(Option<usize>),
}

/// Host that answers prompts from a script and records everything it was asked to show.
/// Messages are answered only if the next scripted reply is a message, and dismissed otherwise.
pub struct ScriptedHost {
	replies: Mutex<VecDeque<Reply>>,
	input_boxes: Mutex<Vec<InputBoxOptions>>,
	quick_picks: Mutex<Vec<QuickPickOptions>>,
	messages: Mutex<Vec<MessageOptions>>,
	documents: Mutex<Vec<String>>,
	panels: Mutex<Vec<DocumentPanel>>,
	pub active_document: Option<TextDocument>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<T> {
	mutex.lock().unwrap()
}

impl ScriptedHost {
	pub fn new(replies: Vec<Reply>) -> ScriptedHost {
		ScriptedHost {
			replies: Mutex::new(replies.into()),
			input_boxes: Mutex::default(),
			quick_picks: Mutex::default(),
			messages: Mutex::default(),
			documents: Mutex::default(),
			panels: Mutex::default(),
			active_document: None,
		}
	}

	pub fn with_document(mut self, file_name: &str, text: &str) -> ScriptedHost {
		self.active_document = Some(TextDocument { file_name: file_name.to_owned(), text: text.to_owned() });
		self
	}

	pub fn input_boxes(&self) -> Vec<InputBoxOptions> {
		lock(&self.input_boxes).clone()
	}

	pub fn input_titles(&self) -> Vec<String> {
		self.input_boxes().into_iter().map(|options| options.title.unwrap_or_default()).collect()
	}

	pub fn quick_picks(&self) -> Vec<QuickPickOptions> {
		lock(&self.quick_picks).clone()
	}

	pub fn message_options(&self) -> Vec<MessageOptions> {
		lock(&self.messages).clone()
	}

	pub fn messages(&self) -> Vec<String> {
		self.message_options().into_iter().map(|options| options.message).collect()
	}

	pub fn documents(&self) -> Vec<String> {
		lock(&self.documents).clone()
	}

	pub fn panels(&self) -> Vec<DocumentPanel> {
		lock(&self.panels).clone()
	}

	fn next(&self) -> Option<Reply> {
		lock(&self.replies).pop_front()
	}
}

#[async_trait]
impl Host for ScriptedHost {
	async fn input_box(&self, options: InputBoxOptions) -> Option<String> {
		let title = options.title.clone();
		lock(&self.input_boxes).push(options);
		match self.next() {
			Some(Reply::Input(reply)) => reply.map(String::from),
			_ => panic!("unexpected input box {:?}", title),
		}
	}

	async fn quick_pick(&self, options: QuickPickOptions) -> Option<QuickPickResponse> {
		let title = options.title.clone();
		lock(&self.quick_picks).push(options);
		match self.next() {
			Some(Reply::Pick(reply)) => reply,
			_ => panic!("unexpected quick pick {:?}", title),
		}
	}

	async fn message(&self, options: MessageOptions) -> Option<usize> {
		lock(&self.messages).push(options);
		let mut replies = lock(&self.replies);
		match replies.front() {
			Some(Reply::Message(reply)) => {
				let reply = *reply;
				replies.pop_front();
				reply
			},
			_ => None,
		}
	}

	async fn show_text_document(&self, uri: &str, _preview: bool) -> R<()> {
		lock(&self.documents).push(uri.to_owned());
		Ok(())
	}

	async fn show_document_panel(&self, panel: DocumentPanel) -> R<()> {
		lock(&self.panels).push(panel);
		Ok(())
	}

	async fn active_document(&self) -> Option<TextDocument> {
		self.active_document.clone()
	}
}

/// Judge serving fixed data, recording submitted solutions.
#[derive(Default)]
pub struct FakeJudge {
	pub contests: Vec<Contest>,
	pub problems: Vec<Problem>,
	pub submissions: Option<SubmissionList>,
	pub code: Option<SubmissionCode>,
	pub statement: Vec<u8>,
	/// Endpoint that answers with 403 instead of its data.
	pub forbidden: Option<&'static str>,
	pub requests: Mutex<Vec<String>>,
	pub submitted: Mutex<Vec<(String, String, String, String)>>,
}

impl FakeJudge {
	fn request(&self, endpoint: &'static str, session: &Session, args: &[&str]) -> Result<()> {
		lock(&self.requests).push(format!("{} {} {} {}", endpoint, session.site, session.token, args.join(" ")));
		if self.forbidden == Some(endpoint) {
			Err(Error::RemoteError { endpoint, status: 403, body: "Forbidden".to_owned() })
		} else {
			Ok(())
		}
	}

	pub fn requests(&self) -> Vec<String> {
		lock(&self.requests).clone()
	}
}

#[async_trait]
impl Backend for FakeJudge {
	fn name_short(&self) -> &'static str {
		"fake"
	}

	async fn contests(&self, session: &Session) -> Result<Vec<Contest>> {
		if session.token.is_empty() {
			return Err(Error::AuthMissing { site: session.site.clone() });
		}
		self.request("contest_list", session, &[])?;
		Ok(self.contests.clone())
	}

	async fn contest_problems(&self, session: &Session, contest: &str) -> Result<Vec<Problem>> {
		self.request("problem_list", session, &[contest])?;
		Ok(self.problems.clone())
	}

	async fn problem_submissions(&self, session: &Session, contest: &str, problem: &str) -> Result<SubmissionList> {
		self.request("problem_submissions", session, &[contest, problem])?;
		Ok(self.submissions.clone().unwrap_or(SubmissionList { submissions: Vec::new(), is_truncated: false }))
	}

	async fn submission_code(&self, session: &Session, contest: &str, submission: &str) -> Result<SubmissionCode> {
		self.request("problem_submission_code", session, &[contest, submission])?;
		Ok(self.code.clone().unwrap_or(SubmissionCode { language: "txt".to_owned(), code: String::new() }))
	}

	fn problem_statement_url(&self, session: &Session, contest: &str, problem: &str) -> Result<String> {
		Ok(session.url(&["c", contest, "p", problem])?.into())
	}

	async fn problem_statement(&self, session: &Session, url: &str) -> Result<Vec<u8>> {
		self.request("problem_statement", session, &[url])?;
		Ok(self.statement.clone())
	}

	async fn problem_submit(&self, session: &Session, contest: &str, problem: &str, filename: &str, code: &str) -> Result<String> {
		unijudge::check_filename(filename)?;
		self.request("submit", session, &[contest, problem, filename])?;
		let mut submitted = lock(&self.submitted);
		submitted.push((contest.to_owned(), problem.to_owned(), filename.to_owned(), code.to_owned()));
		Ok(format!("{}", 1000 + submitted.len()))
	}
}

pub fn problem(id: i64, short_name: &str, full_name: &str) -> Problem {
	Problem {
		id,
		short_name: short_name.to_owned(),
		full_name: full_name.to_owned(),
		submissions_limit: 50,
		submissions_left: Some(50),
		round: 1,
		user_result: None,
		can_submit: true,
		statement_extension: Some(unijudge::StatementExtension::Pdf),
	}
}
