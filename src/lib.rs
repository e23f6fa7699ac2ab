//! Browse SIO2 contests, problems and submissions, read statements and submit solutions without leaving the editor.

pub mod config;
pub mod logger;
mod net;
pub mod profiles;
mod statement;
mod submit;
pub mod submit_code;
#[cfg(test)]
mod testing;
pub mod tree;
mod util;

pub use net::from_unijudge_error;
pub use statement::FileData;

use evscode::{error::ResultExt, EventEmitter, Host, Memento, E, R};
use profiles::Profiles;
use std::{str::FromStr, sync::Arc};
use submit_code::SubmitCodeProvider;
use tree::Node;
use unijudge::Backend;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
	SetApiUrl,
	ResetApiUrls,
	RefreshContests,
	UploadProblemSolution,
	OpenProblemContent,
	OpenSubmitCode,
}

impl Command {
	pub const ALL: &'static [Command] = &[
		Command::SetApiUrl,
		Command::ResetApiUrls,
		Command::RefreshContests,
		Command::UploadProblemSolution,
		Command::OpenProblemContent,
		Command::OpenSubmitCode,
	];

	pub fn id(self) -> &'static str {
		match self {
			Command::SetApiUrl => "sio2.setApiUrl",
			Command::ResetApiUrls => "sio2.resetApiUrls",
			Command::RefreshContests => "sio2.refreshContests",
			Command::UploadProblemSolution => "sio2.uploadProblemSolution",
			Command::OpenProblemContent => "sio2.openProblemContent",
			Command::OpenSubmitCode => "sio2.openSubmitCode",
		}
	}
}

impl FromStr for Command {
	type Err = E;

	fn from_str(id: &str) -> R<Command> {
		Command::ALL.iter().copied().find(|command| command.id() == id).wrap(format!("unknown command {:?}", id))
	}
}

/// Everything a running extension owns.
pub struct Extension {
	pub host: Arc<dyn Host>,
	pub profiles: Profiles,
	pub judge: Arc<dyn Backend>,
	pub client: unijudge::http::Client,
	/// Fired whenever the tree should be expanded again from the root.
	pub data_changed: Arc<EventEmitter<()>>,
	pub submit_code: SubmitCodeProvider,
	/// Directory containing the extension's static files.
	pub assets: String,
}

impl Extension {
	pub fn new(host: Arc<dyn Host>, memento: Arc<dyn Memento>, judge: Arc<dyn Backend>, assets: &str, user_agent: &str) -> R<Extension> {
		let client = unijudge::http::Client::new(user_agent).map_err(from_unijudge_error)?;
		let data_changed = Arc::new(EventEmitter::new());
		let profiles = Profiles::new(memento, data_changed.clone());
		log::info!("extension started with {} judge, assets in {}", judge.name_short(), assets);
		Ok(Extension { host, profiles, judge, client, data_changed, submit_code: SubmitCodeProvider::new(), assets: assets.to_owned() })
	}

	/// Connect to SIO2 judges.
	pub fn sio2(host: Arc<dyn Host>, memento: Arc<dyn Memento>, assets: &str, user_agent: &str) -> R<Extension> {
		Extension::new(host, memento, Arc::new(unijudge_sio2::Sio2), assets, user_agent)
	}

	/// Run a command, reporting its failure to the user.
	pub async fn execute(&self, command: Command, node: Option<&Node>) {
		log::debug!("executing {}", command.id());
		if let Err(e) = self.run(command, node).await {
			logger::on_error(e.context(format!("{} failed", command.id())), &*self.host).await;
		}
	}

	async fn run(&self, command: Command, node: Option<&Node>) -> R<()> {
		match command {
			Command::SetApiUrl => self.profiles.pick(&*self.host).await.map(|_| ()),
			Command::ResetApiUrls => self.profiles.reset().await,
			Command::RefreshContests => {
				self.data_changed.fire(());
				Ok(())
			},
			Command::UploadProblemSolution => submit::send(self, node).await,
			Command::OpenProblemContent => statement::open(self, node).await,
			Command::OpenSubmitCode => submit_code::open(self, node).await,
		}
	}

	pub async fn tree_children(&self, node: Option<&Node>) -> Vec<Node> {
		tree::children(self, node).await
	}

	pub fn tree_parent(&self, node: &Node) -> Option<Node> {
		tree::parent(node)
	}

	pub fn tree_item(&self, node: &Node) -> evscode::TreeItem {
		tree::tree_item(node, &self.assets)
	}

	pub fn text_document_content(&self, uri: &str) -> R<String> {
		self.submit_code.provide(uri)
	}
}

#[test]
fn test_command_ids() {
	for command in Command::ALL {
		assert_eq!(command.id().parse::<Command>().unwrap(), *command);
	}
	assert_eq!("sio2.refreshContests".parse::<Command>().unwrap(), Command::RefreshContests);
	assert!("icie.build".parse::<Command>().is_err());
}

#[test]
fn test_failed_command_shows_error() {
	use testing::{FakeJudge, Reply, ScriptedHost};
	let host = Arc::new(ScriptedHost::new(vec![Reply::Pick(None)]));
	let ext = Extension::new(host.clone(), Arc::new(evscode::MemoryMemento::new()), Arc::new(FakeJudge::default()), "/ext", "tests").unwrap();
	futures::executor::block_on(ext.execute(Command::SetApiUrl, None));
	assert_eq!(host.messages(), ["sio2.setApiUrl failed; No API selected"]);
}

#[test]
fn test_cancelled_command_is_silent() {
	use testing::{FakeJudge, Reply, ScriptedHost};
	let accept = evscode::host::QuickPickResponse::Accept { index: 0 };
	let host = Arc::new(ScriptedHost::new(vec![Reply::Pick(Some(accept)), Reply::Input(None)]));
	let ext = Extension::new(host.clone(), Arc::new(evscode::MemoryMemento::new()), Arc::new(FakeJudge::default()), "/ext", "tests").unwrap();
	futures::executor::block_on(ext.execute(Command::SetApiUrl, None));
	assert_eq!(host.input_titles(), ["Enter your API token"]);
	assert!(host.messages().is_empty());
}

#[test]
fn test_refresh_fires_data_changed() {
	use std::sync::atomic::{AtomicBool, Ordering};
	let ext = Extension::new(
		Arc::new(testing::ScriptedHost::new(vec![])),
		Arc::new(evscode::MemoryMemento::new()),
		Arc::new(testing::FakeJudge::default()),
		"/ext",
		"tests",
	)
	.unwrap();
	let fired = Arc::new(AtomicBool::new(false));
	let fired2 = fired.clone();
	ext.data_changed.subscribe(move |_| fired2.store(true, Ordering::SeqCst));
	futures::executor::block_on(ext.execute(Command::RefreshContests, None));
	assert!(fired.load(Ordering::SeqCst));
}
