//! Runs the extension as a child process of a thin editor-side shim.
//!
//! Every line on stdin is an impulse and every line on stdout is a reaction, both JSON objects tagged with `tag`. Requests that need an
//! answer carry an `aid`, which the other side echoes back.

use async_trait::async_trait;
use clap::Parser;
use evscode::{
	error::ResultExt, host::{DocumentPanel, InputBoxOptions, MessageOptions, QuickPickOptions, QuickPickResponse, TextDocument}, FileMemento, Host, TreeItem, E, R
};
use futures::{
	channel::{mpsc, oneshot}, StreamExt
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use sio2::{config::Config, logger, tree::Node, Command, Extension};
use std::{
	collections::HashMap, path::PathBuf, sync::{
		atomic::{AtomicU64, Ordering}, Arc, Mutex
	}
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
	/// Configuration file, created with defaults if missing.
	#[arg(long)]
	config: Option<PathBuf>,
	/// File keeping the saved profiles.
	#[arg(long)]
	state: Option<PathBuf>,
	/// Directory with the extension's static files.
	#[arg(long)]
	assets: Option<PathBuf>,
	#[arg(long)]
	log_level: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
enum Impulse {
	Trigger {
		command: String,
		#[serde(default)]
		node: Option<Node>,
	},
	TreeChildren {
		aid: u64,
		#[serde(default)]
		node: Option<Node>,
	},
	TreeParent {
		aid: u64,
		node: Node,
	},
	TextDocumentContent {
		aid: u64,
		uri: String,
	},
	Response {
		aid: u64,
		#[serde(default)]
		value: Value,
	},
}

#[derive(Debug, Serialize)]
struct Child {
	node: Node,
	item: TreeItem,
}

#[derive(Debug, Serialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
enum Reaction {
	InputBox {
		aid: u64,
		#[serde(flatten)]
		options: InputBoxOptions,
	},
	QuickPick {
		aid: u64,
		#[serde(flatten)]
		options: QuickPickOptions,
	},
	Message {
		aid: u64,
		#[serde(flatten)]
		options: MessageOptions,
	},
	ShowTextDocument {
		aid: u64,
		uri: String,
		preview: bool,
	},
	ShowStatement {
		aid: u64,
		#[serde(flatten)]
		panel: DocumentPanel,
	},
	ActiveDocument {
		aid: u64,
	},
	TreeChildren {
		aid: u64,
		children: Vec<Child>,
	},
	TreeParent {
		aid: u64,
		parent: Option<Node>,
	},
	TextDocumentContent {
		aid: u64,
		content: Option<String>,
		error: Option<String>,
	},
	TreeRefresh,
	TextDocumentChanged {
		uri: String,
	},
}

/// Editor reached through the shim on the other end of stdio.
struct StdioHost {
	reactions: mpsc::UnboundedSender<Reaction>,
	pending: Mutex<HashMap<u64, oneshot::Sender<Value>>>,
	next_aid: AtomicU64,
}

impl StdioHost {
	fn new(reactions: mpsc::UnboundedSender<Reaction>) -> StdioHost {
		StdioHost { reactions, pending: Mutex::new(HashMap::new()), next_aid: AtomicU64::new(1) }
	}

	fn send(&self, reaction: Reaction) {
		if self.reactions.unbounded_send(reaction).is_err() {
			log::error!("reaction dropped, stdout writer has stopped");
		}
	}

	/// Send a reaction and wait until the shim answers it.
	async fn request(&self, reaction: impl FnOnce(u64) -> Reaction) -> Value {
		let aid = self.next_aid.fetch_add(1, Ordering::SeqCst);
		let (tx, rx) = oneshot::channel();
		match self.pending.lock() {
			Ok(mut pending) => {
				pending.insert(aid, tx);
			},
			Err(_) => {
				log::error!("pending request map poisoned, request {} dropped", aid);
				return Value::Null;
			},
		}
		self.send(reaction(aid));
		rx.await.unwrap_or(Value::Null)
	}

	async fn request_as<T: DeserializeOwned+Default>(&self, reaction: impl FnOnce(u64) -> Reaction) -> T {
		let value = self.request(reaction).await;
		serde_json::from_value(value.clone()).unwrap_or_else(|e| {
			log::warn!("unexpected response {}, {}", value, e);
			T::default()
		})
	}

	/// Resolve a request; the shim sends `{"error": "..."}` if it could not fulfil one.
	async fn request_ack(&self, reaction: impl FnOnce(u64) -> Reaction) -> R<()> {
		match self.request(reaction).await {
			Value::Object(object) => match object.get("error").and_then(Value::as_str) {
				Some(error) => Err(E::error(error)),
				None => Ok(()),
			},
			_ => Ok(()),
		}
	}

	fn respond(&self, aid: u64, value: Value) {
		let tx = match self.pending.lock() {
			Ok(mut pending) => pending.remove(&aid),
			Err(_) => None,
		};
		match tx {
			Some(tx) => {
				let _ = tx.send(value);
			},
			None => log::warn!("response to unknown request {}", aid),
		}
	}
}

#[async_trait]
impl Host for StdioHost {
	async fn input_box(&self, options: InputBoxOptions) -> Option<String> {
		self.request_as(|aid| Reaction::InputBox { aid, options }).await
	}

	async fn quick_pick(&self, options: QuickPickOptions) -> Option<QuickPickResponse> {
		self.request_as(|aid| Reaction::QuickPick { aid, options }).await
	}

	async fn message(&self, options: MessageOptions) -> Option<usize> {
		self.request_as(|aid| Reaction::Message { aid, options }).await
	}

	async fn show_text_document(&self, uri: &str, preview: bool) -> R<()> {
		self.request_ack(|aid| Reaction::ShowTextDocument { aid, uri: uri.to_owned(), preview }).await
	}

	async fn show_document_panel(&self, panel: DocumentPanel) -> R<()> {
		self.request_ack(|aid| Reaction::ShowStatement { aid, panel }).await
	}

	async fn active_document(&self) -> Option<TextDocument> {
		self.request_as(|aid| Reaction::ActiveDocument { aid }).await
	}
}

fn handle(ext: &Arc<Extension>, host: &Arc<StdioHost>, impulse: Impulse) {
	match impulse {
		Impulse::Response { aid, value } => host.respond(aid, value),
		Impulse::Trigger { command, node } => match command.parse::<Command>() {
			Ok(command) => {
				let ext = ext.clone();
				tokio::spawn(async move { ext.execute(command, node.as_ref()).await });
			},
			Err(e) => log::error!("{}", e.human()),
		},
		Impulse::TreeChildren { aid, node } => {
			let ext = ext.clone();
			let host = host.clone();
			tokio::spawn(async move {
				let children = ext.tree_children(node.as_ref()).await.into_iter().map(|node| Child { item: ext.tree_item(&node), node }).collect();
				host.send(Reaction::TreeChildren { aid, children });
			});
		},
		Impulse::TreeParent { aid, node } => host.send(Reaction::TreeParent { aid, parent: ext.tree_parent(&node) }),
		Impulse::TextDocumentContent { aid, uri } => {
			let reaction = match ext.text_document_content(&uri) {
				Ok(content) => Reaction::TextDocumentContent { aid, content: Some(content), error: None },
				Err(e) => {
					log::error!("{}", e.human());
					Reaction::TextDocumentContent { aid, content: None, error: Some(e.human()) }
				},
			};
			host.send(reaction);
		},
	}
}

async fn write_reactions(mut reactions: mpsc::UnboundedReceiver<Reaction>) -> R<()> {
	let mut stdout = tokio::io::stdout();
	while let Some(reaction) = reactions.next().await {
		let mut line = serde_json::to_string(&reaction)?;
		line.push('\n');
		stdout.write_all(line.as_bytes()).await.wrap("failed to write reaction")?;
		stdout.flush().await.wrap("failed to flush stdout")?;
	}
	Ok(())
}

async fn run(args: Args) -> R<()> {
	let mut config = Config::load_or_create(args.config.as_deref())?;
	if let Some(state) = args.state {
		config.state_path = state;
	}
	if let Some(assets) = args.assets {
		config.assets_dir = assets;
	}
	if let Some(log_level) = args.log_level {
		config.log_level = log_level;
	}
	logger::initialize(config.log_level()?)?;
	let (tx, rx) = mpsc::unbounded();
	let host = Arc::new(StdioHost::new(tx));
	let memento = Arc::new(FileMemento::open(&config.state_path)?);
	let assets = config.assets_dir.to_str().wrap("assets directory path is not valid UTF-8")?;
	let ext = Arc::new(Extension::sio2(host.clone(), memento, assets, &config.user_agent)?);
	let refresh_host = host.clone();
	ext.data_changed.subscribe(move |_| refresh_host.send(Reaction::TreeRefresh));
	let changed_host = host.clone();
	ext.submit_code.on_did_change().subscribe(move |uri: &String| changed_host.send(Reaction::TextDocumentChanged { uri: uri.clone() }));
	tokio::spawn(async move {
		if let Err(e) = write_reactions(rx).await {
			log::error!("{}", e.human());
		}
	});
	let mut lines = BufReader::new(tokio::io::stdin()).lines();
	while let Some(line) = lines.next_line().await.wrap("failed to read impulse")? {
		if line.trim().is_empty() {
			continue;
		}
		match serde_json::from_str::<Impulse>(&line) {
			Ok(impulse) => handle(&ext, &host, impulse),
			Err(e) => log::error!("invalid impulse {:?}, {}", line, e),
		}
	}
	log::info!("stdin closed, exiting");
	Ok(())
}

#[tokio::main]
async fn main() {
	if let Err(e) = run(Args::parse()).await {
		eprintln!("sio2-stdio: {}", e.human());
		std::process::exit(1);
	}
}

#[test]
fn test_parse_impulses() {
	let impulse: Impulse = serde_json::from_str(r#"{"tag": "trigger", "command": "sio2.refreshContests"}"#).unwrap();
	assert!(matches!(impulse, Impulse::Trigger { command, node: None } if command == "sio2.refreshContests"));
	let impulse: Impulse = serde_json::from_str(r#"{"tag": "tree_children", "aid": 3, "node": {"kind": "contest", "contest": {"id": "c", "name": "C"}}}"#).unwrap();
	assert!(matches!(impulse, Impulse::TreeChildren { aid: 3, node: Some(Node::Contest { .. }) }));
	let impulse: Impulse = serde_json::from_str(r#"{"tag": "response", "aid": 7, "value": {"type": "button", "index": 0, "button": 1}}"#).unwrap();
	match impulse {
		Impulse::Response { aid, value } => {
			assert_eq!(aid, 7);
			assert_eq!(serde_json::from_value::<QuickPickResponse>(value).unwrap(), QuickPickResponse::Button { index: 0, button: 1 });
		},
		impulse => panic!("unexpected impulse {:?}", impulse),
	}
	assert!(serde_json::from_str::<Impulse>(r#"{"tag": "trigger_build"}"#).is_err());
}

#[test]
fn test_reaction_shape() {
	let reaction = Reaction::InputBox { aid: 1, options: InputBoxOptions { title: Some("Provide contest id".to_owned()), ..InputBoxOptions::default() } };
	let raw = serde_json::to_value(&reaction).unwrap();
	assert_eq!(raw["tag"], "input_box");
	assert_eq!(raw["aid"], 1);
	assert_eq!(raw["title"], "Provide contest id");
	assert_eq!(raw["ignoreFocusOut"], false);
	assert_eq!(serde_json::to_value(&Reaction::TreeRefresh).unwrap(), serde_json::json!({"tag": "tree_refresh"}));
}

#[test]
fn test_request_round_trip() {
	let (tx, mut rx) = mpsc::unbounded();
	let host = StdioHost::new(tx);
	let (answer, ()) = futures::executor::block_on(futures::future::join(host.input_box(InputBoxOptions::default()), async {
		match rx.next().await {
			Some(Reaction::InputBox { aid, .. }) => host.respond(aid, serde_json::json!("szkopul")),
			reaction => panic!("unexpected reaction {:?}", reaction),
		}
	}));
	assert_eq!(answer.as_deref(), Some("szkopul"));
}

#[test]
fn test_dismissed_request() {
	let (tx, mut rx) = mpsc::unbounded();
	let host = StdioHost::new(tx);
	let (answer, ()) = futures::executor::block_on(futures::future::join(host.message(MessageOptions {
		message: "Name is required".to_owned(),
		kind: evscode::host::MessageKind::Error,
		modal: false,
		items: Vec::new(),
	}), async {
		match rx.next().await {
			Some(Reaction::Message { aid, .. }) => host.respond(aid, Value::Null),
			reaction => panic!("unexpected reaction {:?}", reaction),
		}
	}));
	assert_eq!(answer, None);
}
