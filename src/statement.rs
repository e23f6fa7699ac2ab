use crate::{net::from_unijudge_error, tree::Node, util, Extension};
use base64::{engine::general_purpose::STANDARD, Engine};
use evscode::{host::DocumentPanel, E, R};
use unijudge::StatementExtension;

/// Document contents, in whichever form they were obtained.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FileData {
	Base64(String),
	Bytes(Vec<u8>),
}

impl FileData {
	pub fn to_base64(&self) -> String {
		match self {
			FileData::Base64(data) => data.clone(),
			FileData::Bytes(data) => STANDARD.encode(data),
		}
	}

	pub fn to_bytes(&self) -> R<Vec<u8>> {
		match self {
			FileData::Base64(data) => STANDARD.decode(data).map_err(|e| E::from_std(e).context("statement data is not valid base64")),
			FileData::Bytes(data) => Ok(data.clone()),
		}
	}
}

pub async fn open(ext: &Extension, node: Option<&Node>) -> R<()> {
	let (contest, problem, extension) = match node {
		Some(Node::Problem { contest, problem }) => (Some(contest.id.clone()), Some(problem.short_name.clone()), problem.statement_extension),
		_ => (None, None, None),
	};
	let [contest, problem] = util::get_variables(&*ext.host, [(contest, "Provide contest id"), (problem, "Provide problem id")]).await?;
	let session = ext.session().await?;
	let url = ext.judge.problem_statement_url(&session, &contest, &problem).map_err(from_unijudge_error)?;
	log::debug!("downloading statement of {} from {}", problem, url);
	let data = FileData::Bytes(ext.judge.problem_statement(&session, &url).await.map_err(from_unijudge_error)?);
	ext.host.show_document_panel(panel(&ext.assets, &problem, extension, &data)).await
}

fn panel(assets: &str, problem: &str, extension: Option<StatementExtension>, data: &FileData) -> DocumentPanel {
	DocumentPanel {
		view_type: problem.to_owned(),
		title: format!("{}{}", problem, extension.map_or(".pdf", StatementExtension::as_str)),
		data: data.to_base64(),
		worker_uri: format!("{}/media/pdf.worker.min.js", assets.trim_end_matches('/')),
	}
}

#[test]
fn test_base64_exact() {
	let inputs: [&[u8]; 5] = [b"", b"%PDF-1.7", &[0, 255, 128, 1, 2], &[0xfb, 0xff], &[7; 1000]];
	for bytes in inputs {
		let encoded = FileData::Bytes(bytes.to_vec()).to_base64();
		assert_eq!(FileData::Base64(encoded).to_bytes().unwrap(), bytes);
	}
	assert_eq!(FileData::Bytes(vec![0xfb, 0xff]).to_base64(), "+/8=");
	assert!(FileData::Base64("not base64!".to_owned()).to_bytes().is_err());
}

#[test]
fn test_panel() {
	let pdf = panel("/ext/", "kon", None, &FileData::Bytes(b"%PDF".to_vec()));
	assert_eq!(pdf.view_type, "kon");
	assert_eq!(pdf.title, "kon.pdf");
	assert_eq!(pdf.data, "JVBERg==");
	assert_eq!(pdf.worker_uri, "/ext/media/pdf.worker.min.js");
	let html = panel("/ext", "gra", Some(StatementExtension::Html), &FileData::Base64("PGgxPg==".to_owned()));
	assert_eq!(html.title, "gra.html");
	assert_eq!(html.data, "PGgxPg==");
}

#[test]
fn test_open_prompts_without_node() {
	use crate::testing::{FakeJudge, Reply, ScriptedHost};
	use std::sync::Arc;
	let judge = Arc::new(FakeJudge { statement: b"%PDF".to_vec(), ..FakeJudge::default() });
	let host = Arc::new(ScriptedHost::new(vec![Reply::Input(Some("oi31-1")), Reply::Input(Some("kon"))]));
	let ext = Extension::new(host.clone(), Arc::new(evscode::MemoryMemento::new()), judge.clone(), "/ext", "tests").unwrap();
	futures::executor::block_on(ext.profiles.add(crate::profiles::Profile::new("j", "https://j1", "abc"))).unwrap();
	futures::executor::block_on(ext.profiles.select(&*host, 0)).unwrap();
	futures::executor::block_on(open(&ext, None)).unwrap();
	assert_eq!(host.input_titles(), ["Provide contest id", "Provide problem id"]);
	assert_eq!(judge.requests(), ["problem_statement https://j1 abc https://j1/c/oi31-1/p/kon"]);
	let panels = host.panels();
	assert_eq!(panels[0].title, "kon.pdf");
	assert_eq!(panels[0].data, "JVBERg==");
}
