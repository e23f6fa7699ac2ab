use crate::{net::from_unijudge_error, tree::Node, util, Extension};
use evscode::{Message, R};

pub async fn send(ext: &Extension, node: Option<&Node>) -> R<()> {
	let (contest, problem) = match node {
		Some(Node::Problem { contest, problem }) => (Some(contest.id.clone()), Some(problem.short_name.clone())),
		_ => (None, None),
	};
	let [contest, problem] = util::get_variables(&*ext.host, [(contest, "Provide contest id"), (problem, "Provide problem id")]).await?;
	let session = ext.session().await?;
	let document = match ext.host.active_document().await {
		Some(document) => document,
		None => {
			log::info!("no active text editor, nothing to submit");
			return Ok(());
		},
	};
	let filename = util::file_name(&document.file_name);
	if let Err(unijudge::Error::InvalidFilename { .. }) = unijudge::check_filename(filename) {
		Message::new::<()>("Uploading problem solution failed.\nFile must have an extension.").error().show(&*ext.host).await;
		return Ok(());
	}
	let confirm = format!("Do you want to submit {} as your solution to {}?", filename, problem);
	if Message::new(&confirm).modal().item((), "Submit", false).show(&*ext.host).await.is_none() {
		log::info!("submit of {} to {} declined", filename, problem);
		return Ok(());
	}
	match ext.judge.problem_submit(&session, &contest, &problem, filename, &document.text).await {
		Ok(id) => {
			log::info!("submitted {} to {} in {} as {}", filename, problem, contest, id);
			ext.data_changed.fire(());
			Message::new::<()>(&format!("Problem solution uploaded successfully.\nSubmit ID: {}", id)).show(&*ext.host).await;
			Ok(())
		},
		Err(unijudge::Error::RemoteError { status, body, .. }) => {
			log::error!("submit of {} to {} rejected with status {}", filename, problem, status);
			Message::new::<()>(&format!("Uploading problem solution failed.\n{}", body)).error().show(&*ext.host).await;
			Ok(())
		},
		Err(e) => Err(from_unijudge_error(e)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		profiles::Profile, testing::{self, FakeJudge, Reply, ScriptedHost}
	};
	use evscode::host::MessageKind;
	use futures::executor::block_on;
	use std::sync::Arc;
	use unijudge::Contest;

	fn run(judge: Arc<FakeJudge>, host: ScriptedHost) -> Arc<ScriptedHost> {
		let host = Arc::new(host);
		let ext = Extension::new(host.clone(), Arc::new(evscode::MemoryMemento::new()), judge, "/ext", "tests").unwrap();
		block_on(ext.profiles.add(Profile::new("j", "https://j1", "abc"))).unwrap();
		block_on(ext.profiles.select(&*ext.host, 0)).unwrap();
		let node = Node::Problem { contest: Arc::new(Contest { id: "oi31-1".to_owned(), name: "OI".to_owned() }), problem: testing::problem(1, "kon", "Konik") };
		block_on(send(&ext, Some(&node))).unwrap();
		host
	}

	#[test]
	fn test_submit_confirmed() {
		let judge = Arc::new(FakeJudge::default());
		let host = run(judge.clone(), ScriptedHost::new(vec![Reply::Message(Some(0))]).with_document("/home/kasia/kon.cpp", "int main() {}"));
		let submitted = judge.submitted.lock().unwrap().clone();
		assert_eq!(submitted, [("oi31-1".to_owned(), "kon".to_owned(), "kon.cpp".to_owned(), "int main() {}".to_owned())]);
		let messages = host.message_options();
		assert_eq!(messages[0].message, "Do you want to submit kon.cpp as your solution to kon?");
		assert!(messages[0].modal);
		assert_eq!(messages[0].items[0].title, "Submit");
		assert_eq!(messages[1].message, "Problem solution uploaded successfully.\nSubmit ID: 1001");
	}

	#[test]
	fn test_submit_declined() {
		let judge = Arc::new(FakeJudge::default());
		run(judge.clone(), ScriptedHost::new(vec![Reply::Message(None)]).with_document("/home/kasia/kon.cpp", "int main() {}"));
		assert!(judge.submitted.lock().unwrap().is_empty());
	}

	#[test]
	fn test_submit_without_extension() {
		let judge = Arc::new(FakeJudge::default());
		let host = run(judge.clone(), ScriptedHost::new(vec![]).with_document("/home/kasia/solution", "int main() {}"));
		assert!(judge.requests().is_empty());
		let messages = host.message_options();
		assert_eq!(messages.len(), 1);
		assert_eq!(messages[0].message, "Uploading problem solution failed.\nFile must have an extension.");
		assert_eq!(messages[0].kind, MessageKind::Error);
	}

	#[test]
	fn test_submit_dotted_directory_without_extension() {
		let judge = Arc::new(FakeJudge::default());
		let host = run(judge.clone(), ScriptedHost::new(vec![]).with_document("/home/kasia/oi.31/kon", "int main() {}"));
		assert!(judge.submitted.lock().unwrap().is_empty());
		assert_eq!(host.messages(), ["Uploading problem solution failed.\nFile must have an extension."]);
	}

	#[test]
	fn test_submit_rejected() {
		let judge = Arc::new(FakeJudge { forbidden: Some("submit"), ..FakeJudge::default() });
		let host = run(judge, ScriptedHost::new(vec![Reply::Message(Some(0))]).with_document("kon.py", "print(1)"));
		assert_eq!(host.messages()[1], "Uploading problem solution failed.\nForbidden");
	}

	#[test]
	fn test_submit_without_document() {
		let judge = Arc::new(FakeJudge::default());
		let host = run(judge.clone(), ScriptedHost::new(vec![]));
		assert!(host.messages().is_empty());
		assert!(judge.requests().is_empty());
	}
}
