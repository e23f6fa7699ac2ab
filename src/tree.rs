//! Contests, their problems and the user's submissions, displayed as a lazily expanded tree.
//!
//! Nothing is cached. Each expansion asks the judge again, so refreshing the view only requires re-expanding the root.

use crate::{net::from_unijudge_error, Extension};
use evscode::{CollapsibleState, TreeItem, R};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use unijudge::{Contest, Problem, Submission};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
	Contest {
		contest: Contest,
	},
	Problem {
		contest: Arc<Contest>,
		problem: Problem,
	},
	Submission {
		contest: Arc<Contest>,
		problem: Arc<Problem>,
		submission: Submission,
	},
	Error {
		message: String,
		/// Node whose expansion failed, or none for the root.
		parent: Option<Arc<Node>>,
	},
}

/// Children of the node, or of the root if none is given.
/// Failures are displayed in place of the children instead of being returned.
pub async fn children(ext: &Extension, node: Option<&Node>) -> Vec<Node> {
	match fetch_children(ext, node).await {
		Ok(children) => children,
		Err(e) => {
			log::warn!("tree expansion failed, {}", e.human());
			let message = if e.is_cancel() { "Operation cancelled".to_owned() } else { e.human() };
			vec![Node::Error { message, parent: node.cloned().map(Arc::new) }]
		},
	}
}

async fn fetch_children(ext: &Extension, node: Option<&Node>) -> R<Vec<Node>> {
	match node {
		None => {
			let session = ext.session().await?;
			let contests = ext.judge.contests(&session).await.map_err(from_unijudge_error)?;
			Ok(contests.into_iter().map(|contest| Node::Contest { contest }).collect())
		},
		Some(Node::Contest { contest }) => {
			let session = ext.session().await?;
			let problems = ext.judge.contest_problems(&session, &contest.id).await.map_err(from_unijudge_error)?;
			let contest = Arc::new(contest.clone());
			Ok(problems.into_iter().map(|problem| Node::Problem { contest: contest.clone(), problem }).collect())
		},
		Some(Node::Problem { contest, problem }) => {
			let session = ext.session().await?;
			let list = ext.judge.problem_submissions(&session, &contest.id, &problem.short_name).await.map_err(from_unijudge_error)?;
			if list.is_truncated {
				log::info!("submission list of {} in {} is truncated to {} entries", problem.short_name, contest.id, list.submissions.len());
			}
			let problem = Arc::new(problem.clone());
			Ok(list.submissions.into_iter().map(|submission| Node::Submission { contest: contest.clone(), problem: problem.clone(), submission }).collect())
		},
		Some(Node::Submission { .. }) | Some(Node::Error { .. }) => Ok(Vec::new()),
	}
}

pub fn parent(node: &Node) -> Option<Node> {
	match node {
		Node::Contest { .. } => None,
		Node::Problem { contest, .. } => Some(Node::Contest { contest: (**contest).clone() }),
		Node::Submission { contest, problem, .. } => Some(Node::Problem { contest: contest.clone(), problem: (**problem).clone() }),
		Node::Error { parent, .. } => parent.as_ref().map(|parent| (**parent).clone()),
	}
}

/// Presentation of the node; `assets` is the directory containing the score icons.
pub fn tree_item(node: &Node, assets: &str) -> TreeItem {
	match node {
		Node::Contest { contest } => TreeItem::new(&contest.name, CollapsibleState::Collapsed),
		Node::Problem { problem, .. } => {
			TreeItem::new(&problem.full_name, CollapsibleState::Collapsed).description(&problem.short_name).context_value("problem")
		},
		Node::Submission { submission, .. } => {
			let badge = score_badge(submission.score.as_deref(), &submission.status);
			TreeItem::new(format_date(&submission.date), CollapsibleState::None)
				.context_value("submit")
				.icon_path(format!("{}/assets/points/{}.svg", assets.trim_end_matches('/'), badge))
				.resource_uri(format!("submitdecorationprovider://{}", badge))
				.color(badge_color(&badge))
		},
		Node::Error { message, .. } => TreeItem::new(message, CollapsibleState::None).context_value("error"),
	}
}

/// Score rounded to a label that has an icon: `0` to `100`, `ce` for compilation errors and `null` for anything else.
pub fn score_badge(score: Option<&str>, status: &str) -> String {
	match score.and_then(parse_leading_int) {
		Some(points) if (0..=100).contains(&points) => points.to_string(),
		_ if status == "CE" => "ce".to_owned(),
		_ => "null".to_owned(),
	}
}

/// Integer at the start of the text, ignoring leading whitespace and anything after the digits.
fn parse_leading_int(text: &str) -> Option<i64> {
	let text = text.trim_start();
	let (sign, digits) = match text.strip_prefix('-') {
		Some(rest) => (-1, rest),
		None => (1, text.strip_prefix('+').unwrap_or(text)),
	};
	let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
	digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

pub fn badge_color(badge: &str) -> Option<&'static str> {
	match badge {
		"100" => Some("terminal.ansiBrightGreen"),
		"0" => Some("terminal.ansiRed"),
		"null" => None,
		_ => Some("terminal.ansiYellow"),
	}
}

fn format_date(date: &str) -> String {
	match chrono::DateTime::parse_from_rfc3339(date) {
		Ok(date) => date.format("%Y-%m-%d %H:%M:%S").to_string(),
		Err(_) => date.replacen('T', " ", 1).split('.').next().unwrap_or_default().to_owned(),
	}
}

#[test]
fn test_score_badge_in_range() {
	for points in 0..=100 {
		assert_eq!(score_badge(Some(&points.to_string()), "OK"), points.to_string());
		assert_eq!(score_badge(Some(&points.to_string()), "CE"), points.to_string());
	}
}

#[test]
fn test_score_badge_outside() {
	assert_eq!(score_badge(Some("101"), "OK"), "null");
	assert_eq!(score_badge(Some("-1"), "WA"), "null");
	assert_eq!(score_badge(Some("abc"), "CE"), "ce");
	assert_eq!(score_badge(None, "CE"), "ce");
	assert_eq!(score_badge(None, "INI_OK"), "null");
	assert_eq!(score_badge(Some(""), "OK"), "null");
	assert_eq!(score_badge(Some("99999999999999999999999"), "OK"), "null");
}

#[test]
fn test_score_badge_leading_int() {
	assert_eq!(score_badge(Some("  87 pts"), "OK"), "87");
	assert_eq!(score_badge(Some("+5"), "OK"), "5");
	assert_eq!(score_badge(Some("-0"), "OK"), "0");
	assert_eq!(score_badge(Some("42.5"), "OK"), "42");
}

#[test]
fn test_badge_color() {
	assert_eq!(badge_color("100"), Some("terminal.ansiBrightGreen"));
	assert_eq!(badge_color("0"), Some("terminal.ansiRed"));
	assert_eq!(badge_color("null"), None);
	assert_eq!(badge_color("ce"), Some("terminal.ansiYellow"));
	assert_eq!(badge_color("57"), Some("terminal.ansiYellow"));
}

#[test]
fn test_format_date() {
	assert_eq!(format_date("2024-01-01T10:00:00.000Z"), "2024-01-01 10:00:00");
	assert_eq!(format_date("2024-03-05T23:59:01.123456+01:00"), "2024-03-05 23:59:01");
	assert_eq!(format_date("2024-03-05T23:59:01.5 CET"), "2024-03-05 23:59:01");
	assert_eq!(format_date("yesterday"), "yesterday");
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		profiles::Profile, testing::{self, FakeJudge, Reply, ScriptedHost}
	};
	use futures::executor::block_on;
	use unijudge::SubmissionList;

	fn judge() -> FakeJudge {
		FakeJudge {
			contests: vec![Contest { id: "oi31-1".to_owned(), name: "XXXI OI".to_owned() }],
			problems: vec![testing::problem(1, "kon", "Konik"), testing::problem(2, "gra", "Gra")],
			submissions: Some(SubmissionList {
				submissions: vec![Submission { id: 1, score: Some("100".to_owned()), status: "OK".to_owned(), date: "2024-01-01T10:00:00.000Z".to_owned() }],
				is_truncated: false,
			}),
			..FakeJudge::default()
		}
	}

	fn extension(judge: FakeJudge, host: ScriptedHost) -> Extension {
		let ext = Extension::new(Arc::new(host), Arc::new(evscode::MemoryMemento::new()), Arc::new(judge), "/ext", "tests").unwrap();
		block_on(ext.profiles.add(Profile::new("judge1", "https://j1", "abc"))).unwrap();
		block_on(ext.profiles.select(&*ext.host, 0)).unwrap();
		ext
	}

	#[test]
	fn test_expand_all_levels() {
		let ext = extension(judge(), ScriptedHost::new(vec![]));
		let contests = block_on(children(&ext, None));
		assert_eq!(contests.len(), 1);
		assert_eq!(tree_item(&contests[0], "/ext").label, "XXXI OI");
		let problems = block_on(children(&ext, Some(&contests[0])));
		assert_eq!(problems.len(), 2);
		let item = tree_item(&problems[0], "/ext");
		assert_eq!((item.label.as_str(), item.description.as_deref(), item.context_value.as_deref()), ("Konik", Some("kon"), Some("problem")));
		assert_eq!(parent(&problems[1]), Some(contests[0].clone()));
		let submissions = block_on(children(&ext, Some(&problems[0])));
		assert_eq!(submissions.len(), 1);
		let item = tree_item(&submissions[0], "/ext");
		assert_eq!(item.label, "2024-01-01 10:00:00");
		assert_eq!(item.collapsible_state, CollapsibleState::None);
		assert_eq!(item.context_value.as_deref(), Some("submit"));
		assert_eq!(item.icon_path.as_deref(), Some("/ext/assets/points/100.svg"));
		assert_eq!(item.resource_uri.as_deref(), Some("submitdecorationprovider://100"));
		assert_eq!(item.color.as_deref(), Some("terminal.ansiBrightGreen"));
		assert_eq!(parent(&submissions[0]), Some(problems[0].clone()));
		assert!(block_on(children(&ext, Some(&submissions[0]))).is_empty());
	}

	#[test]
	fn test_expansion_refetches() {
		let judge = Arc::new(judge());
		let ext = Extension::new(Arc::new(ScriptedHost::new(vec![])), Arc::new(evscode::MemoryMemento::new()), judge.clone(), "/ext", "tests").unwrap();
		block_on(ext.profiles.add(Profile::new("judge1", "https://j1/", "abc"))).unwrap();
		block_on(ext.profiles.select(&*ext.host, 0)).unwrap();
		let contests = block_on(children(&ext, None));
		block_on(children(&ext, Some(&contests[0])));
		block_on(children(&ext, Some(&contests[0])));
		assert_eq!(judge.requests(), ["contest_list https://j1 abc ", "problem_list https://j1 abc oi31-1", "problem_list https://j1 abc oi31-1"]);
	}

	#[test]
	fn test_failure_becomes_error_node() {
		let ext = extension(FakeJudge { forbidden: Some("problem_list"), ..judge() }, ScriptedHost::new(vec![]));
		let contests = block_on(children(&ext, None));
		let problems = block_on(children(&ext, Some(&contests[0])));
		assert_eq!(problems.len(), 1);
		let item = tree_item(&problems[0], "/ext");
		assert_eq!(item.label, "problem_list failed with status 403: Forbidden");
		assert_eq!(item.context_value.as_deref(), Some("error"));
		assert_eq!(item.collapsible_state, CollapsibleState::None);
		assert_eq!(parent(&problems[0]), Some(contests[0].clone()));
	}

	#[test]
	fn test_no_profile_selected() {
		let ext = Extension::new(
			Arc::new(ScriptedHost::new(vec![Reply::Pick(None)])),
			Arc::new(evscode::MemoryMemento::new()),
			Arc::new(judge()),
			"/ext",
			"tests",
		)
		.unwrap();
		let roots = block_on(children(&ext, None));
		assert_eq!(roots, [Node::Error { message: "No API selected".to_owned(), parent: None }]);
		assert_eq!(parent(&roots[0]), None);
	}

	#[test]
	fn test_node_wire_format() {
		let node = Node::Problem { contest: Arc::new(Contest { id: "c".to_owned(), name: "C".to_owned() }), problem: testing::problem(3, "p", "P") };
		let raw = serde_json::to_value(&node).unwrap();
		assert_eq!(raw["kind"], "problem");
		assert_eq!(raw["contest"]["id"], "c");
		assert_eq!(serde_json::from_value::<Node>(raw).unwrap(), node);
	}
}
