use axum::{
	extract::{Multipart, Path}, http::{header::AUTHORIZATION, HeaderMap, StatusCode}, response::{IntoResponse, Response}, routing::{get, post}, Json, Router
};
use serde_json::json;
use unijudge::{http::Client, Backend, Error, Session};
use unijudge_sio2::Sio2;

const TOKEN: &str = "secret";

fn authorized(headers: &HeaderMap) -> bool {
	headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()) == Some("Token secret")
}

fn forbidden() -> Response {
	(StatusCode::FORBIDDEN, r#"{"detail":"Invalid token."}"#).into_response()
}

async fn contest_list(headers: HeaderMap) -> Response {
	if !authorized(&headers) {
		return forbidden();
	}
	Json(json!([{"id": "oi31-1", "name": "XXXI OI, etap I"}, {"id": "pa2024", "name": "Potyczki Algorytmiczne"}])).into_response()
}

async fn problem_list(headers: HeaderMap, Path(contest): Path<String>) -> Response {
	if !authorized(&headers) {
		return forbidden();
	}
	if contest != "oi 31" {
		return StatusCode::NOT_FOUND.into_response();
	}
	Json(json!([{
		"id": 1,
		"short_name": "kon",
		"full_name": "Konik",
		"submissions_limit": 50,
		"submissions_left": 48,
		"round": 3,
		"user_result": null,
		"can_submit": true,
		"statement_extension": ".pdf",
	}]))
	.into_response()
}

async fn problem_submissions(headers: HeaderMap, Path((_contest, problem)): Path<(String, String)>) -> Response {
	if !authorized(&headers) || problem != "kon" {
		return forbidden();
	}
	Json(json!({
		"submissions": [
			{"id": 12, "score": "100", "date": "2024-01-01T10:00:00.000Z", "status": "OK"},
			{"id": 11, "score": null, "date": "2023-12-31T09:00:00.000Z", "status": "CE"},
		],
		"is_truncated": true,
	}))
	.into_response()
}

async fn submission_code(headers: HeaderMap, Path((_contest, submission)): Path<(String, String)>) -> Response {
	if !authorized(&headers) || submission != "12" {
		return forbidden();
	}
	Json(json!({"lang": "cpp", "code": "int main() {}\n"})).into_response()
}

async fn statement(headers: HeaderMap, Path((_contest, problem)): Path<(String, String)>) -> Response {
	if !authorized(&headers) || problem != "kon" {
		return forbidden();
	}
	vec![0x25u8, 0x50, 0x44, 0x46, 0x00, 0xff].into_response()
}

async fn submit(headers: HeaderMap, Path((_contest, problem)): Path<(String, String)>, mut multipart: Multipart) -> Response {
	if !authorized(&headers) || problem != "kon" {
		return forbidden();
	}
	let Ok(Some(field)) = multipart.next_field().await else {
		return StatusCode::BAD_REQUEST.into_response();
	};
	if field.name() != Some("file") || field.file_name() != Some("kon.cpp") {
		return StatusCode::BAD_REQUEST.into_response();
	}
	match field.text().await {
		Ok(code) if code == "int main() {}\n" => " 4242\n".into_response(),
		_ => StatusCode::BAD_REQUEST.into_response(),
	}
}

async fn serve() -> String {
	let app = Router::new()
		.route("/api/contest_list", get(contest_list))
		.route("/api/c/{contest}/problem_list/", get(problem_list))
		.route("/api/c/{contest}/problem_submissions/{problem}/", get(problem_submissions))
		.route("/api/c/{contest}/problem_submission_code/{submission}/", get(submission_code))
		.route("/api/c/{contest}/submit/{problem}", post(submit))
		.route("/c/{contest}/p/{problem}", get(statement));
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
	format!("http://{}/", addr)
}

fn session(site: &str, token: &str) -> Session {
	Session::new(Client::new("unijudge-sio2 tests").unwrap(), site, token)
}

#[tokio::test]
async fn test_contests() {
	let site = serve().await;
	let contests = Sio2.contests(&session(&site, TOKEN)).await.unwrap();
	assert_eq!(contests.len(), 2);
	assert_eq!(contests[0].id, "oi31-1");
	assert_eq!(contests[1].name, "Potyczki Algorytmiczne");
}

#[tokio::test]
async fn test_contests_without_token() {
	// Nothing listens there, so reaching the network would fail differently.
	let err = Sio2.contests(&session("http://127.0.0.1:9", "")).await.unwrap_err();
	assert!(matches!(err, Error::AuthMissing { site } if site == "http://127.0.0.1:9"));
}

#[tokio::test]
async fn test_wrong_token() {
	let site = serve().await;
	let err = Sio2.contests(&session(&site, "wrong")).await.unwrap_err();
	match err {
		Error::RemoteError { endpoint, status, body } => {
			assert_eq!(endpoint, "contest_list");
			assert_eq!(status, 403);
			assert!(body.contains("Invalid token."));
		},
		e => panic!("unexpected error {:?}", e),
	}
}

#[tokio::test]
async fn test_problems_with_encoded_contest() {
	let site = serve().await;
	let problems = Sio2.contest_problems(&session(&site, TOKEN), "oi 31").await.unwrap();
	assert_eq!(problems.len(), 1);
	assert_eq!(problems[0].short_name, "kon");
	assert_eq!(problems[0].submissions_left, Some(48));
	assert!(problems[0].user_result.is_none());
}

#[tokio::test]
async fn test_submissions() {
	let site = serve().await;
	let list = Sio2.problem_submissions(&session(&site, TOKEN), "oi31-1", "kon").await.unwrap();
	assert!(list.is_truncated);
	assert_eq!(list.submissions[0].score.as_deref(), Some("100"));
	assert_eq!(list.submissions[1].score, None);
	assert_eq!(list.submissions[1].status, "CE");
}

#[tokio::test]
async fn test_submission_code() {
	let site = serve().await;
	let code = Sio2.submission_code(&session(&site, TOKEN), "oi31-1", "12").await.unwrap();
	assert_eq!(code.language, "cpp");
	assert_eq!(code.code, "int main() {}\n");
}

#[tokio::test]
async fn test_statement() {
	let site = serve().await;
	let session = session(&site, TOKEN);
	let url = Sio2.problem_statement_url(&session, "oi31-1", "kon").unwrap();
	assert_eq!(url, format!("{}c/oi31-1/p/kon", site));
	let pdf = Sio2.problem_statement(&session, &url).await.unwrap();
	assert_eq!(pdf, [0x25, 0x50, 0x44, 0x46, 0x00, 0xff]);
}

#[tokio::test]
async fn test_submit() {
	let site = serve().await;
	let id = Sio2.problem_submit(&session(&site, TOKEN), "oi31-1", "kon", "kon.cpp", "int main() {}\n").await.unwrap();
	assert_eq!(id, "4242");
}

#[tokio::test]
async fn test_submit_without_extension() {
	let err = Sio2.problem_submit(&session("http://127.0.0.1:9", TOKEN), "oi31-1", "kon", "solution", "").await.unwrap_err();
	assert!(matches!(err, Error::InvalidFilename { filename } if filename == "solution"));
}
