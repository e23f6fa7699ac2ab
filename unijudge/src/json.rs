use crate::{Error, Result};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

/// Fail with [`Error::RemoteError`] unless the judge answered with 200 OK.
pub async fn require_ok(resp: Response, endpoint: &'static str) -> Result<Response> {
	let status = resp.status();
	if status == StatusCode::OK {
		Ok(resp)
	} else {
		let body = resp.text().await.unwrap_or_default();
		log::debug!("{} answered {}: {:?}", endpoint, status, body);
		Err(Error::RemoteError { endpoint, status: status.as_u16(), body })
	}
}

pub async fn from_resp<T: DeserializeOwned>(resp: Response, endpoint: &'static str) -> Result<T> {
	let resp = require_ok(resp, endpoint).await?;
	let resp_raw = resp.text().await?;
	from_str(&resp_raw, endpoint)
}

pub fn from_str<T: DeserializeOwned>(resp_raw: &str, endpoint: &'static str) -> Result<T> {
	serde_json::from_str(resp_raw).map_err(|inner| Error::UnexpectedJSON { endpoint, resp_raw: resp_raw.to_owned(), inner })
}

#[test]
fn test_from_str_keeps_raw_response() {
	let err = from_str::<Vec<i64>>("<html>502 Bad Gateway</html>", "contest_list").unwrap_err();
	match err {
		Error::UnexpectedJSON { endpoint, resp_raw, .. } => {
			assert_eq!(endpoint, "contest_list");
			assert_eq!(resp_raw, "<html>502 Bad Gateway</html>");
		},
		e => panic!("unexpected error {:?}", e),
	}
}
