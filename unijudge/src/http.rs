use crate::{Error, Result};
use reqwest::{
	header::{HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT}, RequestBuilder
};
use url::Url;

/// HTTP client shared by all sessions; cloning is cheap.
#[derive(Clone, Debug)]
pub struct Client {
	inner: reqwest::Client,
}

impl Client {
	pub fn new(user_agent: &str) -> Result<Client> {
		let mut builder = reqwest::Client::builder();
		match HeaderValue::from_str(user_agent) {
			Ok(user_agent) => builder = builder.default_headers([(USER_AGENT, user_agent)].into_iter().collect()),
			Err(_) => log::warn!("user agent {:?} is not a valid header value, using the default one", user_agent),
		}
		Ok(Client { inner: builder.build().map_err(Error::NoTLS)? })
	}

	pub fn get(&self, url: Url, token: &str) -> RequestBuilder {
		authorize(self.inner.get(url), token).header(ACCEPT, "application/json")
	}

	/// Request a raw document, like a statement, without asking for JSON.
	pub fn download(&self, url: Url, token: &str) -> RequestBuilder {
		authorize(self.inner.get(url), token)
	}

	pub fn post(&self, url: Url, token: &str) -> RequestBuilder {
		authorize(self.inner.post(url), token)
	}
}

fn authorize(request: RequestBuilder, token: &str) -> RequestBuilder {
	request.header(AUTHORIZATION, format!("Token {}", token))
}
