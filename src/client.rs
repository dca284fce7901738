// HTTP gateway: a small blocking transport that issues one request per call.
// Kept behind the `Transport` trait so the orchestrator can be exercised
// against a recording fake in tests.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

use crate::error::{GistError, Result};

/// HTTP verbs the gist API is driven with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Patch,
    Delete,
}

/// One request, built fresh per orchestrator call and never reused.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub verb: Verb,
    pub url: String,
    /// Attach the `Authorization` header. Public listings and raw-content
    /// fetches go out unauthenticated.
    pub authenticated: bool,
    pub payload: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(verb: Verb, url: impl Into<String>) -> Self {
        ApiRequest { verb, url: url.into(), authenticated: true, payload: None }
    }

    pub fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Raw response: the status code plus the undecoded body text. Status
/// classification and JSON decoding happen in the orchestrator, which knows
/// the expected shape per endpoint.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Seam between the orchestrator and the network.
pub trait Transport {
    /// Issue one API request and return the raw response. Transport-level
    /// failures map to [`GistError::Connectivity`]; there are no retries.
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;

    /// Fetch a raw-content URL without headers, returning the body text.
    fn fetch_raw(&self, url: &str) -> Result<String>;
}

/// Blocking transport that holds a reqwest client, the API base URL and an
/// optional secret key for authenticated calls.
pub struct HttpTransport {
    client: Client,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(GistError::Connectivity)?;
        Ok(HttpTransport { client, token })
    }

    fn headers(&self, authenticated: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        if authenticated {
            if let Some(token) = &self.token {
                let value = format!("token {token}");
                if let Ok(value) = HeaderValue::from_str(&value) {
                    headers.insert(AUTHORIZATION, value);
                }
            }
        }
        headers
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let builder = match request.verb {
            Verb::Get => self.client.get(&request.url),
            Verb::Post => self.client.post(&request.url),
            Verb::Patch => self.client.patch(&request.url),
            Verb::Delete => self.client.delete(&request.url),
        };
        let mut builder = builder.headers(self.headers(request.authenticated));
        if let Some(payload) = &request.payload {
            builder = builder.json(payload);
        }
        let response = builder.send().map_err(GistError::Connectivity)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(GistError::Connectivity)?;
        Ok(ApiResponse { status, body })
    }

    fn fetch_raw(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(GistError::Connectivity)?;
        response.text().map_err(GistError::Connectivity)
    }
}
