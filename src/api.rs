// Library facade. Wraps the orchestrator in collect mode: no console
// output, structured results handed back to the caller.
//
// Typical usage:
//
// ```no_run
// use gistctl::api::GistApi;
//
// # fn run() -> gistctl::error::Result<()> {
// let mut api = GistApi::new("secret-key")?;
// let url = api.post(&["notes.md"], false, Some("scratch notes"))?;
// let gists = api.list()?;
// api.delete(&["aa5a315d61ae9438b18d"])?;
// # Ok(())
// # }
// ```

use crate::client::HttpTransport;
use crate::error::Result;
use crate::ops::{Config, Orchestrator};
use crate::render::GistSummary;

/// Client for all gist operations, authenticated with one secret key.
pub struct GistApi {
    inner: Orchestrator<HttpTransport>,
}

impl GistApi {
    /// Build a client for the default host with the given secret key.
    pub fn new(secret_key: impl Into<String>) -> Result<Self> {
        Self::with_config(Config::library(Some(secret_key.into())))
    }

    /// Build a client from explicit configuration, e.g. a different base URL.
    pub fn with_config(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(config.secret_key.clone())?;
        Ok(GistApi { inner: Orchestrator::new(transport, config) })
    }

    /// Download the given gists into id-named directories under the current
    /// working directory. Returns the last response status message.
    pub fn get(&mut self, gist_ids: &[&str]) -> Result<String> {
        self.inner.fetch(&owned(gist_ids))?;
        Ok(self.inner.last_status().to_string())
    }

    /// Create one gist from the given files and return its web URL.
    pub fn post(
        &mut self,
        files: &[&str],
        is_private: bool,
        description: Option<&str>,
    ) -> Result<String> {
        self.inner
            .create(&owned(files), is_private, description.map(str::to_string))
    }

    /// Modify an existing gist; supports the `oldname->newname` rename
    /// syntax per file argument. Returns the response status message.
    pub fn patch(
        &mut self,
        files: &[&str],
        gist_id: &str,
        description: Option<&str>,
    ) -> Result<String> {
        self.inner
            .update(&owned(files), Some(gist_id), description.map(str::to_string))?;
        Ok(self.inner.last_status().to_string())
    }

    /// Delete the given gists sequentially. Returns the response status
    /// message of the last successful deletion.
    pub fn delete(&mut self, gist_ids: &[&str]) -> Result<String> {
        self.inner.delete(&owned(gist_ids))?;
        Ok(self.inner.last_status().to_string())
    }

    /// List all gists of the authenticated user.
    pub fn list(&mut self) -> Result<Vec<GistSummary>> {
        self.inner.list()
    }

    /// List another user's public gists.
    pub fn list_other(&mut self, user_name: &str) -> Result<Vec<GistSummary>> {
        self.inner.list_other(user_name)
    }

    /// Back up every gist of the authenticated user under the fixed backup
    /// directory. Returns the last response status message.
    pub fn backup(&mut self) -> Result<String> {
        self.inner.backup()?;
        Ok(self.inner.last_status().to_string())
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
