// Operation orchestrator. Maps the seven user-facing operations onto API
// requests, composing the filename validator, directory handler and HTTP
// gateway. One orchestrator exists per invocation; every request is built
// fresh, nothing is shared across calls.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use crate::client::{ApiRequest, Transport, Verb};
use crate::error::{GistError, Result};
use crate::files::{acceptable_filename, open_in_editor, GistDir};
use crate::model::{CreateResponse, FilePatch, Gist, GistPayload};
use crate::render::{GistSummary, Presenter, Reporter};
use crate::status;

/// Default API root of the gist host.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Name of the fixed top-level directory bulk backups land in.
pub const BACKUP_DIR: &str = "GIST-BACKUP";

/// Configuration handed to the orchestrator at construction time. There is
/// no ambient global; the CLI edge resolves the environment variable before
/// building this.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub secret_key: Option<String>,
    /// Console mode: render listings and log progress to the terminal.
    /// Library callers leave this off and get structured results instead.
    pub interactive: bool,
}

impl Config {
    pub fn cli(secret_key: Option<String>, interactive: bool) -> Self {
        Config { base_url: DEFAULT_BASE_URL.to_string(), secret_key, interactive }
    }

    pub fn library(secret_key: Option<String>) -> Self {
        Config { base_url: DEFAULT_BASE_URL.to_string(), secret_key, interactive: false }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// The user-facing operations, dispatched exhaustively in [`Orchestrator::execute`].
#[derive(Debug, Clone)]
pub enum Operation {
    Create { files: Vec<String>, private: bool, description: Option<String> },
    Update { files: Vec<String>, gist_id: Option<String>, description: Option<String> },
    Fetch { ids: Vec<String> },
    Delete { ids: Vec<String> },
    List,
    ListOther { user: String },
    Backup,
}

pub struct Orchestrator<T: Transport> {
    transport: T,
    config: Config,
    reporter: Reporter,
    last_status: String,
}

impl<T: Transport> Orchestrator<T> {
    pub fn new(transport: T, config: Config) -> Self {
        let reporter = Reporter::new(config.interactive);
        Orchestrator { transport, config, reporter, last_status: String::new() }
    }

    /// Status message of the last successful API response.
    pub fn last_status(&self) -> &str {
        &self.last_status
    }

    /// Top-level entry point for the CLI: executes the operation, logs a
    /// diagnostic for any failure and converts it to an exit code. Never
    /// propagates an error upward.
    pub fn run(&mut self, operation: Operation) -> ExitCode {
        match self.execute(operation) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err @ (GistError::UnexpectedStatus(_) | GistError::Json(_))) => {
                self.reporter.error(&format!(
                    "an internal error has occurred: {err}. please open an issue if you think this is a bug"
                ));
                ExitCode::FAILURE
            }
            Err(err) => {
                self.reporter.error(&format!("an error has occurred: {err}"));
                ExitCode::FAILURE
            }
        }
    }

    pub fn execute(&mut self, operation: Operation) -> Result<()> {
        match operation {
            Operation::Create { files, private, description } => {
                self.create(&files, private, description).map(drop)
            }
            Operation::Update { files, gist_id, description } => {
                self.update(&files, gist_id.as_deref(), description)
            }
            Operation::Fetch { ids } => self.fetch(&ids),
            Operation::Delete { ids } => self.delete(&ids),
            Operation::List => self.list().map(drop),
            Operation::ListOther { user } => self.list_other(&user).map(drop),
            Operation::Backup => self.backup(),
        }
    }

    fn gists_url(&self) -> String {
        format!("{}/gists", self.config.base_url)
    }

    fn gist_url(&self, id: &str) -> String {
        format!("{}/gists/{id}", self.config.base_url)
    }

    /// Send one request and classify the status; error statuses raise here.
    fn send_checked(&mut self, request: &ApiRequest) -> Result<crate::client::ApiResponse> {
        let response = self.transport.send(request)?;
        let message = status::check(response.status)?;
        self.last_status = message.to_string();
        Ok(response)
    }

    /// List the authenticated caller's gists.
    pub fn list(&mut self) -> Result<Vec<GistSummary>> {
        let request = ApiRequest::new(Verb::Get, self.gists_url());
        self.list_endpoint(&request)
    }

    /// List another user's public gists; goes out unauthenticated.
    pub fn list_other(&mut self, user: &str) -> Result<Vec<GistSummary>> {
        let url = format!("{}/users/{user}/gists", self.config.base_url);
        let request = ApiRequest::new(Verb::Get, url).unauthenticated();
        self.list_endpoint(&request)
    }

    fn list_endpoint(&mut self, request: &ApiRequest) -> Result<Vec<GistSummary>> {
        let response = self.send_checked(request)?;
        let gists: Vec<Gist> = serde_json::from_str(&response.body)?;
        let mut presenter = if self.config.interactive {
            Presenter::console()
        } else {
            Presenter::collect()
        };
        for (index, gist) in gists.iter().enumerate() {
            presenter.emit(index, GistSummary::from_gist(gist));
        }
        Ok(presenter.into_collected())
    }

    /// Download gists. With explicit ids each one is fetched in turn; with
    /// no ids every gist of the authenticated caller is fetched, per-gist
    /// logging suppressed to avoid double-reporting.
    pub fn fetch(&mut self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return self.fetch_all();
        }
        for id in ids {
            self.fetch_one(id, self.reporter)?;
        }
        Ok(())
    }

    fn fetch_all(&mut self) -> Result<()> {
        let request = ApiRequest::new(Verb::Get, self.gists_url());
        let response = self.send_checked(&request)?;
        let gists: Vec<Gist> = serde_json::from_str(&response.body)?;
        let quiet = self.reporter.silenced();
        for gist in &gists {
            self.fetch_one(&gist.id, quiet)?;
        }
        Ok(())
    }

    fn fetch_one(&mut self, id: &str, reporter: Reporter) -> Result<()> {
        if id.is_empty() {
            return Err(GistError::MissingArgument("gist id"));
        }
        reporter.info(&format!("inquiring for gist with id '{id}'"));
        let request = ApiRequest::new(Verb::Get, self.gist_url(id));
        let response = self.send_checked(&request)?;
        let gist: Gist = serde_json::from_str(&response.body)?;
        reporter.info("gist found");

        let dir = GistDir::create(id)?;
        let spinner = reporter.spinner("downloading and organizing all the files");
        for (name, file) in &gist.files {
            let Some(raw_url) = &file.raw_url else { continue };
            let written = self
                .transport
                .fetch_raw(raw_url)
                .and_then(|content| dir.write(name, &content).map_err(GistError::Io));
            if let Err(err) = written {
                dir.mark_failed();
                if let Some(spinner) = &spinner {
                    spinner.finish_and_clear();
                }
                return Err(err);
            }
        }
        if let Some(spinner) = &spinner {
            spinner.finish_and_clear();
        }
        reporter.info("successfully downloaded the gist");
        Ok(())
    }

    /// Create one gist from the given files and return its web URL.
    pub fn create(
        &mut self,
        files: &[String],
        private: bool,
        description: Option<String>,
    ) -> Result<String> {
        let file_map = self.build_files(files, &BTreeMap::new())?;
        let payload = GistPayload { files: file_map, public: Some(!private), description };
        let request =
            ApiRequest::new(Verb::Post, self.gists_url()).with_payload(serde_json::to_value(&payload)?);

        let spinner = self.reporter.spinner("publishing the gist");
        let response = self.send_checked(&request);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        let response = response?;
        let created: CreateResponse = serde_json::from_str(&response.body)?;
        self.reporter.info("successfully published the gist");
        self.reporter.info(&format!("gist url: {}", created.html_url));
        Ok(created.html_url)
    }

    /// Modify an existing gist. Requires a gist id; supports the
    /// `oldname->newname` rename syntax per argument.
    pub fn update(
        &mut self,
        files: &[String],
        gist_id: Option<&str>,
        description: Option<String>,
    ) -> Result<()> {
        let id = match gist_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(GistError::MissingArgument("--gist-id")),
        };

        let mut renames = BTreeMap::new();
        let mut sources = Vec::with_capacity(files.len());
        for argument in files {
            match argument.split_once("->") {
                Some((old, new)) => {
                    renames.insert(base_name(old), new.to_string());
                    sources.push(old.to_string());
                }
                None => sources.push(argument.clone()),
            }
        }

        let file_map = self.build_files(&sources, &renames)?;
        let payload = GistPayload { files: file_map, public: None, description };
        let request =
            ApiRequest::new(Verb::Patch, self.gist_url(id)).with_payload(serde_json::to_value(&payload)?);

        let spinner = self.reporter.spinner("updating the gist");
        let response = self.send_checked(&request);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        response?;
        self.reporter.info("successfully updated the gist");
        Ok(())
    }

    /// Gather local file contents into the payload map. Missing files are
    /// created and opened in the platform editor; names the host reserves
    /// are skipped with a warning, so partial success is allowed.
    fn build_files(
        &self,
        sources: &[String],
        renames: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, FilePatch>> {
        let mut file_map = BTreeMap::new();
        let mut any_skipped = false;
        for source in sources {
            let path = Path::new(source);
            if !path.exists() {
                self.reporter
                    .info(&format!("{source} not found in given path, opening in default editor"));
                if let Err(err) = open_in_editor(path) {
                    self.reporter
                        .warn(&format!("could not open '{source}' in the default editor: {err}"));
                }
            }
            let base = base_name(source);
            if !acceptable_filename(&base) {
                any_skipped = true;
                self.reporter.warn(&format!("{source} will be ignored"));
                continue;
            }
            let content = fs::read_to_string(path)?;
            let filename = renames.get(&base).cloned();
            file_map.insert(base, FilePatch { content, filename });
        }
        if any_skipped {
            self.reporter.warn(
                "one or more files have names reserved by the host and will be ignored",
            );
        }
        Ok(file_map)
    }

    /// Delete gists sequentially; the first failure aborts the rest.
    pub fn delete(&mut self, ids: &[String]) -> Result<()> {
        for id in ids {
            if id.is_empty() {
                return Err(GistError::MissingArgument("gist id"));
            }
            let prefix: String = id.chars().take(4).collect();
            self.reporter
                .info(&format!("searching and deleting gist with id '{prefix}...'"));
            let request = ApiRequest::new(Verb::Delete, self.gist_url(id));
            self.send_checked(&request)?;
            self.reporter.info("gist deleted successfully");
        }
        Ok(())
    }

    /// Download every gist of the authenticated caller into id-named
    /// subdirectories under the fixed backup root.
    pub fn backup(&mut self) -> Result<()> {
        self.reporter.info("backing up all gists to local media");
        let root = env::current_dir()?.join(BACKUP_DIR);
        let dir = GistDir::create_or_reuse(&root)?;
        env::set_current_dir(dir.path())?;
        if let Err(err) = self.fetch_all() {
            dir.mark_failed();
            return Err(err);
        }
        self.reporter.info("backup successful");
        Ok(())
    }
}

fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiResponse;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::{HashMap, VecDeque};
    use std::rc::Rc;
    use tempfile::tempdir;

    /// Transport fake that records every request and replays canned
    /// responses in order. Unknown responses default to an empty 200.
    struct FakeTransport {
        requests: Rc<RefCell<Vec<ApiRequest>>>,
        responses: RefCell<VecDeque<ApiResponse>>,
        raw_bodies: HashMap<String, String>,
    }

    impl FakeTransport {
        fn new(responses: Vec<(u16, serde_json::Value)>) -> (Self, Rc<RefCell<Vec<ApiRequest>>>) {
            let requests = Rc::new(RefCell::new(Vec::new()));
            let transport = FakeTransport {
                requests: Rc::clone(&requests),
                responses: RefCell::new(
                    responses
                        .into_iter()
                        .map(|(status, body)| ApiResponse { status, body: body.to_string() })
                        .collect(),
                ),
                raw_bodies: HashMap::new(),
            };
            (transport, requests)
        }

        fn with_raw(mut self, url: &str, body: &str) -> Self {
            self.raw_bodies.insert(url.to_string(), body.to_string());
            self
        }
    }

    impl Transport for FakeTransport {
        fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
            self.requests.borrow_mut().push(request.clone());
            Ok(self
                .responses
                .borrow_mut()
                .pop_front()
                .unwrap_or(ApiResponse { status: 200, body: "{}".to_string() }))
        }

        fn fetch_raw(&self, url: &str) -> Result<String> {
            self.raw_bodies.get(url).cloned().ok_or(GistError::NotFound)
        }
    }

    fn orchestrator(transport: FakeTransport) -> Orchestrator<FakeTransport> {
        Orchestrator::new(transport, Config::library(Some("secret".to_string())))
    }

    fn listing_body() -> serde_json::Value {
        json!([
            {
                "id": "aaa111",
                "html_url": "https://host/g/aaa111",
                "public": true,
                "description": "first",
                "created_at": "2022-01-01T00:00:00Z",
                "updated_at": "2022-01-01T00:00:00Z",
                "files": {}
            },
            {
                "id": "bbb222",
                "html_url": "https://host/g/bbb222",
                "public": false,
                "description": null,
                "created_at": "2022-02-01T00:00:00Z",
                "updated_at": "2022-02-01T00:00:00Z",
                "files": {}
            }
        ])
    }

    #[test]
    fn create_issues_one_post_with_expected_payload() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("x.txt");
        fs::write(&file, "hello").unwrap();

        let (transport, requests) =
            FakeTransport::new(vec![(201, json!({"html_url": "https://host/g/new"}))]);
        let mut orch = orchestrator(transport);
        let url = orch
            .create(&[file.to_string_lossy().into_owned()], true, None)
            .unwrap();

        assert_eq!(url, "https://host/g/new");
        let requests = requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].verb, Verb::Post);
        assert!(requests[0].url.ends_with("/gists"));
        assert!(requests[0].authenticated);
        assert_eq!(
            requests[0].payload,
            Some(json!({"files": {"x.txt": {"content": "hello"}}, "public": false})),
        );
        assert_eq!(orch.last_status(), "gist created successfully");
    }

    #[test]
    fn create_skips_reserved_names_but_keeps_the_rest() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("keep.rs");
        let bad = dir.path().join("gistfile7");
        fs::write(&good, "fn main() {}").unwrap();
        fs::write(&bad, "reserved").unwrap();

        let (transport, requests) =
            FakeTransport::new(vec![(201, json!({"html_url": "https://host/g/new"}))]);
        let mut orch = orchestrator(transport);
        orch.create(
            &[good.to_string_lossy().into_owned(), bad.to_string_lossy().into_owned()],
            false,
            Some("partial".to_string()),
        )
        .unwrap();

        let requests = requests.borrow();
        let payload = requests[0].payload.as_ref().unwrap();
        assert!(payload["files"].get("keep.rs").is_some());
        assert!(payload["files"].get("gistfile7").is_none());
        assert_eq!(payload["public"], json!(true));
        assert_eq!(payload["description"], json!("partial"));
    }

    #[test]
    fn update_rename_reads_old_file_and_sends_new_name() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.py");
        fs::write(&file, "print()").unwrap();

        let (transport, requests) = FakeTransport::new(vec![(200, json!({}))]);
        let mut orch = orchestrator(transport);
        let argument = format!("{}->b.py", file.to_string_lossy());
        orch.update(&[argument], Some("abc123"), None).unwrap();

        let requests = requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].verb, Verb::Patch);
        assert!(requests[0].url.ends_with("/gists/abc123"));
        let payload = requests[0].payload.as_ref().unwrap();
        assert_eq!(
            payload["files"]["a.py"],
            json!({"content": "print()", "filename": "b.py"}),
        );
        assert!(payload.get("public").is_none());
    }

    #[test]
    fn update_without_id_fails_before_any_request() {
        let (transport, requests) = FakeTransport::new(vec![]);
        let mut orch = orchestrator(transport);
        let result = orch.update(&["a.py".to_string()], None, None);
        assert!(matches!(result, Err(GistError::MissingArgument("--gist-id"))));
        assert!(requests.borrow().is_empty());
    }

    #[test]
    fn delete_runs_sequentially_and_aborts_on_failure() {
        let (transport, requests) =
            FakeTransport::new(vec![(404, json!({})), (204, json!({}))]);
        let mut orch = orchestrator(transport);
        let result = orch.delete(&["a".to_string(), "b".to_string()]);

        assert!(matches!(result, Err(GistError::NotFound)));
        let requests = requests.borrow();
        assert_eq!(requests.len(), 1, "second delete must not be issued");
        assert!(requests[0].url.ends_with("/gists/a"));
    }

    #[test]
    fn delete_visits_every_id_in_order_on_success() {
        let (transport, requests) =
            FakeTransport::new(vec![(204, json!({})), (204, json!({}))]);
        let mut orch = orchestrator(transport);
        orch.delete(&["a".to_string(), "b".to_string()]).unwrap();

        let requests = requests.borrow();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].url.ends_with("/gists/a"));
        assert!(requests[1].url.ends_with("/gists/b"));
        assert!(requests.iter().all(|r| r.verb == Verb::Delete));
    }

    #[test]
    fn list_preserves_response_order() {
        let (transport, requests) = FakeTransport::new(vec![(200, listing_body())]);
        let mut orch = orchestrator(transport);
        let summaries = orch.list().unwrap();

        let ids: Vec<&str> = summaries.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["aaa111", "bbb222"]);
        assert!(requests.borrow()[0].authenticated);
    }

    #[test]
    fn list_other_targets_user_endpoint_without_auth() {
        let (transport, requests) = FakeTransport::new(vec![(200, listing_body())]);
        let mut orch = orchestrator(transport);
        let summaries = orch.list_other("alice").unwrap();

        assert_eq!(summaries.len(), 2);
        let requests = requests.borrow();
        assert!(requests[0].url.ends_with("/users/alice/gists"));
        assert!(!requests[0].authenticated);
    }

    // Fetch writes into directories relative to the working directory, so
    // the two tests below serialize on this lock and restore cwd afterwards.
    static CWD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn fetch_without_ids_downloads_each_listed_gist_into_its_own_directory() {
        let _guard = CWD_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        let workdir = tempdir().unwrap();
        let previous = env::current_dir().unwrap();
        env::set_current_dir(workdir.path()).unwrap();

        let single = |id: &str, file: &str, raw: &str| {
            json!({
                "id": id,
                "html_url": format!("https://host/g/{id}"),
                "public": true,
                "description": null,
                "created_at": "2022-01-01T00:00:00Z",
                "updated_at": "2022-01-01T00:00:00Z",
                "files": {file: {"size": 5, "language": null, "raw_url": raw}}
            })
        };
        let (transport, requests) = FakeTransport::new(vec![
            (200, listing_body()),
            (200, single("aaa111", "one.txt", "https://raw/one")),
            (200, single("bbb222", "two.txt", "https://raw/two")),
        ]);
        let transport = transport
            .with_raw("https://raw/one", "first contents")
            .with_raw("https://raw/two", "second contents");

        let mut orch = orchestrator(transport);
        let result = orch.fetch(&[]);
        env::set_current_dir(previous).unwrap();
        result.unwrap();

        let requests = requests.borrow();
        assert!(requests[0].url.ends_with("/gists"));
        assert!(requests[1].url.ends_with("/gists/aaa111"));
        assert!(requests[2].url.ends_with("/gists/bbb222"));
        assert_eq!(
            fs::read_to_string(workdir.path().join("aaa111/one.txt")).unwrap(),
            "first contents",
        );
        assert_eq!(
            fs::read_to_string(workdir.path().join("bbb222/two.txt")).unwrap(),
            "second contents",
        );
    }

    #[test]
    fn fetch_cleans_up_empty_directory_when_download_fails() {
        let _guard = CWD_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        let workdir = tempdir().unwrap();
        // raw body intentionally unregistered so the download fails
        let single = json!({
            "id": "broken1",
            "html_url": "https://host/g/broken1",
            "public": true,
            "description": null,
            "created_at": "2022-01-01T00:00:00Z",
            "updated_at": "2022-01-01T00:00:00Z",
            "files": {"gone.txt": {"size": 5, "language": null, "raw_url": "https://raw/gone"}}
        });
        let (transport, _requests) = FakeTransport::new(vec![(200, single)]);
        let mut orch = Orchestrator::new(
            transport,
            Config::library(Some("secret".to_string())),
        );

        let previous = env::current_dir().unwrap();
        env::set_current_dir(workdir.path()).unwrap();
        let result = orch.fetch(&["broken1".to_string()]);
        let leftover = workdir.path().join("broken1").exists();
        env::set_current_dir(previous).unwrap();

        assert!(result.is_err());
        assert!(!leftover, "empty directory must be removed on failure");
    }
}

