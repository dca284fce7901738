// Command-line surface. The seven operations form a required mutually
// exclusive group; auxiliary flags ride alongside the operation they belong
// to. Conversion into an `Operation` happens here so the binary stays thin.

use clap::{ArgGroup, Parser};

use crate::ops::Operation;

/// Environment variable consulted for the secret key when `--secret-key`
/// is not passed.
pub const SECRET_KEY_ENV: &str = "GITHUB_SECRET_KEY";

#[derive(Parser, Debug)]
#[command(
    name = "gistctl",
    version,
    about = "A simple gist crud utility",
    group(
        ArgGroup::new("operation")
            .required(true)
            .args(["post", "patch", "get", "delete", "list", "list_other", "backup"])
    )
)]
pub struct Cli {
    /// Create a gist from the given files
    #[arg(short = 'p', long, value_name = "GISTNAME", num_args = 1..)]
    post: Vec<String>,

    /// Switch gist visibility to private (with --post)
    #[arg(short = 'n', long = "no-public")]
    no_public: bool,

    /// Description for the gist (with --post/--patch)
    #[arg(short = 'D', long, value_name = "TEXT")]
    description: Option<String>,

    /// Modify an existing gist
    #[arg(short = 'P', long, value_name = "GISTNAME", num_args = 1..)]
    patch: Vec<String>,

    /// Gist id of the gist to modify (with --patch)
    #[arg(short = 'i', long = "gist-id", value_name = "GISTID")]
    gist_id: Option<String>,

    /// Download gist(s)
    #[arg(short = 'g', long, value_name = "GISTID", num_args = 1..)]
    get: Vec<String>,

    /// Remove gist(s)
    #[arg(short = 'd', long, value_name = "GISTID", num_args = 1..)]
    delete: Vec<String>,

    /// List public/private gists for the authenticated user
    #[arg(short = 'l', long)]
    list: bool,

    /// List public gists for an unauthenticated user
    #[arg(short = 'L', long = "list-other", value_name = "USERNAME")]
    list_other: Option<String>,

    /// Create a local backup of all gists
    #[arg(short = 'b', long)]
    backup: bool,

    /// Secret key for the gist host
    #[arg(short = 's', long = "secret-key", value_name = "SECRETKEY")]
    secret_key: Option<String>,

    /// Don't log anything to stdout
    #[arg(short = 'q', long = "no-logging")]
    no_logging: bool,
}

impl Cli {
    /// Split the parsed flags into the operation to run plus the settings
    /// the binary needs to build the orchestrator.
    pub fn into_parts(self) -> (Operation, Option<String>, bool) {
        let Cli {
            post,
            no_public,
            description,
            patch,
            gist_id,
            get,
            delete,
            list: _,
            list_other,
            backup,
            secret_key,
            no_logging,
        } = self;

        let operation = if !post.is_empty() {
            Operation::Create { files: post, private: no_public, description }
        } else if !patch.is_empty() {
            Operation::Update { files: patch, gist_id, description }
        } else if !get.is_empty() {
            Operation::Fetch { ids: get }
        } else if !delete.is_empty() {
            Operation::Delete { ids: delete }
        } else if let Some(user) = list_other {
            Operation::ListOther { user }
        } else if backup {
            Operation::Backup
        } else {
            Operation::List
        };
        (operation, secret_key, no_logging)
    }
}
