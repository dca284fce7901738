// Library root
// -----------
// This crate is both a CLI and a library for working with gists on a
// remote gist host. The binary (`main.rs`) parses flags and drives the
// orchestrator; library consumers go through `api::GistApi`.
//
// Module responsibilities:
// - `api`: Public facade returning structured results instead of console
//   output.
// - `cli`: Flag definitions and conversion into an `Operation`.
// - `client`: Blocking HTTP gateway behind the `Transport` trait.
// - `error`: The crate-wide error taxonomy.
// - `files`: Filename validation, per-gist directories, editor launching.
// - `model`: Wire types for requests and responses.
// - `ops`: The operation orchestrator tying everything together.
// - `render`: Terminal rendering, structured summaries and event logging.
// - `status`: HTTP status classification.

pub mod api;
pub mod cli;
pub mod client;
pub mod error;
pub mod files;
pub mod model;
pub mod ops;
pub mod render;
pub mod status;

pub use api::GistApi;
pub use error::GistError;
