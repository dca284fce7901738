// Wire types for the gist endpoints. Response shapes mirror what the host
// returns for listings and single resources; payload shapes are built fresh
// per request and serialized straight into the body.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One gist as returned by the list and single-resource endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Gist {
    pub id: String,
    pub html_url: String,
    pub public: bool,
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub files: BTreeMap<String, GistFile>,
}

/// Per-file metadata nested inside a [`Gist`].
#[derive(Debug, Clone, Deserialize)]
pub struct GistFile {
    #[serde(default)]
    pub size: u64,
    pub language: Option<String>,
    pub raw_url: Option<String>,
}

/// Response body of a successful create; only the web URL is of interest.
#[derive(Debug, Deserialize)]
pub struct CreateResponse {
    pub html_url: String,
}

/// Request body for create and update. `public` is attached only on create,
/// `description` only when the caller supplied one.
#[derive(Debug, Serialize)]
pub struct GistPayload {
    pub files: BTreeMap<String, FilePatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One file entry inside a [`GistPayload`]. `filename` is only present when
/// an update renames the file server-side.
#[derive(Debug, Serialize)]
pub struct FilePatch {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_payload_shape_matches_host_contract() {
        let mut files = BTreeMap::new();
        files.insert(
            "x.txt".to_string(),
            FilePatch { content: "hello".to_string(), filename: None },
        );
        let payload = GistPayload { files, public: Some(false), description: None };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"files": {"x.txt": {"content": "hello"}}, "public": false}),
        );
    }

    #[test]
    fn update_payload_omits_public_and_carries_rename() {
        let mut files = BTreeMap::new();
        files.insert(
            "a.py".to_string(),
            FilePatch {
                content: "print()".to_string(),
                filename: Some("b.py".to_string()),
            },
        );
        let payload = GistPayload {
            files,
            public: None,
            description: Some("renamed".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "files": {"a.py": {"content": "print()", "filename": "b.py"}},
                "description": "renamed",
            }),
        );
    }

    #[test]
    fn gist_listing_deserializes() {
        let body = json!([{
            "id": "aa5a315d61ae9438b18d",
            "html_url": "https://host/g/aa5a315d61ae9438b18d",
            "public": true,
            "description": null,
            "created_at": "2022-01-01T00:00:00Z",
            "updated_at": "2022-01-02T00:00:00Z",
            "files": {
                "notes.md": {"size": 12, "language": "Markdown", "raw_url": "https://raw/notes.md"}
            }
        }]);
        let gists: Vec<Gist> = serde_json::from_value(body).unwrap();
        assert_eq!(gists.len(), 1);
        assert_eq!(gists[0].id, "aa5a315d61ae9438b18d");
        assert!(gists[0].description.is_none());
        assert_eq!(gists[0].files["notes.md"].size, 12);
    }
}
