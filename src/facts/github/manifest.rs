//! Best-effort retrieval of a repository's root `package.json`.

use super::client::{Client, FetchResult};
use crate::facts::RepoRef;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use ohno::{IntoAppError, bail};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

const LOG_TARGET: &str = "  manifest";
const MANIFEST_PATH: &str = "package.json";

/// Dependency sections whose package names are considered when classifying a manifest
const DEPENDENCY_SECTIONS: [&str; 3] = ["dependencies", "devDependencies", "peerDependencies"];

/// Response of the repository contents endpoint
#[derive(Debug, Deserialize)]
struct FileContents {
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

/// A parsed `package.json`
#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    root: Map<String, Value>,
}

impl PackageManifest {
    /// Parse manifest text, which must be a JSON object.
    pub fn parse(text: &str) -> crate::Result<Self> {
        match serde_json::from_str::<Value>(text).into_app_err("parsing package.json")? {
            Value::Object(root) => Ok(Self { root }),
            _ => bail!("package.json is not a JSON object"),
        }
    }

    /// Names of all declared dependencies, across the regular, dev, and peer sections.
    #[must_use]
    pub fn dependency_names(&self) -> BTreeSet<&str> {
        DEPENDENCY_SECTIONS
            .iter()
            .filter_map(|section| self.root.get(*section).and_then(Value::as_object))
            .flat_map(|deps| deps.keys().map(String::as_str))
            .collect()
    }

    /// Whether the manifest declares npm/yarn workspaces.
    #[must_use]
    pub fn has_workspaces(&self) -> bool {
        self.root.get("workspaces").is_some_and(|w| match w {
            Value::Array(items) => !items.is_empty(),
            Value::Object(fields) => !fields.is_empty(),
            _ => false,
        })
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.root.get("name").and_then(Value::as_str)
    }
}

/// Decode file contents according to the encoding reported by the contents API.
fn decode_contents(contents: &FileContents) -> crate::Result<String> {
    match contents.encoding.as_deref() {
        Some("base64") => {
            let compact: String = contents.content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            let bytes = BASE64_STANDARD.decode(compact).into_app_err("decoding base64 file contents")?;
            String::from_utf8(bytes).into_app_err("file contents are not valid UTF-8")
        }
        None | Some("utf-8" | "utf8") => Ok(contents.content.clone()),
        Some(other) => bail!("unsupported content encoding '{other}'"),
    }
}

/// Fetches `package.json` from a repository's default branch
#[derive(Debug, Clone)]
pub struct ManifestFetcher {
    client: Client,
}

impl ManifestFetcher {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch and parse the manifest, returning `None` on any failure.
    pub async fn fetch_manifest(&self, repo: &RepoRef) -> Option<PackageManifest> {
        let contents = match self.fetch_contents(repo).await {
            Ok(contents) => contents,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Could not fetch {MANIFEST_PATH} for '{repo}': {e}");
                return None;
            }
        };

        match decode_contents(&contents).and_then(|text| PackageManifest::parse(&text)) {
            Ok(manifest) => {
                log::debug!(target: LOG_TARGET, "Found {MANIFEST_PATH} for '{repo}'");
                Some(manifest)
            }
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Could not read {MANIFEST_PATH} for '{repo}': {e:#}");
                None
            }
        }
    }

    async fn fetch_contents(&self, repo: &RepoRef) -> FetchResult<FileContents> {
        let path = format!("/repos/{}/{}/contents/{MANIFEST_PATH}", repo.owner(), repo.repo());
        let url = self.client.endpoint(&path, &[])?;
        self.client.get_json(url).await
    }
}
