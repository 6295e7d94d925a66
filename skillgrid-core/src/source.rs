//! People data sources
//!
//! [`PeopleSource`] is the seam between the dashboard and the people API.
//! [`HttpSource`] talks to the live service; [`DirSource`] reads the same two
//! documents from disk (`people.json` and `people/<id>.json`) for offline use.

use crate::payload::{DetailPayload, PersonId, PersonSummary};
use anyhow::{bail, Context, Result};
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default people API
pub const DEFAULT_API_URL: &str = "https://forinterview.onrender.com";

/// The two inbound operations of the dashboard
pub trait PeopleSource: Send + Sync {
    /// `GET /people`
    fn list_people(&self) -> Result<Vec<PersonSummary>>;

    /// `GET /people/{id}`
    fn person_detail(&self, id: &PersonId) -> Result<DetailPayload>;
}

/// Reject ids that would escape their path segment when used verbatim
fn checked_id(id: &PersonId) -> Result<&str> {
    let raw = id.as_str();
    if raw.is_empty() || raw == "." || raw == ".." {
        bail!("invalid person id {:?}", raw);
    }
    Ok(raw)
}

/// Blocking HTTP client for the people API
pub struct HttpSource {
    client: reqwest::blocking::Client,
    base: Url,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url).with_context(|| format!("invalid API URL: {}", base_url))?;
        if base.cannot_be_a_base() {
            bail!("invalid API URL: {}", base_url);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(HttpSource {
            client,
            base,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL with `segments` appended, each percent-encoded as one segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("invalid API URL: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(url = %url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("request failed: {}", url))?
            .error_for_status()
            .with_context(|| format!("unexpected status from {}", url))?;
        response
            .json()
            .with_context(|| format!("invalid JSON from {}", url))
    }
}

impl PeopleSource for HttpSource {
    fn list_people(&self) -> Result<Vec<PersonSummary>> {
        self.endpoint(&["people"])
            .and_then(|url| self.get_json(url))
            .context("Error fetching users")
    }

    fn person_detail(&self, id: &PersonId) -> Result<DetailPayload> {
        checked_id(id)
            .and_then(|raw| self.endpoint(&["people", raw]))
            .and_then(|url| self.get_json(url))
            .with_context(|| format!("Error fetching user details for {}", id))
    }
}

/// People data stored on disk
///
/// Layout:
/// - `<root>/people.json`: the `GET /people` document
/// - `<root>/people/<id>.json`: one `GET /people/{id}` document per person
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirSource { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `people/<id>.json`; ids with a path separator are rejected
    fn detail_path(&self, id: &PersonId) -> Result<PathBuf> {
        let raw = checked_id(id)?;
        if raw.contains(['/', '\\']) {
            bail!("invalid person id {:?}", raw);
        }
        Ok(self.root.join("people").join(format!("{}.json", raw)))
    }

    fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}

impl PeopleSource for DirSource {
    fn list_people(&self) -> Result<Vec<PersonSummary>> {
        Self::read_json(&self.root.join("people.json")).context("Error fetching users")
    }

    fn person_detail(&self, id: &PersonId) -> Result<DetailPayload> {
        self.detail_path(id)
            .and_then(|path| Self::read_json(&path))
            .with_context(|| format!("Error fetching user details for {}", id))
    }
}
