//! Yandex Disk destination backend.
//!
//! Talks to the Yandex Disk REST API (`/v1/disk/resources`). Uploads are
//! upload-by-URL: Yandex fetches the photo itself, so no bytes pass through
//! this process.
//!
//! # Credentials
//!
//! The configured token is sent verbatim as the `Authorization` header, so
//! it should include its scheme (e.g. `OAuth y0_AgAAAA...`).

use crate::backend::DestinationBackend;
use crate::error::{ErrorKind, Result};
use crate::{validate_folder, validate_name};
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::{Response, StatusCode, header};
use serde::Deserialize;
use tracing::instrument;

const DEFAULT_ENDPOINT: &str = "https://cloud-api.yandex.net/v1/disk/resources";

/// Single-page listing limit. Folders with more entries than this are not
/// fully listed, so names beyond it won't be detected as duplicates.
const LIST_LIMIT: u32 = 1000;

#[derive(Debug, Deserialize)]
struct Resource {
    #[serde(rename = "_embedded")]
    embedded: Option<Embedded>,
}

#[derive(Debug, Deserialize)]
struct Embedded {
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    name: String,
}

/// Error body returned alongside non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(default)]
    error: String,
    #[serde(default)]
    description: String,
}

/// Yandex Disk destination backend.
///
/// # Examples
///
/// ```no_run
/// use albumcopy_storage::backend::{DestinationBackend, YandexDiskBackend};
/// use albumcopy_storage::error::Result;
///
/// # async fn example() -> Result<()> {
/// let backend = YandexDiskBackend::new("yandex", "OAuth token")?;
/// if !backend.exists("VK backups").await? {
///     backend.create_folder("VK backups").await?;
/// }
/// # Ok(())
/// # }
/// ```
// No `Debug`: it would print the token.
#[derive(Clone)]
pub struct YandexDiskBackend {
    name: String,
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl YandexDiskBackend {
    /// Create a new Yandex Disk backend. No request is made until first use.
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .or_raise(|| ErrorKind::Network("failed to build HTTP client".to_string()))?;
        Ok(Self { name: name.into(), client, endpoint: DEFAULT_ENDPOINT.to_string(), token: token.into() })
    }

    /// Point the backend at a different resources endpoint (no trailing slash).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    fn upload_endpoint(&self) -> String {
        format!("{}/upload", self.endpoint)
    }

    fn network(&self, method: &str) -> impl Fn() -> ErrorKind + '_ {
        let method = method.to_string();
        move || ErrorKind::Network(format!("{method} {}", self.endpoint))
    }

    /// Map a non-success response to an error, consuming the body for its
    /// message. `path` is the resource the request was about.
    async fn api_error(response: Response, path: &str) -> ErrorKind {
        let status = response.status();
        let body = response.bytes().await.unwrap_or_default();
        let error: ApiError = serde_json::from_slice(&body).unwrap_or_default();
        Self::classify(status, path, error)
    }

    fn classify(status: StatusCode, path: &str, error: ApiError) -> ErrorKind {
        match status {
            StatusCode::NOT_FOUND => ErrorKind::NotFound(path.to_string()),
            StatusCode::CONFLICT if error.error == "DiskResourceAlreadyExistsError" => {
                ErrorKind::AlreadyExists(path.to_string())
            },
            // Conflicts other than "already exists" are a missing parent folder.
            StatusCode::CONFLICT => ErrorKind::NotFound(path.to_string()),
            _ => ErrorKind::Api {
                status: status.as_u16(),
                message: match (error.error.is_empty(), error.description.is_empty()) {
                    (true, true) => status.canonical_reason().unwrap_or_default().to_string(),
                    (false, true) => error.error,
                    (_, false) => error.description,
                },
            },
        }
    }

    fn decode_listing(body: &[u8]) -> Result<Vec<String>> {
        let resource: Resource = serde_json::from_slice(body)
            .or_raise(|| ErrorKind::MalformedResponse("unexpected resource metadata shape".to_string()))?;
        match resource.embedded {
            Some(embedded) => Ok(embedded.items.into_iter().map(|item| item.name).collect()),
            // Files have no `_embedded`; only folders can be listed.
            None => exn::bail!(ErrorKind::MalformedResponse("resource is not a folder".to_string())),
        }
    }
}

#[async_trait]
impl DestinationBackend for YandexDiskBackend {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(backend = %self.name))]
    async fn exists(&self, path: &str) -> Result<bool> {
        let path = validate_folder(path)?;
        let response = self
            .client
            .get(&self.endpoint)
            .header(header::AUTHORIZATION, &self.token)
            .query(&[("path", path.as_str()), ("limit", "0")])
            .send()
            .await
            .or_raise(self.network("GET"))?;
        // Anything but 200 counts as absent.
        Ok(response.status() == StatusCode::OK)
    }

    #[instrument(skip(self), fields(backend = %self.name))]
    async fn create_folder(&self, path: &str) -> Result<()> {
        let path = validate_folder(path)?;
        let response = self
            .client
            .put(&self.endpoint)
            .header(header::AUTHORIZATION, &self.token)
            .query(&[("path", path.as_str())])
            .send()
            .await
            .or_raise(self.network("PUT"))?;
        if !response.status().is_success() {
            exn::bail!(Self::api_error(response, &path).await);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(backend = %self.name))]
    async fn list(&self, folder: &str) -> Result<Vec<String>> {
        let folder = validate_folder(folder)?;
        let limit = LIST_LIMIT.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .header(header::AUTHORIZATION, &self.token)
            .query(&[("path", folder.as_str()), ("limit", limit.as_str()), ("fields", "_embedded.items.name")])
            .send()
            .await
            .or_raise(self.network("GET"))?;
        if !response.status().is_success() {
            exn::bail!(Self::api_error(response, &folder).await);
        }
        let body = response.bytes().await.or_raise(self.network("GET"))?;
        Self::decode_listing(&body)
    }

    #[instrument(skip(self, url), fields(backend = %self.name))]
    async fn upload_url(&self, folder: &str, name: &str, url: &str) -> Result<()> {
        let folder = validate_folder(folder)?;
        validate_name(name)?;
        let path = format!("{folder}/{name}");
        let response = self
            .client
            .post(self.upload_endpoint())
            .header(header::AUTHORIZATION, &self.token)
            .query(&[("path", path.as_str()), ("url", url), ("overwrite", "false")])
            .send()
            .await
            .or_raise(self.network("POST"))?;
        if !response.status().is_success() {
            exn::bail!(Self::api_error(response, &path).await);
        }
        tracing::debug!(path = %path, status = response.status().as_u16(), "Upload accepted");
        Ok(())
    }
}
