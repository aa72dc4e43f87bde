//! VK photo source.
//!
//! Lists the wall album of an account through `photos.get`, asking for every
//! size variant of every photo (`photo_sizes=1`) plus like counts
//! (`extended=1`), newest first (`rev=1`).

use crate::backend::PhotoSource;
use crate::error::{ErrorKind, Result};
use crate::models::PhotoPage;
use async_trait::async_trait;
use exn::ResultExt;
use serde::Deserialize;
use tracing::instrument;

const DEFAULT_ENDPOINT: &str = "https://api.vk.com/method/photos.get";
const DEFAULT_API_VERSION: &str = "5.131";

/// Either a `response` or an `error` object, never both.
#[derive(Debug, Deserialize)]
struct Envelope {
    response: Option<PhotoPage>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error_code: i64,
    error_msg: String,
}

/// VK API photo source.
///
/// # Examples
///
/// ```no_run
/// use albumcopy_source::backend::{PhotoSource, VkSource};
/// use albumcopy_source::error::Result;
///
/// # async fn example() -> Result<()> {
/// let source = VkSource::new("vk", "access-token", "5.131")?;
/// let page = source.fetch("1").await?;
/// println!("{} of {} photos", page.items.len(), page.count);
/// # Ok(())
/// # }
/// ```
// No `Debug`: it would print the token.
#[derive(Clone)]
pub struct VkSource {
    name: String,
    client: reqwest::Client,
    endpoint: String,
    token: String,
    version: String,
}

impl VkSource {
    /// Create a new VK source. No request is made until [`fetch`](PhotoSource::fetch).
    pub fn new(name: impl Into<String>, token: impl Into<String>, version: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .or_raise(|| ErrorKind::Network("failed to build HTTP client".to_string()))?;
        Ok(Self {
            name: name.into(),
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: token.into(),
            version: version.into(),
        })
    }

    /// Point the source at a different `photos.get` endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn query<'a>(&'a self, owner_id: &'a str) -> [(&'static str, &'a str); 7] {
        [
            ("access_token", self.token.as_str()),
            ("v", self.version.as_str()),
            ("owner_id", owner_id),
            ("album_id", "wall"),
            ("photo_sizes", "1"),
            ("extended", "1"),
            ("rev", "1"),
        ]
    }

    /// Unwrap the `response` envelope, turning an `error` object into
    /// [`ErrorKind::Api`].
    fn decode(body: &[u8]) -> Result<PhotoPage> {
        let envelope: Envelope = serde_json::from_slice(body)
            .or_raise(|| ErrorKind::MalformedResponse("unexpected photos.get response shape".to_string()))?;
        match envelope {
            Envelope { error: Some(error), .. } => {
                exn::bail!(ErrorKind::Api { code: error.error_code, message: error.error_msg })
            },
            Envelope { response: Some(page), .. } => Ok(page),
            Envelope { response: None, error: None } => {
                exn::bail!(ErrorKind::MalformedResponse("neither response nor error in photos.get".to_string()))
            },
        }
    }
}

#[async_trait]
impl PhotoSource for VkSource {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(source = %self.name))]
    async fn fetch(&self, owner_id: &str) -> Result<PhotoPage> {
        let network = || ErrorKind::Network(format!("GET {}", self.endpoint));
        let body = self
            .client
            .get(&self.endpoint)
            .query(&self.query(owner_id))
            .send()
            .await
            .or_raise(network)?
            .error_for_status()
            .or_raise(network)?
            .bytes()
            .await
            .or_raise(network)?;
        let page = Self::decode(&body)?;
        tracing::debug!(count = page.count, items = page.items.len(), "Fetched photo page");
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parameters() {
        let source = VkSource::new("vk", "t0ken", DEFAULT_API_VERSION).unwrap();
        let query = source.query("123");
        assert!(query.contains(&("access_token", "t0ken")));
        assert!(query.contains(&("v", "5.131")));
        assert!(query.contains(&("owner_id", "123")));
        assert!(query.contains(&("album_id", "wall")));
        assert!(query.contains(&("photo_sizes", "1")));
        assert!(query.contains(&("extended", "1")));
        assert!(query.contains(&("rev", "1")));
    }

    #[test]
    fn test_decode_response() {
        let body = br#"{"response": {"count": 1, "items": [
            {"likes": {"count": 4}, "date": 0, "sizes": [{"width": 1, "height": 2, "type": "s", "url": "u"}]}
        ]}}"#;
        let page = VkSource::decode(body).unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.items[0].likes.count, 4);
        assert_eq!(page.items[0].sizes[0].url, "u");
    }

    #[test]
    fn test_decode_api_error() {
        let body = br#"{"error": {"error_code": 5, "error_msg": "User authorization failed", "request_params": []}}"#;
        let err = VkSource::decode(body).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Api { code: 5, message } if message == "User authorization failed"));
    }

    #[test]
    fn test_decode_malformed() {
        for body in [&br#"{}"#[..], br#"{"response": {"items": "nope"}}"#, b"<html>"] {
            let err = VkSource::decode(body).unwrap_err();
            assert!(matches!(&*err, ErrorKind::MalformedResponse(_)));
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let source = VkSource::new("vk", "t", DEFAULT_API_VERSION).unwrap().with_endpoint("http://127.0.0.1:9/photos.get");
        let err = source.fetch("1").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Network(_)));
        assert!(err.is_retryable());
    }
}
