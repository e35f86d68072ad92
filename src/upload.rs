use std::time::Duration;

use serde::Deserialize;

use crate::error::AppResult;

/// A binary asset received from the client, ready for upload.
#[derive(Clone, Debug)]
pub struct Asset {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Copy, Debug)]
pub enum AssetKind {
    Image,
    Video,
}

impl AssetKind {
    fn as_str(self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Video => "video",
        }
    }
}

/// Client for the external media host. Uploads a binary asset and returns
/// the durable URL the host assigns to it.
pub struct MediaClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl MediaClient {
    pub fn new(base_url: String, api_key: String, timeout_secs: u64) -> anyhow::Result<Self> {
        // Warn once on app load if uploads will be mocked
        if api_key.trim().is_empty() {
            tracing::warn!("no MEDIA_API_KEY provided - uploads return placeholder URLs");
        }

        let client = reqwest::Client::builder()
            .user_agent("moviebox/0.1")
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, base_url, api_key })
    }

    /// Uploads one asset. The client timeout bounds a stalled host, so an
    /// upload can never hang the surrounding request indefinitely.
    pub async fn upload(&self, kind: AssetKind, asset: &Asset) -> AppResult<String> {
        // Placeholder URLs when no API key is provided
        if self.api_key.trim().is_empty() {
            return Ok(format!("https://media.invalid/{}/{}", kind.as_str(), asset.filename));
        }

        let url = format!("{}/{}/upload", self.base_url.trim_end_matches('/'), kind.as_str());

        let part = reqwest::multipart::Part::bytes(asset.bytes.clone())
            .file_name(asset.filename.clone())
            .mime_str(&asset.content_type)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp: UploadResponse = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp.secure_url)
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}
