/*
[INPUT]:  JSON metadata or file bytes, Lens chain id
[OUTPUT]: lens:// URI of the immutable Grove object
[POS]:    Storage layer - Grove HTTP uploader
[UPDATE]: When the Grove upload API or ACL handling changes
*/

use std::path::Path;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, info};

use crate::http::{ClientConfig, LensError, Result};
use crate::types::Environment;

use super::{StorageUploader, mime_for_path};

pub const GROVE_API_URL: &str = "https://api.grove.storage/";

/// Grove uploader. Objects are immutable on the environment's chain.
#[derive(Debug, Clone)]
pub struct GroveStorage {
    http_client: Client,
    api_url: Url,
    chain_id: u64,
}

impl GroveStorage {
    pub fn new(environment: Environment, config: &ClientConfig) -> Result<Self> {
        Self::with_api_url(environment, config, GROVE_API_URL)
    }

    pub fn with_api_url(environment: Environment, config: &ClientConfig, api_url: &str) -> Result<Self> {
        Ok(Self {
            http_client: config.build_http_client()?,
            api_url: Url::parse(api_url)?,
            chain_id: environment.chain_id(),
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn upload(&self, body: Vec<u8>, content_type: &str) -> Result<String> {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("chain_id", &self.chain_id.to_string());

        debug!(%url, content_type, bytes = body.len(), "uploading to grove");
        let response = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LensError::api_error(status, text));
        }

        let payload: Value = response.json().await?;
        let uri = storage_uri(&payload)
            .ok_or_else(|| LensError::Storage(format!("response carried no uri: {payload}")))?;
        info!(%uri, "grove upload complete");
        Ok(uri)
    }
}

/// Grove answers with either one object or an array of them
fn storage_uri(payload: &Value) -> Option<String> {
    let entry = match payload {
        Value::Array(entries) => entries.first()?,
        other => other,
    };
    entry.get("uri")?.as_str().map(str::to_string)
}

#[async_trait]
impl StorageUploader for GroveStorage {
    async fn upload_json(&self, value: &Value) -> Result<String> {
        self.upload(serde_json::to_vec(value)?, "application/json").await
    }

    async fn upload_file(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        self.upload(bytes, mime_for_path(path)).await
    }
}
