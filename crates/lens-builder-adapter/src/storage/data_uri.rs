/*
[INPUT]:  JSON metadata or a local file
[OUTPUT]: Inline base64 data: URI
[POS]:    Storage layer - offline fallback uploader
[UPDATE]: When inline encoding changes
*/

use std::path::Path;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::Value;

use crate::http::Result;

use super::{StorageUploader, mime_for_path};

/// Encodes content inline instead of uploading it
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUriStorage;

pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

#[async_trait]
impl StorageUploader for DataUriStorage {
    async fn upload_json(&self, value: &Value) -> Result<String> {
        Ok(encode("application/json", &serde_json::to_vec(value)?))
    }

    async fn upload_file(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        Ok(encode(mime_for_path(path), &bytes))
    }
}
