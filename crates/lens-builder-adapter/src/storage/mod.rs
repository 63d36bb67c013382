/*
[INPUT]:  App metadata JSON or a local image path
[OUTPUT]: URI the metadata/logo can be referenced by in a request
[POS]:    Storage layer - content upload ahead of operation submission
[UPDATE]: When adding storage backends or changing MIME detection
*/

pub mod data_uri;
pub mod grove;

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use crate::http::Result;

pub use data_uri::DataUriStorage;
pub use grove::{GROVE_API_URL, GroveStorage};

/// Upload collaborator returning a URI for the stored content
#[async_trait]
pub trait StorageUploader: Send + Sync {
    async fn upload_json(&self, value: &Value) -> Result<String>;

    async fn upload_file(&self, path: &Path) -> Result<String>;
}

/// Image MIME type from the file extension; unknown extensions are png
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("logo.png", "image/png")]
    #[case("logo.JPG", "image/jpeg")]
    #[case("logo.jpeg", "image/jpeg")]
    #[case("anim.gif", "image/gif")]
    #[case("logo.webp", "image/webp")]
    #[case("logo.svg", "image/png")]
    #[case("no_extension", "image/png")]
    fn test_mime_for_path(#[case] path: &str, #[case] mime: &str) {
        assert_eq!(mime_for_path(Path::new(path)), mime);
    }
}
