use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::app::{NewswireError, Result};
use crate::fetcher::{file_stem, url_tag, AssetDownloader};

const DEFAULT_EXTENSION: &str = "png";

/// Downloads article images over HTTP into a directory.
pub struct HttpAssetDownloader {
    client: Client,
    images_dir: PathBuf,
    base_url: Option<Url>,
}

impl HttpAssetDownloader {
    /// `base_url` resolves relative image references.
    pub fn new(images_dir: impl Into<PathBuf>, base_url: Option<Url>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("newswire/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            images_dir: images_dir.into(),
            base_url,
        })
    }

    fn resolve(&self, url: &str) -> Result<Url> {
        let resolved = match Url::parse(url) {
            Ok(absolute) => absolute,
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => base.join(url)?,
                None => return Err(url::ParseError::RelativeUrlWithoutBase.into()),
            },
            Err(e) => return Err(e.into()),
        };

        match resolved.scheme() {
            "http" | "https" => Ok(resolved),
            other => Err(NewswireError::Config(format!(
                "Unsupported image URL scheme: {}",
                other
            ))),
        }
    }
}

#[async_trait]
impl AssetDownloader for HttpAssetDownloader {
    async fn download(&self, url: &str, name_seed: &str) -> Result<String> {
        let url = self.resolve(url)?;
        let response = self.client.get(url.clone()).send().await?;
        response.error_for_status_ref()?;

        let extension = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(extension_from_content_type)
            .or_else(|| extension_from_url(&url))
            .unwrap_or(DEFAULT_EXTENSION);

        let body = response.bytes().await?;

        let stem = file_stem(name_seed, url.as_str());
        let mut file_name = format!("{}.{}", stem, extension);
        tokio::fs::create_dir_all(&self.images_dir).await?;
        if tokio::fs::try_exists(self.images_dir.join(&file_name)).await? {
            file_name = format!("{}_{}.{}", stem, url_tag(url.as_str()), extension);
        }
        tokio::fs::write(self.images_dir.join(&file_name), &body).await?;

        debug!("Saved {} ({} bytes)", file_name, body.len());
        Ok(file_name)
    }
}

fn extension_from_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type.split(';').next()?.trim().to_ascii_lowercase();
    match mime.as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/avif" => Some("avif"),
        "image/svg+xml" => Some("svg"),
        _ => None,
    }
}

fn extension_from_url(url: &Url) -> Option<&'static str> {
    let segment = url.path_segments()?.next_back()?;
    let (_, ext) = segment.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("jpg"),
        "png" => Some("png"),
        "gif" => Some("gif"),
        "webp" => Some("webp"),
        "avif" => Some("avif"),
        "svg" => Some("svg"),
        _ => None,
    }
}
