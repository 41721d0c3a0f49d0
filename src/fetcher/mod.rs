pub mod http_fetcher;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::app::Result;

/// Longest stem kept from a name seed, in characters.
const MAX_STEM_CHARS: usize = 120;

/// Persists an article's image and reports the file name it was saved under.
#[async_trait]
pub trait AssetDownloader: Send + Sync {
    async fn download(&self, url: &str, name_seed: &str) -> Result<String>;
}

/// Derive a filesystem-safe file stem from `seed`.
///
/// Letters, digits, `-`, `_`, `.` and spaces survive; everything else becomes
/// `_`. Falls back to a short hash of `url` when nothing usable remains.
pub fn file_stem(seed: &str, url: &str) -> String {
    let sanitized: String = seed
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_STEM_CHARS)
        .collect();

    let trimmed = sanitized.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if trimmed.chars().any(|c| c.is_alphanumeric()) {
        return trimmed.to_string();
    }

    format!("asset_{}", &url_digest(url)[..16])
}

/// Short hash of `url`, used to keep same-titled images apart.
pub fn url_tag(url: &str) -> String {
    url_digest(url)[..8].to_string()
}

fn url_digest(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}
