//! Source archive download.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::consts::ARCHIVE_STEM;
use crate::error::{BuildError, IoResultExt, Result};

/// Extension of the archive named by `url`: the text after the last `.` of its path.
///
/// Query strings and fragments are ignored. A URL whose last path segment has
/// no `.` is rejected.
pub fn archive_extension(url: &str) -> Result<&str> {
  let path = url.split(['?', '#']).next().unwrap_or(url);

  match path.rsplit_once('.') {
    Some((_, ext)) if !ext.is_empty() && !ext.contains('/') => Ok(ext),
    _ => Err(BuildError::configuration(format!(
      "cannot derive archive extension from '{}'",
      url
    ))),
  }
}

/// Download `url` into `download_dir` as `source.<ext>`.
///
/// Returns the path of the downloaded archive. Network failures and
/// non-success statuses are transient errors.
pub async fn download_archive(url: &str, download_dir: &Path) -> Result<PathBuf> {
  let extension = archive_extension(url)?;
  let dest_path = download_dir.join(format!("{}.{}", ARCHIVE_STEM, extension));

  info!(url = %url, path = ?dest_path, "fetching archive");

  let response = reqwest::get(url)
    .await
    .map_err(|e| BuildError::transient(format!("failed to fetch {}", url), Some(Box::new(e))))?;

  if !response.status().is_success() {
    return Err(BuildError::transient(
      format!("failed to fetch {}: HTTP {}", url, response.status()),
      None,
    ));
  }

  let bytes = response
    .bytes()
    .await
    .map_err(|e| BuildError::transient(format!("failed to read body of {}", url), Some(Box::new(e))))?;

  let mut file = fs::File::create(&dest_path).await.at_path(&dest_path)?;
  file.write_all(&bytes).await.at_path(&dest_path)?;
  file.flush().await.at_path(&dest_path)?;

  debug!(path = ?dest_path, size = bytes.len(), "download complete");

  Ok(dest_path)
}
