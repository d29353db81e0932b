//! Archive extraction.
//!
//! Archives are always opened as zip containers, whatever extension the
//! source URL carried. A `.tar.gz` download therefore fails here with a
//! configuration error instead of being unpacked.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{BuildError, IoResultExt, Result};

/// Unpack `archive_path` into `dest`, keeping the archive's own layout.
pub fn extract_archive(archive_path: &Path, dest: &Path) -> Result<()> {
  let is_zip = archive_path
    .extension()
    .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
  if !is_zip {
    warn!(path = ?archive_path, "archive extension is not zip, unpacking as zip anyway");
  }

  info!(archive = ?archive_path, dest = ?dest, "unpacking archive");
  fs::create_dir_all(dest).at_path(dest)?;
  unpack_zip(archive_path, dest)
}

fn unpack_zip(archive_path: &Path, dest: &Path) -> Result<()> {
  let file = File::open(archive_path).at_path(archive_path)?;
  let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(|e| {
    BuildError::configuration_with(format!("failed to open zip archive {}", archive_path.display()), e)
  })?;

  for i in 0..archive.len() {
    let mut file = archive
      .by_index(i)
      .map_err(|e| BuildError::configuration_with("failed to read zip entry", e))?;

    let relative = file
      .enclosed_name()
      .ok_or_else(|| BuildError::configuration(format!("unsafe zip entry name: {}", file.name())))?;

    let dest_path = dest.join(&relative);

    if file.is_dir() {
      fs::create_dir_all(&dest_path).at_path(&dest_path)?;
      continue;
    }

    if let Some(parent) = dest_path.parent() {
      fs::create_dir_all(parent).at_path(parent)?;
    }

    let mut outfile = File::create(&dest_path).at_path(&dest_path)?;
    std::io::copy(&mut file, &mut outfile).at_path(&dest_path)?;

    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      if let Some(mode) = file.unix_mode() {
        fs::set_permissions(&dest_path, fs::Permissions::from_mode(mode)).at_path(&dest_path)?;
      }
    }
  }

  debug!(entries = archive.len(), dest = ?dest, "archive unpacked");
  Ok(())
}
