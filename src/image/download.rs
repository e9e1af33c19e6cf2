use super::ImageService;
use crate::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const DEFAULT_DOWNLOAD_FILENAME: &str = "kris-generated-image.png";

/// Fetch `url` and save it as `dir/filename`.
pub async fn download_image(
    service: &dyn ImageService,
    url: &str,
    dir: &Path,
    filename: Option<&str>,
) -> Result<PathBuf> {
    let filename = checked_filename(filename)?;
    let bytes = service.fetch(url).await?;
    let target = save_image(bytes, dir, Some(filename)).await?;

    tracing::info!("Saved image from {} to {}", url, target.display());
    Ok(target)
}

/// Write already-fetched image bytes to `dir/filename`.
///
/// The bytes are staged in a temporary file inside `dir` and then persisted
/// under the final name; the temporary file is removed if anything fails.
pub async fn save_image(bytes: Vec<u8>, dir: &Path, filename: Option<&str>) -> Result<PathBuf> {
    let target = dir.join(checked_filename(filename)?);

    tokio::task::spawn_blocking({
        let dir = dir.to_path_buf();
        let target = target.clone();
        move || save_bytes(&dir, &target, &bytes)
    })
    .await
    .map_err(|e| Error::Io(std::io::Error::other(format!("Save task join error: {}", e))))??;

    Ok(target)
}

fn checked_filename(filename: Option<&str>) -> Result<&str> {
    let filename = filename.unwrap_or(DEFAULT_DOWNLOAD_FILENAME);
    if Path::new(filename).file_name().and_then(|name| name.to_str()) != Some(filename) {
        return Err(Error::ImageService(format!(
            "Invalid download filename '{}'",
            filename
        )));
    }
    Ok(filename)
}

fn save_bytes(dir: &Path, target: &Path, bytes: &[u8]) -> Result<()> {
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.flush()?;
    staged.persist(target).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
