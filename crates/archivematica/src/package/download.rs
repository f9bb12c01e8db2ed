//! Streaming package downloads.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use futures_util::StreamExt;
use regex::Regex;
use reqwest::Response;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::error::{Error, FilesystemError};

/// Size of the write buffer used while copying the body to disk.
pub const CHUNK_SIZE: usize = 4096;

static DISPOSITION_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"filename="([^"]+)""#).expect("disposition regex is valid")
});

static COMPRESSED_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^application/x-([^-]+)-compressed$").expect("content type regex is valid")
});

/// Guess an archive extension from a `Content-Type` value.
///
/// ```
/// use archivematica::package::content_type_to_extension;
///
/// assert_eq!(content_type_to_extension("application/x-gzip-compressed"), "gz");
/// assert_eq!(content_type_to_extension("application/x-zip-compressed"), "zip");
/// assert_eq!(content_type_to_extension("image/tiff"), "7z");
/// ```
pub fn content_type_to_extension(content_type: &str) -> String {
    let mime = content_type.split(';').next().unwrap_or_default().trim();

    if mime.eq_ignore_ascii_case("application/x-bzip2") {
        return "bz2".to_string();
    }
    if mime.eq_ignore_ascii_case("application/x-gzip-compressed") {
        return "gz".to_string();
    }
    if mime.eq_ignore_ascii_case("application/x-tar") {
        return "tar".to_string();
    }
    if let Some(caps) = COMPRESSED_TYPE.captures(mime) {
        return caps[1].to_ascii_lowercase();
    }
    "7z".to_string()
}

/// Extract the quoted `filename` from a `Content-Disposition` value.
///
/// Only the final path component is kept, so a server cannot direct the
/// write outside the destination directory.
pub fn disposition_filename(disposition: &str) -> Option<String> {
    let caps = DISPOSITION_FILENAME.captures(disposition)?;
    let name = caps[1].rsplit(|c: char| c == '/' || c == '\\').next()?.trim();

    match name {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

/// Pick the filename for a package download.
///
/// A `Content-Disposition` header wins, even when it carries no usable
/// filename. Otherwise the extension is guessed from `Content-Type`, and
/// `package-<uuid>.7z` is the fallback.
pub fn download_filename(response: &Response, uuid: &str) -> String {
    let headers = response.headers();
    let fallback = format!("package-{}.7z", uuid);

    if let Some(disposition) = headers.get(CONTENT_DISPOSITION) {
        return disposition
            .to_str()
            .ok()
            .and_then(disposition_filename)
            .unwrap_or(fallback);
    }

    match headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
        Some(content_type) => format!("package-{}.{}", uuid, content_type_to_extension(content_type)),
        None => fallback,
    }
}

/// A temporary file in the destination directory that the body is written
/// to before it is moved to its final name. Dropping it removes the file.
#[derive(Debug)]
pub(crate) struct Staging {
    file: std::fs::File,
    path: TempPath,
}

/// Fail unless `directory` exists, is a directory and accepts new files.
///
/// Writability is proven by creating the staging file, so the caller can
/// rely on it before sending any request.
pub(crate) async fn stage_in(directory: &Path) -> Result<Staging, Error> {
    let unusable = || -> Error {
        FilesystemError::UnusableDirectory {
            path: directory.to_path_buf(),
        }
        .into()
    };

    match tokio::fs::metadata(directory).await {
        Ok(meta) if meta.is_dir() => {}
        _ => return Err(unusable()),
    }

    let staged = tempfile::Builder::new()
        .prefix(".download-")
        .suffix(".part")
        .tempfile_in(directory)
        .map_err(|e| {
            debug!(directory = %directory.display(), error = %e, "directory is not writable");
            unusable()
        })?;
    let (file, path) = staged.into_parts();
    Ok(Staging { file, path })
}

/// Write the response body into `staging` and move it to `path`, replacing
/// any existing file.
///
/// On failure the staging file is removed and nothing is left at `path`.
pub(crate) async fn save_response(
    response: Response,
    staging: Staging,
    path: &Path,
) -> Result<u64, Error> {
    let Staging { file, path: staged } = staging;

    let written = stream_to_file(File::from_std(file), response, &staged).await?;
    staged
        .persist(path)
        .map_err(|e| io_error(path, e.error))?;
    Ok(written)
}

async fn stream_to_file(file: File, response: Response, path: &Path) -> Result<u64, Error> {
    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| io_error(path, std::io::Error::other(e)))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| io_error(path, e))?;
        written += chunk.len() as u64;
    }

    writer.flush().await.map_err(|e| io_error(path, e))?;
    Ok(written)
}

/// Join the chosen filename onto the destination directory.
pub(crate) fn destination(directory: &Path, filename: &str) -> PathBuf {
    directory.join(filename)
}

fn io_error(path: &Path, source: std::io::Error) -> Error {
    FilesystemError::Io {
        path: path.to_path_buf(),
        source,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_content_types() {
        assert_eq!(content_type_to_extension("application/x-bzip2"), "bz2");
        assert_eq!(content_type_to_extension("APPLICATION/X-TAR"), "tar");
        assert_eq!(content_type_to_extension("application/x-7z-compressed"), "7z");
        assert_eq!(content_type_to_extension("application/x-gzip-compressed; charset=binary"), "gz");
    }

    #[test]
    fn unknown_content_types_fall_back_to_7z() {
        assert_eq!(content_type_to_extension("image/tiff"), "7z");
        assert_eq!(content_type_to_extension("application/x-tar-gz-compressed"), "7z");
        assert_eq!(content_type_to_extension(""), "7z");
    }

    #[test]
    fn disposition_filename_is_extracted() {
        assert_eq!(
            disposition_filename(r#"attachment; filename="x.tar""#).as_deref(),
            Some("x.tar")
        );
        assert_eq!(disposition_filename("attachment"), None);
    }

    #[test]
    fn disposition_filename_drops_directories() {
        assert_eq!(
            disposition_filename(r#"attachment; filename="../../etc/passwd""#).as_deref(),
            Some("passwd")
        );
        assert_eq!(
            disposition_filename(r#"attachment; filename="dir\pkg.7z""#).as_deref(),
            Some("pkg.7z")
        );
        assert_eq!(disposition_filename(r#"attachment; filename="..""#), None);
    }

    #[tokio::test]
    async fn missing_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = stage_in(&missing).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Filesystem(FilesystemError::UnusableDirectory { .. })
        ));
    }

    #[tokio::test]
    async fn files_are_not_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();
        assert!(stage_in(&file).await.is_err());
        assert!(stage_in(dir.path()).await.is_ok());
    }

    #[tokio::test]
    async fn staging_file_is_removed_when_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let staging = stage_in(dir.path()).await.unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

        drop(staging);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn read_only_directory_is_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

        // root ignores directory modes, so only assert when the mode is enforced.
        let enforced = std::fs::File::create(locked.join("x")).is_err();
        let result = stage_in(&locked).await;
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        if enforced {
            assert!(matches!(
                result.unwrap_err(),
                Error::Filesystem(FilesystemError::UnusableDirectory { .. })
            ));
        }
    }
}
