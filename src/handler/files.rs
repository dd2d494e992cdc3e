//! File responder
//!
//! Opens a resolved path and loads it as a [`Document`]. The handle is closed
//! before this returns.

use std::io::ErrorKind;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use super::{replies, Document};
use crate::error::FetchError;
use crate::http::mime;

/// Load a file for upload
///
/// `token` is what the requester typed; it is only used in the not-found
/// message. Files larger than `max_size` are refused before any read.
pub async fn load_document(
    path: &Path,
    token: &str,
    max_size: u64,
) -> Result<Document, FetchError> {
    let io_error = |source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = match File::open(path).await {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(FetchError::FileNotFound {
                path: path.to_path_buf(),
                token: token.to_string(),
            });
        }
        Err(e) => return Err(io_error(e)),
    };

    let metadata = file.metadata().await.map_err(io_error)?;
    if !metadata.is_file() {
        return Err(io_error(std::io::Error::other("not a regular file")));
    }
    if metadata.len() > max_size {
        return Err(FetchError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit: max_size,
        });
    }

    let mut content = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or(0));
    file.read_to_end(&mut content).await.map_err(io_error)?;
    drop(file);

    let file_name = path
        .file_name()
        .map_or_else(|| "file".to_string(), |n| n.to_string_lossy().into_owned());
    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));

    Ok(Document {
        path: path.to_path_buf(),
        file_name,
        content_type,
        bytes: content.into(),
        caption: replies::document_caption(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_existing_file() {
        let mut file = tempfile::Builder::new().suffix(".log").tempfile().unwrap();
        file.write_all(b"2024-01-01 boot ok\n").unwrap();

        let doc = load_document(file.path(), "me", 1024).await.unwrap();
        assert_eq!(&doc.bytes[..], b"2024-01-01 boot ok\n");
        assert_eq!(doc.content_type, "text/plain; charset=utf-8");
        assert!(doc.file_name.ends_with(".log"));
        assert!(doc.caption.contains(&file.path().display().to_string()));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.log");
        match load_document(&path, "gone", 1024).await {
            Err(FetchError::FileNotFound { path: p, token }) => {
                assert_eq!(p, path);
                assert_eq!(token, "gone");
            }
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_document(dir.path(), "dir", 1024).await,
            Err(FetchError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_size_limit() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 64]).unwrap();
        assert!(matches!(
            load_document(file.path(), "big", 16).await,
            Err(FetchError::FileTooLarge { size: 64, limit: 16, .. })
        ));
    }
}
