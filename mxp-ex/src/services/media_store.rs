//! Upload storage
//!
//! Decides whether an uploaded file name is a supported image or video,
//! streams the body into the media folder and describes the stored file.

use futures::{Stream, StreamExt};
use mxp_common::MediaKind;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "gif", "tif", "tiff"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "m4v"];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unsupported file type: {0}")]
    UnsupportedMediaType(String),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("Upload interrupted: {0}")]
    Upload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Media kind from a file name's extension (case-insensitive)
pub fn detect_file_type(file_name: &str) -> Option<MediaKind> {
    let ext = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();

    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// Final path component of a client-supplied name
///
/// Strips any directories (either separator) so uploads cannot escape the
/// media folder.
pub fn sanitize_file_name(raw: &str) -> Result<String, StoreError> {
    let name = raw
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return Err(StoreError::InvalidFileName(raw.to_string()));
    }
    Ok(name.to_string())
}

/// A file written into the media folder
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub file_name: String,
    pub path: PathBuf,
    /// URL path the file is served under
    pub public_path: String,
    pub size: u64,
    pub kind: MediaKind,
    /// MIME type sniffed from content, or derived from the extension
    pub content_type: String,
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    dir: PathBuf,
}

impl MediaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the media folder if missing
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    /// Validate the name and stream `body` into the media folder
    ///
    /// Unsupported extensions are rejected before anything is written.
    pub async fn save_stream<S, B, E>(&self, raw_name: &str, body: S) -> Result<StoredFile, StoreError>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: Display,
    {
        let file_name = sanitize_file_name(raw_name)?;
        let kind = detect_file_type(&file_name)
            .ok_or_else(|| StoreError::UnsupportedMediaType(file_name.clone()))?;

        let path = self.dir.join(&file_name);
        let file = tokio::fs::File::create(&path).await?;

        // Nothing partial stays behind, whichever side failed
        let (size, sniffed) = match write_body(file, body).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                    tracing::warn!(
                        path = %path.display(),
                        error = %remove_err,
                        "Failed to remove partial upload"
                    );
                }
                return Err(e);
            }
        };

        let content_type = match sniffed {
            Some(mime) => {
                if !mime.starts_with(kind.as_str()) {
                    tracing::warn!(
                        file = %file_name,
                        sniffed = mime,
                        media_kind = %kind,
                        "Content does not match file extension"
                    );
                }
                mime.to_string()
            }
            None => fallback_content_type(kind, &file_name),
        };

        tracing::info!(
            file = %file_name,
            path = %path.display(),
            size,
            content_type = %content_type,
            "Upload stored"
        );

        Ok(StoredFile {
            public_path: format!("/media/{}", file_name),
            file_name,
            path,
            size,
            kind,
            content_type,
        })
    }
}

/// Copy `body` into `file`, sniffing the MIME type from the first chunk
async fn write_body<W, S, B, E>(
    mut file: W,
    body: S,
) -> Result<(u64, Option<&'static str>), StoreError>
where
    W: AsyncWrite + Unpin,
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let mut body = std::pin::pin!(body);
    let mut size: u64 = 0;
    let mut sniffed = None;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| StoreError::Upload(e.to_string()))?;
        let bytes = chunk.as_ref();
        if size == 0 && !bytes.is_empty() {
            sniffed = infer::get(bytes).map(|t| t.mime_type());
        }
        file.write_all(bytes).await?;
        size += bytes.len() as u64;
    }
    file.flush().await?;

    Ok((size, sniffed))
}

fn fallback_content_type(kind: MediaKind, file_name: &str) -> String {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let subtype = match ext.as_str() {
        "jpg" => "jpeg",
        "tif" => "tiff",
        "mov" => "quicktime",
        "mkv" => "x-matroska",
        "avi" => "x-msvideo",
        "m4v" => "x-m4v",
        other => other,
    };
    format!("{}/{}", kind, subtype)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_detect_file_type() {
        assert_eq!(detect_file_type("cow.PNG"), Some(MediaKind::Image));
        assert_eq!(detect_file_type("lion.mp4"), Some(MediaKind::Video));
        assert_eq!(detect_file_type("notes.txt"), None);
        assert_eq!(detect_file_type("noextension"), None);
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd.png").unwrap(), "passwd.png");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\a.jpg").unwrap(), "a.jpg");
        assert!(sanitize_file_name("dir/").is_err());
        assert!(sanitize_file_name("..").is_err());
    }

    #[test]
    fn test_fallback_content_type() {
        assert_eq!(fallback_content_type(MediaKind::Video, "a.MOV"), "video/quicktime");
        assert_eq!(fallback_content_type(MediaKind::Image, "a.jpg"), "image/jpeg");
    }

    #[tokio::test]
    async fn test_save_stream_writes_file() {
        let dir = TempDir::new().unwrap();
        let store = MediaStore::new(dir.path());
        let png_header: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        let chunks = vec![Ok::<_, std::io::Error>(png_header), Ok(vec![1, 2, 3])];

        let stored = store
            .save_stream("sub/cow.png", futures::stream::iter(chunks))
            .await
            .unwrap();

        assert_eq!(stored.file_name, "cow.png");
        assert_eq!(stored.public_path, "/media/cow.png");
        assert_eq!(stored.size, 13);
        assert_eq!(stored.kind, MediaKind::Image);
        assert_eq!(stored.content_type, "image/png");
        assert_eq!(std::fs::metadata(dir.path().join("cow.png")).unwrap().len(), 13);
    }

    #[tokio::test]
    async fn test_unsupported_extension_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = MediaStore::new(dir.path());
        let chunks = vec![Ok::<_, std::io::Error>(b"hello".to_vec())];

        let err = store
            .save_stream("notes.txt", futures::stream::iter(chunks))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::UnsupportedMediaType(_)));
        assert!(!dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_stream_error_removes_partial_file() {
        let dir = TempDir::new().unwrap();
        let store = MediaStore::new(dir.path());
        let chunks = vec![
            Ok(b"first chunk".to_vec()),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "client went away")),
        ];

        let err = store
            .save_stream("clip.mp4", futures::stream::iter(chunks))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Upload(_)), "got {:?}", err);
        assert!(!dir.path().join("clip.mp4").exists());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_write_failure_removes_partial_file() {
        if !Path::new("/dev/full").exists() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let store = MediaStore::new(dir.path());
        let target = dir.path().join("cow.png");
        // Every write to /dev/full fails with ENOSPC
        std::os::unix::fs::symlink("/dev/full", &target).unwrap();
        let chunks = vec![Ok::<_, std::io::Error>(vec![0u8; 64 * 1024])];

        let err = store
            .save_stream("cow.png", futures::stream::iter(chunks))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Io(_)), "got {:?}", err);
        assert!(std::fs::symlink_metadata(&target).is_err());
    }

    #[tokio::test]
    async fn test_write_body_surfaces_writer_error() {
        struct FailingWriter;

        impl AsyncWrite for FailingWriter {
            fn poll_write(
                self: std::pin::Pin<&mut Self>,
                _cx: &mut std::task::Context<'_>,
                _buf: &[u8],
            ) -> std::task::Poll<std::io::Result<usize>> {
                std::task::Poll::Ready(Err(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )))
            }

            fn poll_flush(
                self: std::pin::Pin<&mut Self>,
                _cx: &mut std::task::Context<'_>,
            ) -> std::task::Poll<std::io::Result<()>> {
                std::task::Poll::Ready(Ok(()))
            }

            fn poll_shutdown(
                self: std::pin::Pin<&mut Self>,
                _cx: &mut std::task::Context<'_>,
            ) -> std::task::Poll<std::io::Result<()>> {
                std::task::Poll::Ready(Ok(()))
            }
        }

        let chunks = vec![Ok::<_, std::io::Error>(b"data".to_vec())];
        let err = write_body(FailingWriter, futures::stream::iter(chunks))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Io(_)), "got {:?}", err);
    }
}
