//! # Export Gateway
//!
//! Hands a finished print to the outside world.
//!
//! ```text
//!                  share_capable?
//!                 ┌──── yes ────→ share ──→ Ok ─────────→ Shared
//! PrintArtifact ──┤                  │ ├──→ Cancelled ──→ Cancelled
//!                 │                  │ └──→ Failed ──┐
//!                 └──── no ──────────┴───────────────┴──→ download ──→ Downloaded(path)
//!                                                                 └──→ ExportError::Failed
//! ```
//!
//! The artifact is only borrowed, so a failed export can be retried without
//! composing again.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::codec::JPEG_MIME;
use crate::compose::PrintArtifact;
use crate::error::{ExportError, ShareError};

pub const SHARE_TITLE: &str = "My Digital Polaroid";
pub const DEFAULT_SHARE_TEXT: &str = "Check out my polaroid!";

/// Encoded print plus everything a share sheet or a download needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime: &'static str,
    pub title: &'static str,
    pub text: String,
}

impl ExportFile {
    pub fn from_artifact(artifact: &PrintArtifact) -> Self {
        let caption = artifact.style.caption.trim();
        Self {
            bytes: artifact.encoded.clone(),
            filename: export_filename(caption, artifact.captured_at.timestamp_millis()),
            mime: JPEG_MIME,
            title: SHARE_TITLE,
            text: if caption.is_empty() {
                DEFAULT_SHARE_TEXT.to_string()
            } else {
                caption.to_string()
            },
        }
    }
}

/// How an export ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Shared,
    Downloaded(PathBuf),
    Cancelled,
}

/// Host side of an export: a native share sheet and a plain download.
#[async_trait]
pub trait ExportTarget: Send + Sync {
    async fn share(&self, file: &ExportFile) -> Result<(), ShareError>;

    async fn download(&self, file: &ExportFile) -> std::io::Result<PathBuf>;
}

/// Downloads into a directory. Has no share sheet.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ExportTarget for DirectoryTarget {
    async fn share(&self, _file: &ExportFile) -> Result<(), ShareError> {
        Err(ShareError::Failed("sharing is not available here".to_string()))
    }

    async fn download(&self, file: &ExportFile) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(&file.filename);
        tokio::fs::write(&path, &file.bytes).await?;
        Ok(path)
    }
}

/// Chooses between sharing and downloading.
#[derive(Debug, Clone)]
pub struct ExportGateway<T> {
    target: T,
}

impl<T: ExportTarget> ExportGateway<T> {
    pub fn new(target: T) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub async fn export(
        &self,
        artifact: &PrintArtifact,
        share_capable: bool,
    ) -> Result<ExportOutcome, ExportError> {
        let file = ExportFile::from_artifact(artifact);

        let share_failure = if share_capable {
            match self.target.share(&file).await {
                Ok(()) => {
                    tracing::info!(filename = %file.filename, "print shared");
                    return Ok(ExportOutcome::Shared);
                }
                Err(ShareError::Cancelled) => {
                    tracing::debug!("share cancelled by user");
                    return Ok(ExportOutcome::Cancelled);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "share failed, falling back to download");
                    Some(e)
                }
            }
        } else {
            None
        };

        match self.target.download(&file).await {
            Ok(path) => {
                tracing::info!(path = %path.display(), "print downloaded");
                Ok(ExportOutcome::Downloaded(path))
            }
            Err(e) => {
                let cause = match share_failure {
                    Some(share) => format!("{}; download failed: {}", share, e),
                    None => format!("download failed: {}", e),
                };
                Err(ExportError::Failed { cause })
            }
        }
    }
}

/// `polaroid-<caption>.jpg`, or `polaroid-<millis>.jpg` when the caption has
/// nothing usable.
///
/// Non-alphanumerics are stripped and the result is lowercased, except that
/// words stay separated by a single `-`: "Hello World" gives
/// `polaroid-hello-world.jpg`, not `polaroid-helloworld.jpg`.
pub fn export_filename(caption: &str, fallback_millis: i64) -> String {
    let mut slug = String::new();
    for word in caption.split_whitespace() {
        let clean: String = word
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if clean.is_empty() {
            continue;
        }
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(&clean);
    }

    if slug.is_empty() {
        format!("polaroid-{}.jpg", fallback_millis)
    } else {
        format!("polaroid-{}.jpg", slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleParameters;
    use chrono::{TimeZone, Utc};
    use image::RgbaImage;
    use std::sync::Mutex;

    /// Scripted target recording every call.
    struct FakeTarget {
        share: Result<(), ShareError>,
        download_ok: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl FakeTarget {
        fn new(share: Result<(), ShareError>, download_ok: bool) -> Self {
            Self {
                share,
                download_ok,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ExportTarget for FakeTarget {
        async fn share(&self, _file: &ExportFile) -> Result<(), ShareError> {
            self.calls.lock().unwrap().push("share");
            self.share.clone()
        }

        async fn download(&self, file: &ExportFile) -> std::io::Result<PathBuf> {
            self.calls.lock().unwrap().push("download");
            if self.download_ok {
                Ok(PathBuf::from(&file.filename))
            } else {
                Err(std::io::Error::other("disk full"))
            }
        }
    }

    fn artifact(caption: &str) -> PrintArtifact {
        PrintArtifact {
            image: RgbaImage::new(1, 1),
            encoded: vec![0xFF, 0xD8],
            style: StyleParameters {
                caption: caption.to_string(),
                ..StyleParameters::default()
            },
            captured_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            filter: None,
        }
    }

    #[test]
    fn test_filename_from_caption() {
        assert_eq!(export_filename("Hello World!", 0), "polaroid-hello-world.jpg");
        assert_eq!(export_filename("  Beach   day, 2024 ", 0), "polaroid-beach-day-2024.jpg");
        assert_eq!(export_filename("Rock'n'Roll", 0), "polaroid-rocknroll.jpg");
        assert_eq!(export_filename("é ü", 7), "polaroid-7.jpg");
        assert_eq!(export_filename("", 1704110400000), "polaroid-1704110400000.jpg");
    }

    #[test]
    fn test_share_payload() {
        let file = ExportFile::from_artifact(&artifact(""));
        assert_eq!(file.title, "My Digital Polaroid");
        assert_eq!(file.text, "Check out my polaroid!");
        assert_eq!(file.mime, "image/jpeg");
        assert_eq!(file.filename, "polaroid-1704110400000.jpg");

        let file = ExportFile::from_artifact(&artifact("Sunset"));
        assert_eq!(file.text, "Sunset");
    }

    #[tokio::test]
    async fn test_share_success() {
        let gateway = ExportGateway::new(FakeTarget::new(Ok(()), true));
        let outcome = gateway.export(&artifact("a"), true).await.unwrap();
        assert_eq!(outcome, ExportOutcome::Shared);
        assert_eq!(gateway.target().calls(), vec!["share"]);
    }

    #[tokio::test]
    async fn test_cancel_is_not_an_error_and_skips_download() {
        let gateway = ExportGateway::new(FakeTarget::new(Err(ShareError::Cancelled), true));
        let outcome = gateway.export(&artifact("a"), true).await.unwrap();
        assert_eq!(outcome, ExportOutcome::Cancelled);
        assert_eq!(gateway.target().calls(), vec!["share"]);
    }

    #[tokio::test]
    async fn test_share_failure_falls_back_to_download() {
        let gateway =
            ExportGateway::new(FakeTarget::new(Err(ShareError::Failed("boom".into())), true));
        let outcome = gateway.export(&artifact("a b"), true).await.unwrap();
        assert_eq!(outcome, ExportOutcome::Downloaded(PathBuf::from("polaroid-a-b.jpg")));
        assert_eq!(gateway.target().calls(), vec!["share", "download"]);
    }

    #[tokio::test]
    async fn test_not_share_capable_downloads_directly() {
        let gateway = ExportGateway::new(FakeTarget::new(Ok(()), true));
        let outcome = gateway.export(&artifact("a"), false).await.unwrap();
        assert!(matches!(outcome, ExportOutcome::Downloaded(_)));
        assert_eq!(gateway.target().calls(), vec!["download"]);
    }

    #[tokio::test]
    async fn test_both_failing_surfaces_cause_and_is_retryable() {
        let gateway =
            ExportGateway::new(FakeTarget::new(Err(ShareError::Failed("boom".into())), false));
        let print = artifact("a");
        let err = gateway.export(&print, true).await.unwrap_err();
        let ExportError::Failed { cause } = err;
        assert!(cause.contains("boom"));
        assert!(cause.contains("disk full"));

        // Same artifact can be exported again.
        assert!(gateway.export(&print, true).await.is_err());
        assert_eq!(gateway.target().calls().len(), 4);
    }

    #[tokio::test]
    async fn test_directory_target_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = ExportGateway::new(DirectoryTarget::new(dir.path()));
        let outcome = gateway.export(&artifact("Hi"), false).await.unwrap();
        let path = dir.path().join("polaroid-hi.jpg");
        assert_eq!(outcome, ExportOutcome::Downloaded(path.clone()));
        assert_eq!(std::fs::read(path).unwrap(), vec![0xFF, 0xD8]);
    }
}
