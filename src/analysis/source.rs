//! Text acquisition from uploaded files.

use tracing::{debug, warn};

use super::AnalysisError;
use crate::utils::{is_plain_text, mime_essence, sniff_binary};

/// A file received from the user.
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    /// Declared content type, as sent by the client.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: Option<&str>, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.map(str::to_string),
            content_type: content_type.map(str::to_string),
            bytes,
        }
    }

    /// Read a file from disk, guessing its type from the extension.
    pub async fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let content_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string());
        Ok(Self {
            file_name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
            content_type,
            bytes,
        })
    }

    /// Effective content type: the declared one, else a guess from the name.
    pub fn effective_type(&self) -> String {
        if let Some(declared) = self.content_type.as_deref().filter(|t| !t.trim().is_empty()) {
            return mime_essence(declared);
        }
        self.file_name
            .as_deref()
            .and_then(|name| mime_guess::from_path(name).first())
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string())
    }
}

/// Decode an uploaded plain-text file.
///
/// Only `text/plain` is accepted. Bytes that look like a known binary
/// format are rejected even when declared as text. Invalid UTF-8 is
/// replaced and a leading BOM is dropped.
pub fn read_text(file: &UploadedFile) -> Result<String, AnalysisError> {
    let content_type = file.effective_type();
    if !is_plain_text(&content_type) {
        debug!(content_type = %content_type, "Rejecting upload");
        return Err(AnalysisError::UnsupportedFileType(content_type));
    }

    if let Some(detected) = sniff_binary(&file.bytes) {
        warn!(
            file = file.file_name.as_deref().unwrap_or("<unnamed>"),
            detected, "File declared as text but looks binary"
        );
        return Err(AnalysisError::UnsupportedFileType(detected.to_string()));
    }

    let text = String::from_utf8_lossy(&file.bytes);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_read_verbatim() {
        let file = UploadedFile::new(Some("a.txt"), Some("text/plain"), b"hello world".to_vec());
        assert_eq!(read_text(&file).unwrap(), "hello world");
    }

    #[test]
    fn test_charset_parameter_ignored() {
        let file = UploadedFile::new(None, Some("text/plain; charset=utf-8"), b"x\ny".to_vec());
        assert_eq!(read_text(&file).unwrap(), "x\ny");
    }

    #[test]
    fn test_rejects_other_types() {
        for ct in ["image/png", "application/pdf", "text/html", "text/markdown"] {
            let file = UploadedFile::new(None, Some(ct), b"data".to_vec());
            match read_text(&file) {
                Err(AnalysisError::UnsupportedFileType(t)) => assert_eq!(t, ct),
                other => panic!("expected rejection for {ct}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_missing_type_guessed_from_name() {
        let file = UploadedFile::new(Some("notes.txt"), None, b"notes".to_vec());
        assert_eq!(read_text(&file).unwrap(), "notes");

        let file = UploadedFile::new(Some("photo.jpg"), Some(""), b"x".to_vec());
        assert!(matches!(
            read_text(&file),
            Err(AnalysisError::UnsupportedFileType(t)) if t == "image/jpeg"
        ));

        let file = UploadedFile::new(None, None, b"x".to_vec());
        assert!(read_text(&file).is_err());
    }

    #[test]
    fn test_binary_declared_as_text_rejected() {
        let png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        let file = UploadedFile::new(Some("sneaky.txt"), Some("text/plain"), png);
        assert!(matches!(
            read_text(&file),
            Err(AnalysisError::UnsupportedFileType(t)) if t == "image/png"
        ));
    }

    #[test]
    fn test_bom_and_invalid_utf8() {
        let mut bytes = "\u{feff}caf".as_bytes().to_vec();
        bytes.push(0xff);
        let file = UploadedFile::new(None, Some("text/plain"), bytes);
        assert_eq!(read_text(&file).unwrap(), "caf\u{fffd}");
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("article.txt");
        std::fs::write(&path, "Article body").unwrap();

        let file = UploadedFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name.as_deref(), Some("article.txt"));
        assert_eq!(file.content_type.as_deref(), Some("text/plain"));
        assert_eq!(read_text(&file).unwrap(), "Article body");
    }
}
