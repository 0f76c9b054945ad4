//! Request-scoped storage for uploaded payloads.
//!
//! Each upload gets its own randomly named file in the upload directory; the
//! client-supplied filename never takes part in the storage key. The file is
//! removed when the returned [`StagedUpload`] is dropped.

use crate::document::{Document, DocumentKind};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write the payload to a fresh file owned by the returned guard.
    pub fn stage(&self, document: &Document, kind: DocumentKind) -> io::Result<StagedUpload> {
        std::fs::create_dir_all(&self.dir)?;

        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&format!(".{}", kind.extension()))
            .tempfile_in(&self.dir)?;
        file.write_all(&document.data)?;
        file.flush()?;

        tracing::debug!(
            "UploadStore: staged '{}' ({} bytes) at {:?}",
            document.filename,
            document.data.len(),
            file.path()
        );
        Ok(StagedUpload { file })
    }
}

/// A staged upload. Dropping it deletes the file.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn read(&self) -> io::Result<Vec<u8>> {
        std::fs::read(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    #[test]
    fn test_stage_and_read_back() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());
        let doc = Document::new("notes.txt", b"hello".to_vec());

        let staged = store.stage(&doc, DocumentKind::PlainText).unwrap();
        assert!(staged.path().starts_with(tmp.path()));
        assert_eq!(staged.read().unwrap(), b"hello");
    }

    #[test]
    fn test_removed_on_drop() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());
        let doc = Document::new("notes.txt", b"hello".to_vec());

        let staged = store.stage(&doc, DocumentKind::PlainText).unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());
        drop(staged);
        assert!(!path.exists());
        assert_eq!(entries(tmp.path()), 0);
    }

    #[test]
    fn test_same_filename_does_not_collide() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());
        let first = Document::new("invoice.pdf", b"first".to_vec());
        let second = Document::new("invoice.pdf", b"second".to_vec());

        let a = store.stage(&first, DocumentKind::Pdf).unwrap();
        let b = store.stage(&second, DocumentKind::Pdf).unwrap();
        assert_ne!(a.path(), b.path());
        assert_eq!(std::fs::read(a.path()).unwrap(), b"first");
        assert_eq!(std::fs::read(b.path()).unwrap(), b"second");
    }

    #[test]
    fn test_storage_key_ignores_filename() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());
        let doc = Document::new("../../etc/passwd.txt", b"x".to_vec());

        let staged = store.stage(&doc, DocumentKind::PlainText).unwrap();
        assert_eq!(staged.path().parent().unwrap(), tmp.path());
        let name = staged.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("upload-"));
        assert!(!name.contains("passwd"));
    }

    #[test]
    fn test_creates_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path().join("nested").join("uploads"));
        let doc = Document::new("a.txt", b"x".to_vec());
        let staged = store.stage(&doc, DocumentKind::PlainText).unwrap();
        assert!(staged.path().exists());
    }
}
