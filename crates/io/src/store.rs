// Spreadsheet blob store collaborators
//
// The pipelines only need fetch/put of named byte blobs. An absent blob
// means "nothing uploaded yet" and reads as Ok(None), which callers keep
// distinct from every parse failure.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug)]
pub enum StoreError {
    /// The backing store cannot be reached (missing credential, bad root).
    Unavailable(String),
    /// IO error while reading or writing a blob.
    Io(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
            Self::Io(msg) => write!(f, "store IO error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

pub trait SpendStore {
    /// Fetch a named blob. Absent blobs are `Ok(None)`, not an error.
    fn fetch(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store a named blob, overwriting, and return its location.
    fn put(&self, name: &str, bytes: &[u8]) -> Result<String, StoreError>;
}

/// Directory-backed store for local runs and tests.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SpendStore for DirStore {
    fn fetch(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.root.join(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }

    fn put(&self, name: &str, bytes: &[u8]) -> Result<String, StoreError> {
        fs::create_dir_all(&self.root).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let path = self.root.join(name);
        fs::write(&path, bytes).map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        let location = store.put("FormattedAnnualBudget.xlsx", b"bytes").unwrap();
        assert!(location.ends_with("FormattedAnnualBudget.xlsx"));
        let fetched = store.fetch("FormattedAnnualBudget.xlsx").unwrap();
        assert_eq!(fetched.as_deref(), Some(b"bytes".as_slice()));
    }

    #[test]
    fn absent_blob_is_none_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::new(dir.path());
        assert!(store.fetch("missing.xlsx").unwrap().is_none());
    }
}
