//! Persistence for the messaging session's credential material.
//!
//! The blob is opaque to this bot; it is whatever the transport reports and
//! must survive a process restart. Writes are synchronous so the credentials
//! are on disk before the next session event is consumed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const CREDS_FILE: &str = "session.creds";

pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Previously persisted credentials, if any.
    pub fn load(&self) -> Option<Vec<u8>> {
        fs::read(self.dir.join(CREDS_FILE)).ok()
    }

    pub fn save(&self, blob: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(CREDS_FILE), blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_without_prior_save_is_none() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join("auth"));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join("auth"));
        store.save(b"opaque blob").unwrap();
        assert_eq!(store.load().unwrap(), b"opaque blob");
    }

    #[test]
    fn test_save_overwrites_previous_blob() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());
        store.save(b"first").unwrap();
        store.save(b"second").unwrap();
        assert_eq!(store.load().unwrap(), b"second");
    }
}
