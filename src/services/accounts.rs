//! Account index service: maintains `accounts.json` under the public root.
//!
//! DESIGN
//! ======
//! The Show view reads the index once to learn which avatars exist. The
//! upload path registers an account the first time this process sees it:
//! read the document, set-insert the name, write it back. Names already
//! registered by this process skip the file entirely.
//!
//! The name is claimed in the in-memory set before the first await, so of
//! the twelve parallel uploads a client sends for a new account only one
//! touches the file. A failed write releases the claim, and the next upload
//! for that account tries again. The index is replaced by writing a sibling
//! temp file and renaming it over, so readers never see a truncated document.
//!
//! KNOWN GAP
//! =========
//! The read-modify-write is not serialized across accounts. Two first-time
//! uploads for different new accounts racing each other can lose one of the
//! names from the file. The lost account is not re-added until this process
//! restarts and sees another upload for it.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use gaze::accounts::{ACCOUNTS_FILE, AccountsDocument};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum AccountIndexError {
    #[error("account index io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("account index is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct AccountIndex {
    path: PathBuf,
    known: Mutex<HashSet<String>>,
}

impl AccountIndex {
    #[must_use]
    pub fn new(public_dir: &Path) -> Self {
        Self { path: public_dir.join(ACCOUNTS_FILE), known: Mutex::new(HashSet::new()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the index. A missing file reads as an empty document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(&self) -> Result<AccountsDocument, AccountIndexError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(AccountsDocument::parse(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(AccountsDocument::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Make sure `name` is listed in the index.
    ///
    /// Returns `true` when the file was rewritten to add the name.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be read, parsed or written.
    pub async fn register(&self, name: &str) -> Result<bool, AccountIndexError> {
        if !self.claim(name) {
            return Ok(false);
        }

        match self.append(name).await {
            Ok(added) => Ok(added),
            Err(e) => {
                self.release(name);
                Err(e)
            }
        }
    }

    async fn append(&self, name: &str) -> Result<bool, AccountIndexError> {
        let mut doc = self.load().await?;
        if !doc.insert(name) {
            return Ok(false);
        }

        let staging = self.path.with_file_name(format!("{ACCOUNTS_FILE}.{}.tmp", Uuid::new_v4()));
        tokio::fs::write(&staging, doc.to_json()?).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        info!(account = %name, total = doc.accounts.len(), "account registered");
        Ok(true)
    }

    /// Mark `name` as handled by this process. False if it already was.
    fn claim(&self, name: &str) -> bool {
        self.known
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(name.to_owned())
    }

    fn release(&self, name: &str) {
        self.known
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(name);
    }
}

#[cfg(test)]
#[path = "accounts_test.rs"]
mod tests;
