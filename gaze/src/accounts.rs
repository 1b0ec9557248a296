//! The `accounts.json` index and frame image naming.
//!
//! The upload server appends account names to this document; the Show view
//! fetches it once to learn which avatars exist and in what order. Unknown
//! top-level fields are carried through untouched.

#[cfg(test)]
#[path = "accounts_test.rs"]
mod accounts_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::table::{AvatarId, FrameIndex};

/// Public path of the account index, relative to the public root.
pub const ACCOUNTS_FILE: &str = "accounts.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountsDocument {
    #[serde(default)]
    pub accounts: Vec<AvatarId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccountsDocument {
    /// Parse the index document.
    ///
    /// # Errors
    ///
    /// Returns the underlying JSON error when `raw` is not a JSON object with
    /// an optional string-array `accounts` field.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Serialize back to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error only if an extra field cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.accounts.iter().any(|a| a == name)
    }

    /// Add `name` unless present. Existing order is kept; duplicates already
    /// in the document collapse to their first occurrence.
    pub fn insert(&mut self, name: &str) -> bool {
        self.dedup();
        if self.contains(name) {
            return false;
        }
        self.accounts.push(name.to_owned());
        true
    }

    fn dedup(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.accounts.retain(|a| seen.insert(a.clone()));
    }
}

/// Path of frame `index` for `account`, relative to the public root.
#[must_use]
pub fn frame_image_path(account: &str, index: FrameIndex) -> String {
    format!("{account}/f{index}.png")
}
