#![forbid(unsafe_code)]

//! Persisting which tours a user has finished.
//!
//! The navigation tour is recorded on the user profile; per-feature tours
//! are recorded under a workspace's `product_tour` properties, keyed by tour.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | File missing | First run | Empty document, nothing completed |
//! | Unreadable / corrupt JSON | Disk or manual edit | `StoreError` from `open` |
//! | Write fails | Disk full, permissions | `StoreError`; in-memory state unchanged |

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Where a tour's completion flag lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "storage", rename_all = "snake_case")]
pub enum StorageTarget {
    /// `is_navigation_tour_completed` on the user profile.
    UserProfile,
    /// `product_tour[property_key]` in a workspace's properties.
    WorkspaceProperties {
        workspace_slug: String,
        property_key: String,
    },
}

impl StorageTarget {
    pub fn workspace(slug: impl Into<String>, property_key: impl Into<String>) -> Self {
        Self::WorkspaceProperties {
            workspace_slug: slug.into(),
            property_key: property_key.into(),
        }
    }
}

/// Errors from completion persistence.
#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Json(serde_json::Error),
    /// The backing store refused the update.
    Rejected(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "completion store I/O error: {e}"),
            Self::Json(e) => write!(f, "completion store JSON error: {e}"),
            Self::Rejected(reason) => write!(f, "completion store rejected update: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Rejected(_) => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Completion flags keyed by [`StorageTarget`].
pub trait CompletionStore {
    fn is_completed(&self, target: &StorageTarget) -> bool;
    fn mark_completed(&mut self, target: &StorageTarget) -> Result<(), StoreError>;
}

impl<S: CompletionStore + ?Sized> CompletionStore for &mut S {
    fn is_completed(&self, target: &StorageTarget) -> bool {
        (**self).is_completed(target)
    }

    fn mark_completed(&mut self, target: &StorageTarget) -> Result<(), StoreError> {
        (**self).mark_completed(target)
    }
}

/// In-memory store, optionally failing every write.
#[derive(Debug, Clone, Default)]
pub struct MemoryCompletionStore {
    completed: HashSet<StorageTarget>,
    reject_writes: Option<String>,
}

impl MemoryCompletionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-mark `target` as completed.
    #[must_use]
    pub fn with_completed(mut self, target: StorageTarget) -> Self {
        self.completed.insert(target);
        self
    }

    /// Make every subsequent write fail with `reason`.
    pub fn reject_writes(&mut self, reason: impl Into<String>) {
        self.reject_writes = Some(reason.into());
    }

    /// Mark completed out of band, as another tab or device would.
    pub fn complete_externally(&mut self, target: StorageTarget) {
        self.completed.insert(target);
    }
}

impl CompletionStore for MemoryCompletionStore {
    fn is_completed(&self, target: &StorageTarget) -> bool {
        self.completed.contains(target)
    }

    fn mark_completed(&mut self, target: &StorageTarget) -> Result<(), StoreError> {
        if let Some(reason) = &self.reject_writes {
            return Err(StoreError::Rejected(reason.clone()));
        }
        self.completed.insert(target.clone());
        Ok(())
    }
}

/// User-profile flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfileFlags {
    pub is_navigation_tour_completed: bool,
}

/// Per-workspace properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceTourProperties {
    pub product_tour: BTreeMap<String, bool>,
}

/// On-disk document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionDocument {
    pub user_profile: UserProfileFlags,
    pub workspaces: BTreeMap<String, WorkspaceTourProperties>,
}

impl CompletionDocument {
    #[must_use]
    pub fn is_completed(&self, target: &StorageTarget) -> bool {
        match target {
            StorageTarget::UserProfile => self.user_profile.is_navigation_tour_completed,
            StorageTarget::WorkspaceProperties {
                workspace_slug,
                property_key,
            } => self
                .workspaces
                .get(workspace_slug)
                .and_then(|ws| ws.product_tour.get(property_key))
                .copied()
                .unwrap_or(false),
        }
    }

    /// Set the flag for `target`, keeping every other tour's flag.
    pub fn mark_completed(&mut self, target: &StorageTarget) {
        match target {
            StorageTarget::UserProfile => self.user_profile.is_navigation_tour_completed = true,
            StorageTarget::WorkspaceProperties {
                workspace_slug,
                property_key,
            } => {
                self.workspaces
                    .entry(workspace_slug.clone())
                    .or_default()
                    .product_tour
                    .insert(property_key.clone(), true);
            }
        }
    }
}

/// JSON file store. Writes go to a sibling temp file, then rename.
#[derive(Debug, Clone)]
pub struct JsonFileCompletionStore {
    path: PathBuf,
    document: CompletionDocument,
}

impl JsonFileCompletionStore {
    /// Load `path`, treating a missing file as an empty document.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let document = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => CompletionDocument::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, document })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn document(&self) -> &CompletionDocument {
        &self.document
    }

    /// Re-read the file, picking up changes made by other processes.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        *self = Self::open(self.path.clone())?;
        Ok(())
    }

    fn write(&self, document: &CompletionDocument) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl CompletionStore for JsonFileCompletionStore {
    fn is_completed(&self, target: &StorageTarget) -> bool {
        self.document.is_completed(target)
    }

    fn mark_completed(&mut self, target: &StorageTarget) -> Result<(), StoreError> {
        let mut next = self.document.clone();
        next.mark_completed(target);
        self.write(&next)?;
        self.document = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_merges_flags() {
        let mut doc = CompletionDocument::default();
        let cycle = StorageTarget::workspace("acme", "cycle");
        let module = StorageTarget::workspace("acme", "module");
        doc.mark_completed(&cycle);
        doc.mark_completed(&module);
        assert!(doc.is_completed(&cycle));
        assert!(doc.is_completed(&module));
        assert!(!doc.is_completed(&StorageTarget::UserProfile));
        assert!(!doc.is_completed(&StorageTarget::workspace("other", "cycle")));
    }

    #[test]
    fn document_json_shape() {
        let mut doc = CompletionDocument::default();
        doc.mark_completed(&StorageTarget::UserProfile);
        doc.mark_completed(&StorageTarget::workspace("acme", "page"));
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "user_profile": { "is_navigation_tour_completed": true },
                "workspaces": { "acme": { "product_tour": { "page": true } } }
            })
        );
    }

    #[test]
    fn partial_document_parses() {
        let doc: CompletionDocument = serde_json::from_str(r#"{"workspaces":{}}"#).unwrap();
        assert_eq!(doc, CompletionDocument::default());
    }

    #[test]
    fn memory_store_rejects_when_asked() {
        let mut store = MemoryCompletionStore::new();
        store.reject_writes("offline");
        let err = store.mark_completed(&StorageTarget::UserProfile).unwrap_err();
        assert_eq!(err.to_string(), "completion store rejected update: offline");
        assert!(!store.is_completed(&StorageTarget::UserProfile));
    }
}
