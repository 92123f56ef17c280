pub mod storage;

use thiserror::Error;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};

pub const DEFAULT_STORAGE_KEY: &str = "myToolkit";

/// What to do when the stored toolkit is not a JSON array of strings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CorruptStatePolicy {
    /// Log a warning and start from an empty toolkit.
    #[default]
    Discard,
    /// Refuse to load.
    Reject,
}

impl CorruptStatePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "discard" | "soft" => Some(Self::Discard),
            "reject" | "loud" | "strict" => Some(Self::Reject),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Discard => "discard",
            Self::Reject => "reject",
        }
    }
}

#[derive(Debug, Error)]
pub enum ToolkitError {
    #[error("stored toolkit under '{key}' is corrupt: {source}")]
    CorruptState {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode toolkit: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Membership {
    Added,
    Removed,
}

/// The user's bookmarked resource ids, in the order they were added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Toolkit {
    ids: Vec<String>,
}

impl Toolkit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repeated ids keep their first position.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut toolkit = Self::new();
        for id in ids {
            let id = id.into();
            if !toolkit.contains(&id) {
                toolkit.ids.push(id);
            }
        }
        toolkit
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn toggle(&mut self, id: &str) -> Membership {
        match self.ids.iter().position(|i| i == id) {
            Some(index) => {
                self.ids.remove(index);
                Membership::Removed
            }
            None => {
                self.ids.push(id.to_string());
                Membership::Added
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.ids)
    }

    /// `null` decodes to an empty toolkit.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let ids: Option<Vec<String>> = serde_json::from_str(raw)?;
        Ok(Self::from_ids(ids.unwrap_or_default()))
    }
}

/// Owns the toolkit and the storage it is persisted to.
#[derive(Debug)]
pub struct ToolkitStore<S> {
    storage: S,
    key: String,
    toolkit: Toolkit,
}

impl<S: KeyValueStorage> ToolkitStore<S> {
    pub fn load(
        storage: S,
        key: impl Into<String>,
        policy: CorruptStatePolicy,
    ) -> Result<Self, ToolkitError> {
        let key = key.into();
        let toolkit = match storage.get_item(&key)? {
            None => Toolkit::new(),
            Some(raw) => match Toolkit::from_json(&raw) {
                Ok(toolkit) => toolkit,
                Err(source) => match policy {
                    CorruptStatePolicy::Discard => {
                        tracing::warn!(
                            key = %key,
                            error = %source,
                            "discarding corrupt toolkit state"
                        );
                        Toolkit::new()
                    }
                    CorruptStatePolicy::Reject => {
                        return Err(ToolkitError::CorruptState { key, source });
                    }
                },
            },
        };
        tracing::debug!(key = %key, entries = toolkit.len(), "toolkit loaded");
        Ok(Self {
            storage,
            key,
            toolkit,
        })
    }

    pub fn toolkit(&self) -> &Toolkit {
        &self.toolkit
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Flips membership of `id` and persists the whole toolkit.
    ///
    /// On a failed write the in-memory toolkit is restored before the error
    /// is returned.
    pub fn toggle(&mut self, id: &str) -> Result<Membership, ToolkitError> {
        let previous = self.toolkit.clone();
        let membership = self.toolkit.toggle(id);
        if let Err(e) = self.persist() {
            self.toolkit = previous;
            return Err(e);
        }
        tracing::info!(id, ?membership, entries = self.toolkit.len(), "toolkit updated");
        Ok(membership)
    }

    pub fn persist(&mut self) -> Result<(), ToolkitError> {
        let raw = self
            .toolkit
            .to_json()
            .map_err(|source| ToolkitError::Encode { source })?;
        self.storage.set_item(&self.key, &raw)?;
        Ok(())
    }
}
