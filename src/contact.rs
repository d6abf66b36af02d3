use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Opaque identifier of a contact in the directory.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ContactId(i64);

impl ContactId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

/// A resolved contact. Events hold it behind an `Arc`, so its lifetime is
/// independent of any single event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
    id:           ContactId,
    display_name: String,
}

impl Contact {
    pub fn new(id: ContactId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }

    pub const fn id(&self) -> ContactId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// First whitespace-separated word of the display name.
    pub fn given_name(&self) -> Option<&str> {
        self.display_name.split_whitespace().next()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Contact not found: {0}")]
pub struct ContactNotFound(pub ContactId);

/// Maps contact ids to contact records.
pub trait ContactDirectory: Send + Sync {
    /// # Errors
    /// Returns `ContactNotFound` when no contact has this id.
    fn resolve(&self, id: ContactId) -> Result<Arc<Contact>, ContactNotFound>;
}
