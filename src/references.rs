use crate::constants::REFERENCE_SCHEME;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// An object-URL style handle to encoded bytes held by a [`ReferenceStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactRef(String);

impl ArtifactRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry of live references. Cloning shares the registry.
#[derive(Debug, Clone, Default)]
pub struct ReferenceStore {
    entries: Arc<Mutex<HashMap<ArtifactRef, Arc<[u8]>>>>,
}

impl ReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<ArtifactRef, Arc<[u8]>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn create(&self, bytes: Arc<[u8]>) -> ArtifactRef {
        let reference = ArtifactRef(format!("{}{}", REFERENCE_SCHEME, Uuid::new_v4()));
        self.entries().insert(reference.clone(), bytes);
        reference
    }

    pub fn resolve(&self, reference: &ArtifactRef) -> Option<Arc<[u8]>> {
        self.entries().get(reference).cloned()
    }

    pub fn revoke(&self, reference: &ArtifactRef) -> bool {
        self.entries().remove(reference).is_some()
    }

    pub fn revoke_all<'a>(&self, references: impl IntoIterator<Item = &'a ArtifactRef>) {
        let mut entries = self.entries();
        for reference in references {
            entries.remove(reference);
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
