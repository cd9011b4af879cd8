use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::StoreError;
use crate::identity::{Identity, NewIdentity, VectorUpdate};
use crate::idstore::IdentityStore;

/// In-memory [`IdentityStore`] implementation.
/// Data is lost on restart. Suitable for testing or ephemeral use.
pub struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

struct MemoryStoreInner {
    identities: HashMap<String, Identity>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryStoreInner {
                identities: HashMap::new(),
                next_id: 0,
            }),
        }
    }

    /// Return the number of stored identities.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().identities.len()
    }

    /// Return true if no identities are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IdentityStore for MemoryStore {
    async fn create(&self, new: NewIdentity) -> Result<Identity, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = format!("person:{:06}", inner.next_id);
        let identity = Identity {
            id: id.clone(),
            label: new.label,
            face_vec: new.face_vec,
            body_vec: new.body_vec,
        };
        inner.identities.insert(id, identity.clone());
        Ok(identity)
    }

    async fn get(&self, id: &str) -> Result<Option<Identity>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.identities.get(id).cloned())
    }

    async fn update_vectors(&self, id: &str, update: VectorUpdate) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let identity = inner
            .identities
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if let Some(v) = update.face_vec {
            identity.face_vec = Some(v);
        }
        if let Some(v) = update.body_vec {
            identity.body_vec = Some(v);
        }
        Ok(())
    }
}
