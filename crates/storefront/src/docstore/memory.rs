//! In-memory document store for tests.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde_json::{Map, Value};

use super::{Document, DocumentStore, StoreError};

/// An in-memory [`DocumentStore`].
///
/// Collections are created on first write. [`InMemoryDocStore::set_failing`]
/// makes every subsequent operation fail, for exercising the
/// unavailable-service paths.
#[derive(Default)]
pub struct InMemoryDocStore {
    collections: Mutex<BTreeMap<String, BTreeMap<String, Map<String, Value>>>>,
    next_id: AtomicU64,
    failing: AtomicBool,
}

impl InMemoryDocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// When `true`, every operation returns a 503 `StoreError::Api`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of documents currently in a collection.
    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.lock().get(collection).map_or(0, BTreeMap::len)
    }

    /// Whether a collection is empty or absent.
    #[must_use]
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Insert a document with a chosen id, bypassing id generation.
    ///
    /// Handy for seeding fixtures that reference known ids.
    pub fn seed(&self, collection: &str, id: &str, data: Value) {
        let data = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.lock()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
    }

    fn lock(
        &self,
    ) -> std::sync::MutexGuard<'_, BTreeMap<String, BTreeMap<String, Map<String, Value>>>> {
        self.collections
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl DocumentStore for InMemoryDocStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.check_available()?;
        Ok(self
            .lock()
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.check_available()?;
        Ok(self.lock().get(collection).and_then(|docs| {
            docs.get(id).map(|data| Document {
                id: id.to_string(),
                data: data.clone(),
            })
        }))
    }

    async fn create(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        self.check_available()?;
        let id = format!("doc-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.seed(collection, &id, data);
        Ok(id)
    }

    async fn put(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        self.check_available()?;
        self.seed(collection, id, data);
        Ok(())
    }

    async fn patch(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        self.check_available()?;
        let Value::Object(patch) = data else {
            return Err(StoreError::Decode("patch body must be an object".to_string()));
        };

        let mut collections = self.lock();
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or(StoreError::Api {
                status: 404,
                message: format!("no document {id} in {collection}"),
            })?;

        for (key, value) in patch {
            doc.insert(key, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.check_available()?;
        if let Some(docs) = self.lock().get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}
