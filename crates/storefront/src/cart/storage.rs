//! Durable local storage for the cart record.
//!
//! The cart persists to a fixed namespace on the device, independent of
//! the signed-in identity. The storage side effect sits behind
//! [`CartStorage`] so tests substitute an in-memory implementation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

/// Fixed namespace the cart record is stored under.
pub const CART_NAMESPACE: &str = "bakehouse.cart";

/// Errors from the local storage layer.
///
/// Callers treat these as soft failures: a load error means an empty
/// cart, a save error is logged and the in-memory state stays
/// authoritative.
#[derive(Debug, Error)]
pub enum CartStorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// One durable slot holding the serialized cart record.
pub trait CartStorage {
    /// Read the stored record, or `None` if nothing has been stored.
    fn load(&self) -> Result<Option<String>, CartStorageError>;

    /// Replace the stored record.
    fn save(&self, record: &str) -> Result<(), CartStorageError>;
}

/// File-backed cart storage under the configured cart directory.
pub struct FileCartStorage {
    path: PathBuf,
}

impl FileCartStorage {
    /// Storage writing to `<dir>/bakehouse.cart.json`.
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{CART_NAMESPACE}.json")),
        }
    }
}

impl CartStorage for FileCartStorage {
    fn load(&self) -> Result<Option<String>, CartStorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, record: &str) -> Result<(), CartStorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, record)?;
        Ok(())
    }
}

/// In-memory cart storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct InMemoryCartStorage {
    record: Mutex<Option<String>>,
}

impl InMemoryCartStorage {
    /// Empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a record, e.g. a corrupt one.
    #[must_use]
    pub fn with_record(record: &str) -> Self {
        Self {
            record: Mutex::new(Some(record.to_string())),
        }
    }

    /// The currently stored record.
    #[must_use]
    pub fn record(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.record
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl CartStorage for InMemoryCartStorage {
    fn load(&self) -> Result<Option<String>, CartStorageError> {
        Ok(self.lock().clone())
    }

    fn save(&self, record: &str) -> Result<(), CartStorageError> {
        *self.lock() = Some(record.to_string());
        Ok(())
    }
}
