//! Order persistence: an append-only document store behind a narrow trait.
//!
//! The production backend keeps the full order list in memory and rewrites
//! one JSON file on every append. Swapping in a remote document database
//! only needs another `OrderStore` implementation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use crate::order::types::OrderRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("order store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("order store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("order store lock poisoned")]
    Poisoned,
}

pub trait OrderStore: Send + Sync {
    /// Appends one record and returns its store-assigned id.
    fn append(&self, record: &OrderRecord) -> Result<String, StoreError>;

    /// All records for one user, in insertion order.
    fn orders_for_user(&self, user_id: u64) -> Result<Vec<OrderRecord>, StoreError>;
}

/// JSON-file-backed store. Loads everything at startup, then writes the
/// whole file back on each append.
pub struct JsonFileStore {
    path: PathBuf,
    orders: Mutex<Vec<OrderRecord>>,
}

impl JsonFileStore {
    /// Opens the store, creating the directory and an empty `[]` file on
    /// first run.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        if !path.exists() {
            fs::write(&path, "[]")?;
        }

        let content = fs::read_to_string(&path)?;
        let orders: Vec<OrderRecord> = serde_json::from_str(&content)?;
        log::info!("Loaded {} orders from {}", orders.len(), path.display());

        Ok(Self {
            path,
            orders: Mutex::new(orders),
        })
    }
}

impl OrderStore for JsonFileStore {
    fn append(&self, record: &OrderRecord) -> Result<String, StoreError> {
        let mut orders = self.orders.lock().map_err(|_| StoreError::Poisoned)?;
        orders.push(record.clone());
        let content = serde_json::to_string_pretty(&*orders)?;
        fs::write(&self.path, content)?;
        Ok((orders.len() - 1).to_string())
    }

    fn orders_for_user(&self, user_id: u64) -> Result<Vec<OrderRecord>, StoreError> {
        let orders = self.orders.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }
}

/// Purely in-memory store, used by tests.
#[derive(Default)]
pub struct MemoryStore {
    orders: Mutex<Vec<OrderRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderStore for MemoryStore {
    fn append(&self, record: &OrderRecord) -> Result<String, StoreError> {
        let mut orders = self.orders.lock().map_err(|_| StoreError::Poisoned)?;
        orders.push(record.clone());
        Ok((orders.len() - 1).to_string())
    }

    fn orders_for_user(&self, user_id: u64) -> Result<Vec<OrderRecord>, StoreError> {
        let orders = self.orders.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }
}
