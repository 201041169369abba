// huginn-service/src/storage/mod.rs
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::{error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{AccessGrant, Invitation, Notification, ServiceError, ShareLink};

// One record family: a directory of one-JSON-file-per-record on disk,
// mirrored into a map guarded by a single mutex. Check-then-mutate
// sequences must run while holding that mutex, and the file write happens
// before the lock is released, so concurrent callers always observe a
// consistent record.
pub struct Collection<T> {
    name: &'static str,
    dir: PathBuf,
    records: Mutex<HashMap<String, T>>,
}

impl<T: Serialize + DeserializeOwned> Collection<T> {
    // Open (or create) the family directory and load existing records
    fn open(root: &Path, name: &'static str) -> Result<Self, ServiceError> {
        let dir = root.join(name);

        if !dir.exists() {
            info!("Creating {} directory", name);
            fs::create_dir_all(&dir).map_err(|e| {
                error!("Failed to create {} directory: {:?}", name, e);
                ServiceError::InternalServerError
            })?;
        }

        let mut records = HashMap::new();

        for entry_result in fs::read_dir(&dir).map_err(|e| {
            error!("Failed to read {} directory: {:?}", name, e);
            ServiceError::InternalServerError
        })? {
            let entry = entry_result.map_err(|e| {
                error!("Failed to read directory entry: {:?}", e);
                ServiceError::InternalServerError
            })?;

            let path = entry.path();
            if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path).map_err(|e| {
                    error!("Failed to read {} record file: {:?}", name, e);
                    ServiceError::InternalServerError
                })?;

                match serde_json::from_str::<T>(&content) {
                    Ok(record) => {
                        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                            records.insert(stem.to_string(), record);
                        }
                    }
                    Err(e) => {
                        warn!("Skipping unreadable {} record {:?}: {:?}", name, path, e);
                    }
                }
            }
        }

        Ok(Self {
            name,
            dir,
            records: Mutex::new(records),
        })
    }

    // The serialization point for this family
    pub fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, T>>, ServiceError> {
        self.records.lock().map_err(|e| {
            error!("Poisoned {} lock: {:?}", self.name, e);
            ServiceError::InternalServerError
        })
    }

    // Write a record to disk. Call with the family lock held so the file
    // matches the in-memory state when the lock is released.
    pub fn persist(&self, id: &str, record: &T) -> Result<(), ServiceError> {
        let path = self.dir.join(format!("{}.json", id));

        let json = serde_json::to_string_pretty(record).map_err(|e| {
            error!("Failed to serialize {} record {}: {:?}", self.name, id, e);
            ServiceError::InternalServerError
        })?;

        fs::write(&path, json).map_err(|e| {
            error!("Failed to save {} record {}: {:?}", self.name, id, e);
            ServiceError::InternalServerError
        })
    }

    // Remove a record file after the record was dropped from the map
    pub fn remove_file(&self, id: &str) -> Result<(), ServiceError> {
        let path = self.dir.join(format!("{}.json", id));

        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                error!("Failed to delete {} record {}: {:?}", self.name, id, e);
                ServiceError::InternalServerError
            })?;
        }

        Ok(())
    }
}

// Shared persistence handle. Opened once by the process entry point and
// passed to each component as Arc<Storage>; components never reach for a
// global registry.
pub struct Storage {
    pub grants: Collection<AccessGrant>,
    pub invitations: Collection<Invitation>,
    pub links: Collection<ShareLink>,
    pub notifications: Collection<Notification>,
}

impl Storage {
    // Open (or create) the storage root and load every record family
    pub fn open(root: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let root = root.as_ref();

        Ok(Self {
            grants: Collection::open(root, "grants")?,
            invitations: Collection::open(root, "invitations")?,
            links: Collection::open(root, "links")?,
            notifications: Collection::open(root, "notifications")?,
        })
    }
}
