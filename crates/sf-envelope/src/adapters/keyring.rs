//! # In-Memory Keyring
//!
//! `SymmetricKeyProvider` backed by a map from key version to key. Keys are
//! zeroized when the last handle drops.
//!
//! ## JSON form
//!
//! ```json
//! { "1": "<64 hex chars>", "2": "<64 hex chars>" }
//! ```

use crate::ports::outbound::{KeyLookupError, SymmetricKeyProvider};
use parking_lot::RwLock;
use sf_crypto::SymmetricKey;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;

/// Errors loading a keyring.
#[derive(Debug, Error)]
pub enum KeyringError {
    /// Not a JSON object of strings
    #[error("Keyring is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Map key is not a version number
    #[error("Invalid key version {0:?}")]
    Version(String),

    /// Version 0 cannot hold a key
    #[error("Key version 0 is reserved")]
    Reserved,

    /// Key is not 32 bytes of hex
    #[error("Invalid key for version {version}: {reason}")]
    Key { version: u32, reason: String },
}

/// Versioned symmetric keys held in memory.
#[derive(Default)]
pub struct InMemoryKeyring {
    keys: RwLock<HashMap<u32, Arc<SymmetricKey>>>,
}

impl InMemoryKeyring {
    /// Empty keyring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or rotate) the key for `version`.
    pub fn insert(&self, version: u32, key: SymmetricKey) -> Result<(), KeyLookupError> {
        if version == 0 {
            return Err(KeyLookupError::Reserved);
        }
        self.keys.write().insert(version, Arc::new(key));
        Ok(())
    }

    /// Builder-style insert.
    pub fn with_key(self, version: u32, key: SymmetricKey) -> Result<Self, KeyLookupError> {
        self.insert(version, key)?;
        Ok(self)
    }

    /// Drop the key for `version`. Returns whether one was present.
    pub fn remove(&self, version: u32) -> bool {
        self.keys.write().remove(&version).is_some()
    }

    /// Registered versions, ascending.
    pub fn versions(&self) -> Vec<u32> {
        let mut versions: Vec<u32> = self.keys.read().keys().copied().collect();
        versions.sort_unstable();
        versions
    }

    /// Load from the JSON form.
    pub fn from_json(json: &str) -> Result<Self, KeyringError> {
        let entries: BTreeMap<String, String> = serde_json::from_str(json)?;
        let keyring = Self::new();
        for (version, key_hex) in entries {
            let version: u32 = version
                .trim()
                .parse()
                .map_err(|_| KeyringError::Version(version.clone()))?;
            let bytes = hex::decode(key_hex.trim()).map_err(|e| KeyringError::Key {
                version,
                reason: e.to_string(),
            })?;
            let key = SymmetricKey::from_slice(&bytes).map_err(|e| KeyringError::Key {
                version,
                reason: e.to_string(),
            })?;
            keyring
                .insert(version, key)
                .map_err(|_| KeyringError::Reserved)?;
        }
        Ok(keyring)
    }
}

impl SymmetricKeyProvider for InMemoryKeyring {
    fn key(&self, version: u32) -> Result<Arc<SymmetricKey>, KeyLookupError> {
        if version == 0 {
            return Err(KeyLookupError::Reserved);
        }
        self.keys
            .read()
            .get(&version)
            .cloned()
            .ok_or(KeyLookupError::NotFound(version))
    }
}

impl std::fmt::Debug for InMemoryKeyring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKeyring")
            .field("versions", &self.versions())
            .finish()
    }
}
