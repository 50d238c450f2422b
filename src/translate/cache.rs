//! Persistent dictionary snapshot with expiration.
//! Layout per storage key: `__translations__<key>` holds the JSON dictionary,
//! `__trans_time__<key>` the decimal epoch-second write time.
//! Every fault reads as a miss; nothing here is reported to the caller.

use std::sync::Arc;

use tracing::debug;

use super::dictionary::Dictionary;
use crate::error::StorageError;
use crate::storage::{now_unix, Storage};

const DATA_PREFIX: &str = "__translations__";
const TIME_PREFIX: &str = "__trans_time__";

pub struct DictionaryCache {
    storage: Arc<dyn Storage>,
}

impl DictionaryCache {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn data_key(storage_key: &str) -> String {
        format!("{DATA_PREFIX}{storage_key}")
    }

    pub fn time_key(storage_key: &str) -> String {
        format!("{TIME_PREFIX}{storage_key}")
    }

    /// Persist a snapshot stamped with the current time. Returns false on any fault.
    pub fn write(&self, dictionary: &Dictionary, storage_key: &str) -> bool {
        match self.try_write(dictionary, storage_key) {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, storage_key, "dictionary cache write failed");
                false
            }
        }
    }

    fn try_write(&self, dictionary: &Dictionary, storage_key: &str) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(dictionary)?;
        self.storage
            .set_item(&Self::data_key(storage_key), &serialized)?;
        self.storage
            .set_item(&Self::time_key(storage_key), &now_unix().to_string())?;
        Ok(())
    }

    /// Read a snapshot. Any non-zero `expiration_secs` enforces staleness:
    /// a snapshot older than that many seconds reads as absent.
    pub fn read(&self, storage_key: &str, expiration_secs: Option<i64>) -> Option<Dictionary> {
        self.read_at(storage_key, expiration_secs, now_unix())
    }

    /// `read` with the current time supplied as epoch seconds.
    pub fn read_at(
        &self,
        storage_key: &str,
        expiration_secs: Option<i64>,
        now: i64,
    ) -> Option<Dictionary> {
        let serialized = match self.storage.get_item(&Self::data_key(storage_key)) {
            Ok(found) => found?,
            Err(e) => {
                debug!(error = %e, storage_key, "dictionary cache read failed");
                return None;
            }
        };

        if let Some(expiration) = expiration_secs.filter(|e| *e != 0) {
            let written_at = self
                .storage
                .get_item(&Self::time_key(storage_key))
                .ok()
                .flatten()
                .and_then(|ts| ts.trim().parse::<i64>().ok());
            let Some(written_at) = written_at else {
                debug!(storage_key, "dictionary cache timestamp missing");
                return None;
            };
            // An elapsed time that does not fit in i64 is stale.
            let stale = now
                .checked_sub(written_at)
                .map_or(true, |elapsed| elapsed > expiration);
            if stale {
                debug!(storage_key, written_at, expiration, "dictionary cache stale");
                return None;
            }
        }

        match serde_json::from_str(&serialized) {
            Ok(dictionary) => {
                debug!(storage_key, "dictionary cache hit");
                Some(dictionary)
            }
            Err(e) => {
                debug!(error = %e, storage_key, "dictionary cache parse failed");
                None
            }
        }
    }
}
