//! Persistence layer
//!
//! Stores the set of known sitemap URLs and a small table of named running
//! statistics, currently only the average request time of the most recent
//! fetch batch.

mod schema;
mod sqlite;
mod traits;

pub use schema::initialize_schema;
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

/// Key under which the running average request time is persisted
pub const AVERAGE_REQUEST_TIME_KEY: &str = "average_request_time";

/// A stored sitemap URL row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: i64,
    pub url: String,
    pub discovered_at: String,
}

/// Reads the persisted average request time in seconds
///
/// A read failure is treated the same as an absent value and logged at
/// debug level; only successful batches ever write this key.
pub fn get_average_request_time<S: Storage>(storage: &S) -> Option<f64> {
    match storage.get_stat(AVERAGE_REQUEST_TIME_KEY) {
        Ok(Some(value)) => {
            tracing::debug!("Retrieved average_request_time from DB: {:.4} seconds", value);
            Some(value)
        }
        Ok(None) => {
            tracing::debug!("No average_request_time found in DB.");
            None
        }
        Err(e) => {
            tracing::debug!("Failed to read average_request_time: {}", e);
            None
        }
    }
}

/// Persists the average request time in seconds (overwrites prior value)
pub fn set_average_request_time<S: Storage>(storage: &mut S, value: f64) -> StorageResult<()> {
    storage.set_stat(AVERAGE_REQUEST_TIME_KEY, value)?;
    tracing::debug!("Set average_request_time in DB to: {:.4} seconds", value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_request_time_roundtrip() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();

        assert_eq!(get_average_request_time(&storage), None);

        set_average_request_time(&mut storage, 0.75).unwrap();
        assert_eq!(get_average_request_time(&storage), Some(0.75));

        // Each write overwrites; no history is retained
        set_average_request_time(&mut storage, 2.0).unwrap();
        assert_eq!(get_average_request_time(&storage), Some(2.0));
    }
}
