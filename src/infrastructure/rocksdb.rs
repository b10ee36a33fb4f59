use crate::domain::ports::RequestStore;
use crate::domain::request::KycRequest;
use crate::error::{KycError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing KYC request assets.
pub const CF_REQUESTS: &str = "requests";

/// A persistent request registry using RocksDB.
///
/// Requests are stored as JSON values keyed by request id, so a registry can
/// be inspected with standard RocksDB tooling and survives across runs.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbRequestStore {
    db: Arc<DB>,
}

impl RocksDbRequestStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required "requests" column family exists.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_requests = ColumnFamilyDescriptor::new(CF_REQUESTS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_requests])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_REQUESTS).ok_or_else(|| {
            KycError::InternalError(Box::new(std::io::Error::other(
                "Requests column family not found",
            )))
        })
    }

    fn encode(request: &KycRequest) -> Result<Vec<u8>> {
        serde_json::to_vec(request).map_err(|e| {
            KycError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {}", e),
            )))
        })
    }

    fn decode(bytes: &[u8]) -> Result<KycRequest> {
        serde_json::from_slice(bytes).map_err(|e| {
            KycError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Deserialization error: {}", e),
            )))
        })
    }
}

#[async_trait]
impl RequestStore for RocksDbRequestStore {
    async fn get(&self, id: &str) -> Result<Option<KycRequest>> {
        let cf = self.cf()?;
        match self.db.get_cf(&cf, id.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn add(&self, request: KycRequest) -> Result<()> {
        let cf = self.cf()?;
        // Just check if the key exists without retrieving the value
        if self.db.get_pinned_cf(&cf, request.id.as_bytes())?.is_some() {
            return Err(KycError::AlreadyExists(request.id.clone()));
        }
        self.db
            .put_cf(&cf, request.id.as_bytes(), Self::encode(&request)?)?;
        Ok(())
    }

    async fn update(&self, request: &mut KycRequest) -> Result<()> {
        let cf = self.cf()?;
        let stored = match self.db.get_cf(&cf, request.id.as_bytes())? {
            Some(bytes) => Self::decode(&bytes)?,
            None => return Err(KycError::NotFound(request.id.clone())),
        };
        if stored.version != request.version {
            return Err(KycError::VersionConflict {
                id: request.id.clone(),
                submitted: request.version,
                stored: stored.version,
            });
        }
        request.version += 1;
        self.db
            .put_cf(&cf, request.id.as_bytes(), Self::encode(request)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::party::{BankId, PartyRef};
    use crate::domain::request::RequestStatus;
    use tempfile::tempdir;

    fn request(id: &str) -> KycRequest {
        KycRequest::open(
            id,
            PartyRef::customer("alice"),
            BankId::new("BoD"),
            vec!["basic-profile".to_string()],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDbRequestStore::open(dir.path()).expect("Failed to open RocksDB");

        // Verify the CF exists
        assert!(store.db.cf_handle(CF_REQUESTS).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_request_round_trip() {
        let dir = tempdir().unwrap();
        let store = RocksDbRequestStore::open(dir.path()).unwrap();

        let request = request("KYC-1");
        store.add(request.clone()).await.unwrap();

        let retrieved = store.get("KYC-1").await.unwrap().unwrap();
        assert_eq!(retrieved, request);

        assert!(store.get("KYC-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rocksdb_duplicate_add() {
        let dir = tempdir().unwrap();
        let store = RocksDbRequestStore::open(dir.path()).unwrap();

        store.add(request("KYC-1")).await.unwrap();
        let result = store.add(request("KYC-1")).await;
        assert!(matches!(result, Err(KycError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_rocksdb_versioned_update() {
        let dir = tempdir().unwrap();
        let store = RocksDbRequestStore::open(dir.path()).unwrap();

        store.add(request("KYC-1")).await.unwrap();

        let mut current = store.get("KYC-1").await.unwrap().unwrap();
        let mut stale = current.clone();

        current.reject("first writer wins").unwrap();
        store.update(&mut current).await.unwrap();
        assert_eq!(current.version, 1);

        stale.reject("stale").unwrap();
        let result = store.update(&mut stale).await;
        assert!(matches!(result, Err(KycError::VersionConflict { .. })));

        let retrieved = store.get("KYC-1").await.unwrap().unwrap();
        assert_eq!(retrieved.status, RequestStatus::Rejected);
        assert_eq!(retrieved.close_reason.as_deref(), Some("first writer wins"));
    }

    #[tokio::test]
    async fn test_rocksdb_survives_reopen() {
        let dir = tempdir().unwrap();

        {
            let store = RocksDbRequestStore::open(dir.path()).unwrap();
            store.add(request("KYC-1")).await.unwrap();
        }

        let store = RocksDbRequestStore::open(dir.path()).unwrap();
        let retrieved = store.get("KYC-1").await.unwrap().unwrap();
        assert_eq!(retrieved.id, "KYC-1");
        assert_eq!(retrieved.status, RequestStatus::AwaitingApproval);
    }
}
