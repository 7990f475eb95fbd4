use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::Arc,
};

use configs::StoreLocation;
use models::Record;
use serde::{Deserialize, Serialize};
use tokio::{fs, sync::RwLock};
use tracing::{debug, info};

use crate::errors::ServiceError;

/// Records in insertion order plus the next id to hand out.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot<T> {
    next_id: u64,
    records: Vec<T>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self { Self { next_id: 1, records: Vec::new() } }
}

#[derive(Debug, Clone)]
enum Backend {
    Memory,
    File(PathBuf),
}

/// Ordered collection of one record type guarded by a single lock.
///
/// Ids come from a counter that only moves forward, so an id is never
/// handed out twice even after deletes. The counter is read and bumped
/// under the same write lock as the append.
///
/// With a file backend every mutation rewrites the snapshot before the lock
/// is released; if the write fails the in-memory change is undone.
pub struct RecordStore<T> {
    inner: RwLock<Snapshot<T>>,
    backend: Backend,
}

impl<T: Record> RecordStore<T> {
    /// Process-lifetime store.
    pub fn in_memory() -> Arc<Self> {
        Arc::new(Self { inner: RwLock::new(Snapshot::default()), backend: Backend::Memory })
    }

    /// Open a store from a URL: `memory://` or `file://<path>`.
    pub async fn open(url: &str) -> Result<Arc<Self>, ServiceError> {
        match StoreLocation::parse(url).map_err(ServiceError::internal)? {
            StoreLocation::Memory => Ok(Self::in_memory()),
            StoreLocation::File(path) => Self::open_file(path).await,
        }
    }

    /// Load a JSON snapshot store from a path. Creates the file empty if missing.
    pub async fn open_file<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(ServiceError::internal)?;
            }
        }

        let snapshot: Snapshot<T> = match fs::read(&file_path).await {
            Ok(bytes) => {
                let mut snap: Snapshot<T> = serde_json::from_slice(&bytes).map_err(|e| {
                    ServiceError::Internal(format!("corrupt store file {}: {e}", file_path.display()))
                })?;
                check_unique_ids(&snap.records, &file_path)?;
                let max_id = snap.records.iter().map(|r| r.id()).max().unwrap_or(0);
                let after_max = max_id.checked_add(1).ok_or_else(|| {
                    ServiceError::Internal(format!("store file {} exhausts the id space", file_path.display()))
                })?;
                snap.next_id = snap.next_id.max(after_max).max(1);
                snap
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty = Snapshot::<T>::default();
                write_snapshot(&file_path, &empty).await?;
                empty
            }
            Err(e) => return Err(ServiceError::internal(e)),
        };

        info!(
            entity = T::ENTITY,
            path = %file_path.display(),
            records = snapshot.records.len(),
            next_id = snapshot.next_id,
            "record store opened"
        );
        Ok(Arc::new(Self { inner: RwLock::new(snapshot), backend: Backend::File(file_path) }))
    }

    async fn persist(&self, snapshot: &Snapshot<T>) -> Result<(), ServiceError> {
        match &self.backend {
            Backend::Memory => Ok(()),
            Backend::File(path) => write_snapshot(path, snapshot).await,
        }
    }

    /// Append a new record with the next id.
    pub async fn insert(&self, fields: T::Fields) -> Result<T, ServiceError> {
        let mut state = self.inner.write().await;
        let id = state.next_id;
        let next_id = id
            .checked_add(1)
            .ok_or_else(|| ServiceError::Internal(format!("{} id space exhausted", T::ENTITY)))?;
        let record = T::from_fields(id, fields);
        state.records.push(record.clone());
        state.next_id = next_id;
        if let Err(e) = self.persist(&state).await {
            state.records.pop();
            state.next_id = id;
            return Err(e);
        }
        debug!(entity = T::ENTITY, id, "record inserted");
        Ok(record)
    }

    /// All records in insertion order.
    pub async fn list(&self) -> Vec<T> {
        let state = self.inner.read().await;
        state.records.clone()
    }

    pub async fn get_by_id(&self, id: u64) -> Option<T> {
        let state = self.inner.read().await;
        state.records.iter().find(|r| r.id() == id).cloned()
    }

    /// Overwrite every non-id field of the matching record; `None` on a miss.
    pub async fn replace_by_id(&self, id: u64, fields: T::Fields) -> Result<Option<T>, ServiceError> {
        let mut state = self.inner.write().await;
        let Some(idx) = state.records.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };
        let previous = state.records[idx].clone();
        state.records[idx].replace_fields(fields);
        let updated = state.records[idx].clone();
        if let Err(e) = self.persist(&state).await {
            state.records[idx] = previous;
            return Err(e);
        }
        Ok(Some(updated))
    }

    /// Remove the record with `id` if present. Returns whether one existed;
    /// a miss is not an error.
    pub async fn delete_by_id(&self, id: u64) -> Result<bool, ServiceError> {
        let mut state = self.inner.write().await;
        let Some(idx) = state.records.iter().position(|r| r.id() == id) else {
            return Ok(false);
        };
        let removed = state.records.remove(idx);
        if let Err(e) = self.persist(&state).await {
            state.records.insert(idx, removed);
            return Err(e);
        }
        Ok(true)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn check_unique_ids<T: Record>(records: &[T], path: &Path) -> Result<(), ServiceError> {
    let mut seen = HashSet::with_capacity(records.len());
    for r in records {
        if !seen.insert(r.id()) {
            return Err(ServiceError::Internal(format!(
                "store file {} holds id {} more than once",
                path.display(),
                r.id()
            )));
        }
    }
    Ok(())
}

async fn write_snapshot<T: Serialize>(path: &PathBuf, snapshot: &Snapshot<T>) -> Result<(), ServiceError> {
    let data = serde_json::to_vec_pretty(snapshot).map_err(ServiceError::internal)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, data).await.map_err(ServiceError::internal)?;
    fs::rename(&tmp, path).await.map_err(ServiceError::internal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_store_path;
    use models::{User, UserFields};

    fn alice() -> UserFields {
        UserFields { name: "Alice Johnson".into(), email: "alice@example.com".into() }
    }

    fn named(n: &str) -> UserFields {
        UserFields { name: n.into(), email: format!("{n}@example.com") }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_from_one() -> Result<(), anyhow::Error> {
        let store = RecordStore::<User>::in_memory();
        let a = store.insert(alice()).await?;
        let b = store.insert(named("bob")).await?;
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.list().await, vec![a, b]);
        Ok(())
    }

    #[tokio::test]
    async fn get_after_insert_returns_same_fields() -> Result<(), anyhow::Error> {
        let store = RecordStore::<User>::in_memory();
        let created = store.insert(alice()).await?;
        let found = store.get_by_id(created.id).await.unwrap();
        assert_eq!(found.name, "Alice Johnson");
        assert_eq!(found.email, "alice@example.com");
        assert!(store.get_by_id(999).await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() -> Result<(), anyhow::Error> {
        let store = RecordStore::<User>::in_memory();
        store.insert(named("a")).await?;
        let b = store.insert(named("b")).await?;
        assert!(store.delete_by_id(b.id).await?);
        let c = store.insert(named("c")).await?;
        assert_eq!(c.id, 3);
        Ok(())
    }

    #[tokio::test]
    async fn delete_is_idempotent() -> Result<(), anyhow::Error> {
        let store = RecordStore::<User>::in_memory();
        let a = store.insert(named("a")).await?;
        store.insert(named("b")).await?;
        assert!(store.delete_by_id(a.id).await?);
        assert!(!store.delete_by_id(a.id).await?);
        assert!(!store.delete_by_id(42).await?);
        assert_eq!(store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn replace_missing_leaves_store_unchanged() -> Result<(), anyhow::Error> {
        let store = RecordStore::<User>::in_memory();
        let a = store.insert(alice()).await?;
        assert!(store.replace_by_id(5, named("x")).await?.is_none());
        assert_eq!(store.list().await, vec![a.clone()]);

        let updated = store.replace_by_id(a.id, named("carol")).await?.unwrap();
        assert_eq!(updated.id, a.id);
        assert_eq!(updated.name, "carol");
        assert_eq!(store.get_by_id(a.id).await.unwrap(), updated);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_inserts_get_unique_ids() -> Result<(), anyhow::Error> {
        let store = RecordStore::<User>::in_memory();
        let mut handles = Vec::new();
        for i in 0..64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.insert(named(&format!("u{i}"))).await }));
        }
        let mut ids = HashSet::new();
        for h in handles {
            ids.insert(h.await??.id);
        }
        assert_eq!(ids.len(), 64);
        assert_eq!(store.len().await, 64);
        Ok(())
    }

    #[tokio::test]
    async fn file_store_persists_records_and_counter() -> Result<(), anyhow::Error> {
        let path = temp_store_path("users");
        let store = RecordStore::<User>::open_file(&path).await?;
        assert!(store.is_empty().await);
        store.insert(named("a")).await?;
        let b = store.insert(named("b")).await?;
        store.delete_by_id(b.id).await?;

        let reloaded = RecordStore::<User>::open(&format!("file://{}", path.display())).await?;
        assert_eq!(reloaded.len().await, 1);
        let c = reloaded.insert(named("c")).await?;
        assert_eq!(c.id, 3);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn open_rejects_unknown_scheme() {
        assert!(RecordStore::<User>::open("postgres://localhost/db").await.is_err());
        assert!(RecordStore::<User>::open("MEMORY://").await.is_err());
        assert!(RecordStore::<User>::open("memory://anything").await.is_err());
        assert!(RecordStore::<User>::open("memory://").await.is_ok());
    }

    #[tokio::test]
    async fn failed_snapshot_write_rolls_back_every_mutation() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir()
            .join("flight_booking_tests")
            .join(format!("rollback_{}", uuid::Uuid::new_v4()));
        let path = dir.join("users.json");
        let store = RecordStore::<User>::open_file(&path).await?;
        let a = store.insert(named("a")).await?;
        let b = store.insert(named("b")).await?;

        tokio::fs::remove_dir_all(&dir).await?;

        assert!(matches!(store.insert(named("c")).await, Err(ServiceError::Internal(_))));
        assert!(matches!(store.replace_by_id(a.id, named("z")).await, Err(ServiceError::Internal(_))));
        assert!(matches!(store.delete_by_id(b.id).await, Err(ServiceError::Internal(_))));
        assert_eq!(store.list().await, vec![a.clone(), b.clone()]);

        tokio::fs::create_dir_all(&dir).await?;
        let c = store.insert(named("c")).await?;
        assert_eq!(c.id, 3, "failed insert must not consume an id");

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    async fn write_raw(path: &PathBuf, body: serde_json::Value) -> Result<(), anyhow::Error> {
        tokio::fs::create_dir_all(path.parent().unwrap()).await?;
        tokio::fs::write(path, serde_json::to_vec(&body)?).await?;
        Ok(())
    }

    #[tokio::test]
    async fn snapshot_at_max_id_is_rejected() -> Result<(), anyhow::Error> {
        let path = temp_store_path("max_id");
        write_raw(
            &path,
            serde_json::json!({"next_id": 1, "records": [{"id": u64::MAX, "name": "x", "email": "x@example.com"}]}),
        )
        .await?;
        assert!(matches!(RecordStore::<User>::open_file(&path).await, Err(ServiceError::Internal(_))));
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn exhausted_counter_refuses_insert() -> Result<(), anyhow::Error> {
        let path = temp_store_path("exhausted");
        write_raw(&path, serde_json::json!({"next_id": u64::MAX, "records": []})).await?;
        let store = RecordStore::<User>::open_file(&path).await?;
        assert!(matches!(store.insert(named("a")).await, Err(ServiceError::Internal(_))));
        assert!(store.is_empty().await);
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn snapshot_with_duplicate_ids_is_rejected() -> Result<(), anyhow::Error> {
        let path = temp_store_path("dupes");
        write_raw(
            &path,
            serde_json::json!({"next_id": 3, "records": [
                {"id": 1, "name": "a", "email": "a@example.com"},
                {"id": 1, "name": "b", "email": "b@example.com"}
            ]}),
        )
        .await?;
        assert!(matches!(RecordStore::<User>::open_file(&path).await, Err(ServiceError::Internal(_))));
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
