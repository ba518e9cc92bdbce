//! Process-lifetime registry of purge database handles.

use purge_store::{DocumentServer, PurgeDb, StoreError};
use purge_types::{purge_db_name, RoleSet};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Maps role sets to their dedicated purge database.
///
/// Handles are keyed by role hash, opened lazily and never evicted; the
/// number of distinct role sets is assumed to be small.
pub struct PurgeDbRegistry {
    server: Arc<dyn DocumentServer>,
    base_name: String,
    dbs: Mutex<HashMap<String, Arc<dyn PurgeDb>>>,
}

impl PurgeDbRegistry {
    pub fn new(server: Arc<dyn DocumentServer>, base_name: impl Into<String>) -> Self {
        Self {
            server,
            base_name: base_name.into(),
            dbs: Mutex::new(HashMap::new()),
        }
    }

    /// Return the purge database for `roles`, opening it on first use.
    ///
    /// Set-equal role sets always get the same handle. If two callers race
    /// to open the same database, the first handle registered wins and both
    /// callers receive it.
    pub async fn resolve(&self, roles: &RoleSet) -> Result<Arc<dyn PurgeDb>, StoreError> {
        let hash = roles.hash();
        let cached = self.lock().get(&hash).cloned();
        if let Some(db) = cached {
            return Ok(db);
        }

        let name = purge_db_name(&self.base_name, &hash);
        let db = self.server.open_or_create(&name).await?;
        tracing::debug!(role_hash = %hash, db = %name, "opened purge database");

        Ok(Arc::clone(self.lock().entry(hash).or_insert(db)))
    }

    /// Number of registered handles.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<dyn PurgeDb>>> {
        self.dbs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use purge_nullables::NullDocumentServer;

    fn registry(server: &Arc<NullDocumentServer>) -> PurgeDbRegistry {
        PurgeDbRegistry::new(Arc::clone(server) as Arc<dyn DocumentServer>, "medic")
    }

    #[tokio::test]
    async fn set_equal_role_sets_share_a_handle() {
        let server = Arc::new(NullDocumentServer::new());
        let registry = registry(&server);

        let a = registry.resolve(&RoleSet::new(["chw", "nurse"])).await.unwrap();
        let b = registry.resolve(&RoleSet::new(["nurse", "chw", "chw"])).await.unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
        assert_eq!(server.open_calls(), 1);
    }

    #[tokio::test]
    async fn database_name_is_derived_from_role_hash() {
        let server = Arc::new(NullDocumentServer::new());
        let registry = registry(&server);
        let roles = RoleSet::new(["chw"]);

        let db = registry.resolve(&roles).await.unwrap();
        assert_eq!(db.name(), format!("medic-purged-role-{}", roles.hash()));
    }

    #[tokio::test]
    async fn different_role_sets_get_different_databases() {
        let server = Arc::new(NullDocumentServer::new());
        let registry = registry(&server);

        let a = registry.resolve(&RoleSet::new(["chw"])).await.unwrap();
        let b = registry.resolve(&RoleSet::new(["nurse"])).await.unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn open_failure_is_propagated_and_not_cached() {
        let server = Arc::new(NullDocumentServer::new());
        let registry = registry(&server);
        let roles = RoleSet::new(["chw"]);

        server.set_unavailable(true);
        assert!(registry.resolve(&roles).await.is_err());
        assert!(registry.is_empty());

        server.set_unavailable(false);
        assert!(registry.resolve(&roles).await.is_ok());
        assert_eq!(registry.len(), 1);
    }
}
