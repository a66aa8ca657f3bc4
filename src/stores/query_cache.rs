use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::errors::InternalError;

/// Kind of data held in the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheEntity {
    PhaseDefinitions,
    PhaseStatuses,
    RoleGrants,
    Groups,
}

/// Which slice of an entity an entry covers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheScope {
    All,
    Group(String),
    User(String),
}

impl fmt::Display for CacheScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Group(id) => write!(f, "group:{}", id),
            Self::User(id) => write!(f, "user:{}", id),
        }
    }
}

type CacheKey = (CacheEntity, CacheScope);

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    cached_at: Instant,
}

/// Read-through cache keyed by entity and scope
///
/// Entries expire after the TTL. Every mutation must call `invalidate` or
/// `invalidate_entity` once its write has succeeded.
pub struct QueryCache {
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh cached value, if present and of the expected type
    pub fn get<T: Send + Sync + 'static>(&self, entity: CacheEntity, scope: &CacheScope) -> Option<Arc<T>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let entry = entries.get(&(entity, scope.clone()))?;
        if entry.cached_at.elapsed() > self.ttl {
            return None;
        }
        entry.value.clone().downcast::<T>().ok()
    }

    pub fn insert<T: Send + Sync + 'static>(&self, entity: CacheEntity, scope: CacheScope, value: Arc<T>) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            (entity, scope),
            CacheEntry {
                value,
                cached_at: Instant::now(),
            },
        );
    }

    /// Cached value, or the loader's result which is then cached
    ///
    /// Failed loads are not cached.
    pub async fn get_or_load<T, F, Fut>(
        &self,
        entity: CacheEntity,
        scope: CacheScope,
        loader: F,
    ) -> Result<Arc<T>, InternalError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, InternalError>>,
    {
        if let Some(hit) = self.get::<T>(entity, &scope) {
            tracing::trace!(?entity, %scope, "Query cache hit");
            return Ok(hit);
        }

        let value = Arc::new(loader().await?);
        self.insert(entity, scope, value.clone());
        Ok(value)
    }

    pub fn invalidate(&self, entity: CacheEntity, scope: &CacheScope) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries.remove(&(entity, scope.clone())).is_some() {
            tracing::debug!(?entity, %scope, "Query cache entry invalidated");
        }
    }

    /// Drop every scope of one entity
    pub fn invalidate_entity(&self, entity: CacheEntity) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.retain(|(cached_entity, _), _| *cached_entity != entity);
        tracing::debug!(?entity, "Query cache entity invalidated");
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_get_or_load_caches_result() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_load(CacheEntity::Groups, CacheScope::All, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, InternalError>(vec![1, 2, 3])
                })
                .await
                .unwrap();
            assert_eq!(*value, vec![1, 2, 3]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_not_cached() {
        let cache = QueryCache::new(Duration::from_secs(60));

        let result = cache
            .get_or_load::<Vec<i32>, _, _>(CacheEntity::Groups, CacheScope::All, || async {
                Err(InternalError::invalid("x", "boom"))
            })
            .await;

        assert!(result.is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_scopes_are_independent() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let g1 = CacheScope::Group("g1".to_string());
        let g2 = CacheScope::Group("g2".to_string());
        cache.insert(CacheEntity::PhaseStatuses, g1.clone(), Arc::new(1u8));
        cache.insert(CacheEntity::PhaseStatuses, g2.clone(), Arc::new(2u8));

        cache.invalidate(CacheEntity::PhaseStatuses, &g1);

        assert!(cache.get::<u8>(CacheEntity::PhaseStatuses, &g1).is_none());
        assert_eq!(cache.get::<u8>(CacheEntity::PhaseStatuses, &g2).as_deref(), Some(&2));
    }

    #[test]
    fn test_invalidate_entity_drops_all_scopes() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache.insert(CacheEntity::PhaseStatuses, CacheScope::Group("g1".into()), Arc::new(1u8));
        cache.insert(CacheEntity::PhaseStatuses, CacheScope::Group("g2".into()), Arc::new(2u8));
        cache.insert(CacheEntity::PhaseDefinitions, CacheScope::All, Arc::new(3u8));

        cache.invalidate_entity(CacheEntity::PhaseStatuses);

        assert_eq!(cache.len(), 1);
        assert!(cache.get::<u8>(CacheEntity::PhaseDefinitions, &CacheScope::All).is_some());
    }

    #[test]
    fn test_expired_entries_are_misses() {
        let cache = QueryCache::new(Duration::ZERO);
        cache.insert(CacheEntity::Groups, CacheScope::All, Arc::new(1u8));
        std::thread::sleep(Duration::from_millis(5));

        assert!(cache.get::<u8>(CacheEntity::Groups, &CacheScope::All).is_none());
    }

    #[test]
    fn test_wrong_type_is_a_miss() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache.insert(CacheEntity::Groups, CacheScope::All, Arc::new(1u8));

        assert!(cache.get::<String>(CacheEntity::Groups, &CacheScope::All).is_none());
    }
}
