//! In-memory layout cache using DashMap

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use log::debug;
use tokio::sync::OnceCell;

use crate::error::Error;
use crate::model::Layout;

type LayoutKey = (String, String);

/// A concurrent cache of layouts keyed by database and layout name.
///
/// Concurrent first lookups of the same layout share one fetch: the first
/// caller runs the initializer and the others wait for its result. A failed
/// fetch leaves the entry empty so the next caller tries again.
///
/// # Example
///
/// ```
/// use fmxml_lib::cache::LayoutCache;
///
/// let cache = LayoutCache::new();
/// assert!(cache.get("Sales", "Invoices").is_none());
/// ```
#[derive(Debug, Default)]
pub struct LayoutCache {
    store: DashMap<LayoutKey, Arc<OnceCell<Arc<Layout>>>>,
}

impl LayoutCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Returns a cached layout.
    pub fn get(&self, database: &str, layout: &str) -> Option<Arc<Layout>> {
        let key = (database.to_string(), layout.to_string());
        self.store.get(&key)?.get().cloned()
    }

    /// Stores a layout under its own database and layout name.
    ///
    /// An entry that is already initialized keeps its layout.
    pub fn insert(&self, layout: Arc<Layout>) {
        let key = (layout.database_name().to_string(), layout.name().to_string());
        let cell = Arc::clone(&self.store.entry(key).or_default());
        if cell.set(layout).is_err() {
            debug!("Layout already cached, keeping the existing entry");
        }
    }

    /// Returns the cached layout, or runs `init` to fetch it.
    ///
    /// # Errors
    ///
    /// Returns the error of `init`; nothing is cached in that case.
    pub async fn get_or_try_init<F, Fut>(
        &self,
        database: &str,
        layout: &str,
        init: F,
    ) -> Result<Arc<Layout>, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<Layout>, Error>>,
    {
        let key = (database.to_string(), layout.to_string());
        // Clone the cell out so no map guard is held across the await.
        let cell = Arc::clone(&self.store.entry(key).or_default());

        if let Some(cached) = cell.get() {
            debug!("Layout cache hit: {}/{}", database, layout);
            return Ok(Arc::clone(cached));
        }

        cell.get_or_try_init(|| async move {
            debug!("Layout cache miss: {}/{}", database, layout);
            init().await
        })
        .await
        .cloned()
    }

    /// Removes one layout.
    pub fn remove(&self, database: &str, layout: &str) {
        self.store
            .remove(&(database.to_string(), layout.to_string()));
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    /// Returns the number of entries, including ones still being fetched.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::error::DataError;
    use crate::parse::parse_result_set;

    fn layout(name: &str) -> Arc<Layout> {
        let xml = format!(
            r#"<fmresultset><error code="0"/>
              <datasource database="Sales" layout="{name}" table="{name}" total-count="0"/>
              <metadata/></fmresultset>"#
        );
        let document = parse_result_set(xml.as_bytes()).unwrap();
        Arc::new(Layout::new(&document, None).unwrap())
    }

    #[test]
    fn test_insert_and_get() {
        let cache = LayoutCache::new();
        cache.insert(layout("Invoices"));

        assert_eq!(cache.get("Sales", "Invoices").unwrap().name(), "Invoices");
        assert!(cache.get("Other", "Invoices").is_none());
        assert_eq!(cache.len(), 1);

        cache.remove("Sales", "Invoices");
        assert!(cache.get("Sales", "Invoices").is_none());
    }

    #[tokio::test]
    async fn test_concurrent_misses_fetch_once() {
        let cache = LayoutCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(layout("Invoices"))
        };

        let (a, b) = tokio::join!(
            cache.get_or_try_init("Sales", "Invoices", fetch),
            cache.get_or_try_init("Sales", "Invoices", fetch),
        );

        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache = LayoutCache::new();

        let failed = cache
            .get_or_try_init("Sales", "Invoices", || async {
                Err(DataError::EmptyResponse.into())
            })
            .await;
        assert!(failed.is_err());
        assert!(cache.get("Sales", "Invoices").is_none());

        let fetched = cache
            .get_or_try_init("Sales", "Invoices", || async { Ok(layout("Invoices")) })
            .await
            .unwrap();
        assert_eq!(fetched.name(), "Invoices");
        assert!(cache.get("Sales", "Invoices").is_some());
    }
}
