use async_trait::async_trait;
use moka::future::Cache;

use super::{ColorPair, ColorResolver};
use crate::error::ResolverError;

/// Memoizes successful lookups of an inner resolver.
///
/// Concurrent misses for the same entity share one inner lookup. Failures are
/// not cached.
pub struct CachedColorResolver<R> {
    inner: R,
    cache: Cache<String, ColorPair>,
}

impl<R: ColorResolver> CachedColorResolver<R> {
    pub fn new(inner: R, max_capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(max_capacity),
        }
    }
}

#[async_trait]
impl<R: ColorResolver> ColorResolver for CachedColorResolver<R> {
    async fn get_colors(&self, entity_id: &str) -> Result<ColorPair, ResolverError> {
        self.cache
            .try_get_with(entity_id.to_string(), self.inner.get_colors(entity_id))
            .await
            .map_err(|e| ResolverError::new(entity_id, e.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ColorResolver for Counting {
        async fn get_colors(&self, entity_id: &str) -> Result<ColorPair, ResolverError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if entity_id == "broken" {
                return Err(ResolverError::new(entity_id, "no avatar"));
            }
            Ok([format!("{entity_id}-1"), format!("{entity_id}-2")])
        }
    }

    #[tokio::test]
    async fn test_second_lookup_hits_cache() {
        let resolver = CachedColorResolver::new(Counting::default(), 100);

        let first = resolver.get_colors("alice").await.unwrap();
        let second = resolver.get_colors("alice").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(resolver.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let resolver = CachedColorResolver::new(Counting::default(), 100);

        let err = resolver.get_colors("broken").await.unwrap_err();
        assert_eq!(err.message, "no avatar");
        assert!(resolver.get_colors("broken").await.is_err());

        assert_eq!(resolver.inner.calls.load(Ordering::SeqCst), 2);
    }
}
