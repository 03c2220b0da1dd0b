/// Read-through caching around a fallible future.
///
/// `cached!(cache, key, ttl_secs, future)` returns the cached value for `key`
/// when there is one, otherwise awaits `future` (propagating its error with
/// `?`) and queues the result for writing. `cache` is an `Option<&Cache>`;
/// with `None` the future always runs. A failed cache read counts as a miss.
///
/// ```rust,ignore
/// cached!(self.cache.as_ref(), CacheKey::Person(id), DETAILS_CACHE_TTL, async move {
///     self.get_json::<Person>(&format!("person/{}", id), &[]).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        let cache = $cache;
        let mut hit = None;

        if let Some(cache) = cache {
            match cache.get_from_cache(&key).await {
                Ok(found) => hit = found,
                Err(e) => {
                    tracing::warn!(error = %e, key = %key, "Cache read failed, treating as miss");
                }
            }
        }

        match hit {
            Some(cached) => Ok(cached),
            None => {
                let value = $block.await?;
                if let Some(cache) = cache {
                    cache.set_in_background(&key, &value, $ttl);
                }
                Ok(value)
            }
        }
    }};
}
