/// Read-through caching around an async computation.
///
/// Returns the cached value when present. Otherwise awaits `$block`, hands
/// the result to the background writer and returns it. A failed cache read
/// is logged and treated as a miss; errors from `$block` propagate with `?`.
///
/// # Arguments
/// * `$cache`: a [`Cache`](crate::db::Cache).
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) to read and write.
/// * `$ttl`: time-to-live in seconds.
/// * `$block`: future producing an `AppResult` of the value.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache, CacheKey::Genres(kind), GENRE_CACHE_TTL, async move {
///     self.fetch_genres(kind).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(cached)
            }
            read => {
                if let Err(e) = read {
                    tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                }
                let value = $block.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
