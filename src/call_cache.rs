use super::{
    configuration::*,
    entry::*,
    store::{implementation::map::*, *},
};

use {duration_str::HumanFormat, std::marker::*, tracing::Instrument};

//
// CallCache
//

/// Per-key call deduplication cache.
///
/// Calling [invoke](Self::invoke) with a key and an operation returns the operation's last
/// successful result for that key if it is recent enough, and otherwise calls the operation. At
/// most one operation is in flight per key: concurrent callers of the same key share its result,
/// success or failure. Callers of different keys never wait on each other.
///
/// Timing is governed by [CallCacheConfiguration]:
///
/// * A result older than the expiration is never returned. The caller waits for the operation.
/// * A result older than the refresh interval (if set) is still returned immediately, but the
///   operation is also called in the background so that later callers get a newer result. A
///   failure in the background is discarded and the old result stays.
///
/// Failed operations are never cached and never retried automatically. The next invocation simply
/// decides again.
///
/// Operations are spawned on the current Tokio runtime, so invocations must happen within one. A
/// called operation always runs to completion, even if every caller stops waiting for it.
///
/// Keys are only forgotten via [remove](Self::remove) or [clear](Self::clear). There is no
/// eviction.
///
/// The key to entry mapping is provided by an [EntryStore]. The [MapEntryStore] default should
/// suffice for common use cases.
///
/// Cloning is cheap and clones share all state.
pub struct CallCache<ValueT, ErrorT, KeyT = String, StoreT = MapEntryStore<KeyT, ValueT, ErrorT>> {
    configuration: CallCacheConfiguration,
    store: StoreT,
    phantom: PhantomData<fn() -> (KeyT, ValueT, ErrorT)>,
}

impl<ValueT, ErrorT, KeyT, StoreT> CallCache<ValueT, ErrorT, KeyT, StoreT>
where
    ValueT: CallOutput,
    ErrorT: CallOutput,
    KeyT: CallKey,
    StoreT: EntryStore<KeyT, ValueT, ErrorT>,
{
    /// Constructor.
    pub fn new(configuration: CallCacheConfiguration) -> Self
    where
        StoreT: Default,
    {
        Self::new_with_store(configuration, Default::default())
    }

    /// Constructor.
    pub fn new_with_store(configuration: CallCacheConfiguration, store: StoreT) -> Self {
        if let Some(refresh_interval) = configuration.refresh_interval
            && !configuration.refreshes()
        {
            tracing::warn!(
                "refresh interval {} is not shorter than expiration {}: background refresh will never happen",
                refresh_interval.human_format(),
                configuration.expiration.human_format()
            );
        }

        Self { configuration, store, phantom: PhantomData }
    }

    /// Configuration.
    pub fn configuration(&self) -> &CallCacheConfiguration {
        &self.configuration
    }

    /// Store.
    pub fn store(&self) -> &StoreT {
        &self.store
    }

    /// Get the cached result for the key or call `op`.
    ///
    /// `op` is only called if this invocation ends up starting an update. Otherwise it is
    /// dropped.
    ///
    /// See [CallCache] for the rules.
    pub async fn invoke<OpT, FutureT>(&self, key: KeyT, op: OpT) -> Result<ValueT, ErrorT>
    where
        OpT: 'static + FnOnce() -> FutureT + Send,
        FutureT: 'static + Future<Output = Result<ValueT, ErrorT>> + Send,
    {
        let span = tracing::debug_span!("invoke", key = ?key);

        async move {
            let entry = self.store.entry(key, self.configuration).await;
            entry.invoke(op).await
        }
        .instrument(span)
        .await
    }

    /// Forget the key.
    ///
    /// An update in flight for the key is not cancelled, but its result will not be seen by
    /// future invocations, which start over as if the key were never used.
    pub async fn remove(&self, key: &KeyT) {
        tracing::debug!("remove: {:?}", key);
        self.store.remove(key).await
    }

    /// Forget all keys.
    pub async fn clear(&self) {
        tracing::debug!("clear");
        self.store.clear().await
    }

    /// The cached result for the key, regardless of its age.
    ///
    /// Does not call anything nor create an entry for the key.
    pub async fn peek(&self, key: &KeyT) -> Option<ValueT> {
        self.store.get(key).await.and_then(|entry| entry.peek())
    }

    /// Number of keys with an entry.
    pub async fn len(&self) -> u64 {
        self.store.count().await
    }

    /// Whether there are no keys with an entry.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<ValueT, ErrorT, KeyT, StoreT> Clone for CallCache<ValueT, ErrorT, KeyT, StoreT>
where
    StoreT: Clone,
{
    fn clone(&self) -> Self {
        // Can't #[derive(Clone)] without requiring the phantom types to be Clone
        Self { configuration: self.configuration, store: self.store.clone(), phantom: PhantomData }
    }
}

impl<ValueT, ErrorT, KeyT, StoreT> Default for CallCache<ValueT, ErrorT, KeyT, StoreT>
where
    ValueT: CallOutput,
    ErrorT: CallOutput,
    KeyT: CallKey,
    StoreT: EntryStore<KeyT, ValueT, ErrorT> + Default,
{
    fn default() -> Self {
        Self::new(Default::default())
    }
}
