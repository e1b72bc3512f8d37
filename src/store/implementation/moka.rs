use super::super::{
    super::{configuration::*, entry::*},
    key::*,
    store::*,
};

use std::{ops::*, sync::*};

//
// MokaEntryStore
//

/// [EntryStore] backed by a Moka cache.
///
/// Moka is used purely as a concurrent map. The cache must not have a capacity or expiry of its
/// own because entries are only ever removed explicitly, and staleness is handled per entry. See
/// [new_moka_entry_store].
pub type MokaEntryStore<KeyT, ValueT, ErrorT> = Arc<moka::future::Cache<KeyT, EntryRef<ValueT, ErrorT>>>;

/// Create a [MokaEntryStore].
pub fn new_moka_entry_store<KeyT, ValueT, ErrorT>(name: &str) -> MokaEntryStore<KeyT, ValueT, ErrorT>
where
    KeyT: CallKey,
    ValueT: CallOutput,
    ErrorT: CallOutput,
{
    Arc::new(
        moka::future::Cache::builder()
            .name(name)
            .eviction_listener(|key, _entry, cause| {
                tracing::trace!("remove ({:?}): {:?}", cause, key);
            })
            .build(),
    )
}

impl<KeyT, ValueT, ErrorT> EntryStore<KeyT, ValueT, ErrorT> for MokaEntryStore<KeyT, ValueT, ErrorT>
where
    KeyT: CallKey,
    ValueT: CallOutput,
    ErrorT: CallOutput,
{
    async fn entry(&self, key: KeyT, configuration: CallCacheConfiguration) -> EntryRef<ValueT, ErrorT> {
        self.deref().get_with(key, async move { Arc::new(Entry::new(configuration)) }).await
    }

    async fn get(&self, key: &KeyT) -> Option<EntryRef<ValueT, ErrorT>> {
        self.deref().get(key).await
    }

    async fn remove(&self, key: &KeyT) {
        self.deref().invalidate(key).await
    }

    async fn clear(&self) {
        self.deref().invalidate_all()
    }

    async fn count(&self) -> u64 {
        // Otherwise the count may lag behind recent changes
        self.deref().run_pending_tasks().await;
        self.deref().entry_count()
    }
}
