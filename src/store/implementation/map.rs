use super::super::{
    super::{configuration::*, entry::*},
    key::*,
    store::*,
};

use {
    parking_lot::Mutex,
    std::{collections::*, sync::*},
};

//
// MapEntryStore
//

/// [EntryStore] backed by a [HashMap].
///
/// The lock is held only for the map operation itself, never while an entry is being invoked.
pub struct MapEntryStore<KeyT, ValueT, ErrorT> {
    entries: Arc<Mutex<HashMap<KeyT, EntryRef<ValueT, ErrorT>>>>,
}

impl<KeyT, ValueT, ErrorT> EntryStore<KeyT, ValueT, ErrorT> for MapEntryStore<KeyT, ValueT, ErrorT>
where
    KeyT: CallKey,
    ValueT: CallOutput,
    ErrorT: CallOutput,
{
    async fn entry(&self, key: KeyT, configuration: CallCacheConfiguration) -> EntryRef<ValueT, ErrorT> {
        self.entries
            .lock()
            .entry(key)
            .or_insert_with_key(|key| {
                tracing::trace!("new entry: {:?}", key);
                Arc::new(Entry::new(configuration))
            })
            .clone()
    }

    async fn get(&self, key: &KeyT) -> Option<EntryRef<ValueT, ErrorT>> {
        self.entries.lock().get(key).cloned()
    }

    async fn remove(&self, key: &KeyT) {
        // Drop the entry outside the lock
        let removed = self.entries.lock().remove(key);
        drop(removed);
    }

    async fn clear(&self) {
        let cleared = std::mem::take(&mut *self.entries.lock());
        drop(cleared);
    }

    async fn count(&self) -> u64 {
        self.entries.lock().len() as u64
    }
}

impl<KeyT, ValueT, ErrorT> Clone for MapEntryStore<KeyT, ValueT, ErrorT> {
    fn clone(&self) -> Self {
        Self { entries: self.entries.clone() }
    }
}

impl<KeyT, ValueT, ErrorT> Default for MapEntryStore<KeyT, ValueT, ErrorT> {
    fn default() -> Self {
        Self { entries: Default::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn one_entry_per_key() {
        let store = MapEntryStore::<String, u32, String>::default();
        let configuration = CallCacheConfiguration::default();

        let first = store.entry("key".into(), configuration).await;
        let second = store.entry("key".into(), configuration).await;
        let other = store.entry("other".into(), configuration).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(store.count().await, 2);
    }

    #[tokio::test]
    async fn remove_forgets_entry() {
        let store = MapEntryStore::<String, u32, String>::default();
        let configuration = CallCacheConfiguration::default();

        let first = store.entry("key".into(), configuration).await;
        store.remove(&"key".into()).await;
        assert!(store.get(&"key".into()).await.is_none());

        let second = store.entry("key".into(), configuration).await;
        assert!(!Arc::ptr_eq(&first, &second));

        // Removing an absent key is fine
        store.remove(&"absent".into()).await;
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let store = MapEntryStore::<String, u32, String>::default();
        let clone = store.clone();

        let first = store.entry("key".into(), Default::default()).await;
        let second = clone.get(&"key".into()).await.expect("entry");
        assert!(Arc::ptr_eq(&first, &second));

        clone.clear().await;
        assert_eq!(store.count().await, 0);
    }
}
