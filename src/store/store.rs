use super::{
    super::{configuration::*, entry::*},
    key::*,
};

//
// EntryStore
//

/// Maps keys to their [Entry].
///
/// There is at most one entry per key at any time. Entries are created on first use and only
/// removed explicitly: the store must not evict on its own.
///
/// Implementations should ensure that cloning is cheap and clones always refer to the same shared
/// state.
///
/// Note that the methods are `async` functions written in longer form in order to include the
/// `Send` constraint. Implementations can simply use `async fn`.
#[allow(async_fn_in_trait)]
pub trait EntryStore<KeyT, ValueT, ErrorT>
where
    Self: 'static + Clone + Send + Sync,
    KeyT: CallKey,
    ValueT: CallOutput,
    ErrorT: CallOutput,
{
    /// Get the key's entry, creating it with `configuration` if there is none.
    fn entry(
        &self,
        key: KeyT,
        configuration: CallCacheConfiguration,
    ) -> impl Future<Output = EntryRef<ValueT, ErrorT>> + Send;

    /// Get the key's entry without creating it.
    fn get(&self, key: &KeyT) -> impl Future<Output = Option<EntryRef<ValueT, ErrorT>>> + Send;

    /// Remove the key's entry, if there is one.
    fn remove(&self, key: &KeyT) -> impl Future<Output = ()> + Send;

    /// Remove all entries.
    fn clear(&self) -> impl Future<Output = ()> + Send;

    /// Number of entries.
    fn count(&self) -> impl Future<Output = u64> + Send;
}
