use {
    parking_lot::RwLock,
    std::{sync::Arc, time::Duration},
    tokio::time::Instant,
};

//
// Cached
//

/// Cached value with the instant it was stored.
#[derive(Clone, Debug)]
pub struct Cached<ValueT> {
    /// Value.
    pub value: ValueT,

    /// When the update that produced the value started.
    pub updated: Instant,
}

//
// CachedCell
//

/// Shared, lockable [Cached] slot.
///
/// Empty until the first successful update. Value and timestamp are always replaced together.
///
/// Cloning is cheap and clones refer to the same slot.
#[derive(Debug)]
pub struct CachedCell<ValueT> {
    inner: Arc<RwLock<Option<Cached<ValueT>>>>,
}

impl<ValueT> CachedCell<ValueT>
where
    ValueT: Clone,
{
    /// The age of the cached value at `now`, and the value itself if `wanted` at that age.
    ///
    /// Both are [None] if nothing was stored yet. The value is only cloned if wanted.
    pub fn snapshot<WantedT>(&self, now: Instant, wanted: WantedT) -> (Option<ValueT>, Option<Duration>)
    where
        WantedT: FnOnce(Duration) -> bool,
    {
        match self.inner.read().as_ref() {
            Some(cached) => {
                let elapsed = now.saturating_duration_since(cached.updated);
                let value = if wanted(elapsed) { Some(cached.value.clone()) } else { None };
                (value, Some(elapsed))
            }

            None => (None, None),
        }
    }

    /// The cached value.
    pub fn value(&self) -> Option<ValueT> {
        self.inner.read().as_ref().map(|cached| cached.value.clone())
    }

    /// When the cached value was stored.
    pub fn updated(&self) -> Option<Instant> {
        self.inner.read().as_ref().map(|cached| cached.updated)
    }

    /// Replace the cached value.
    pub fn store(&self, value: ValueT, updated: Instant) {
        *self.inner.write() = Some(Cached { value, updated });
    }
}

impl<ValueT> Clone for CachedCell<ValueT> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<ValueT> Default for CachedCell<ValueT> {
    fn default() -> Self {
        Self { inner: Default::default() }
    }
}
