use super::{super::configuration::*, cached::*, flight::*};

use {duration_str::HumanFormat, std::sync::Arc, tokio::time::Instant};

/// Common reference type for [Entry].
pub type EntryRef<ValueT, ErrorT> = Arc<Entry<ValueT, ErrorT>>;

//
// CallOutput
//

/// Values and errors produced by a cached call.
///
/// One execution of an operation is shared by every caller that joined it, so both its value and
/// its error must be cloneable and shareable across threads.
pub trait CallOutput
where
    Self: 'static + Clone + Send + Sync,
{
}

impl<OutputT> CallOutput for OutputT where OutputT: 'static + Clone + Send + Sync {}

//
// Entry
//

/// Cached call state for one key.
///
/// Holds the last successful value, when it was stored, and the update in flight (if any).
///
/// On every [invoke](Self::invoke) the age of the cached value decides what happens:
///
/// * Never stored or older than the expiration: update now and return the update's result. Callers
///   that arrive while the update is in flight join it rather than calling their own operation.
/// * Older than the refresh interval: return the cached value, and update in the background.
/// * Otherwise: return the cached value.
///
/// Right before calling the operation, an update checks the age again, because another update may
/// have stored a value since the caller looked. If the value is now fresh the operation is not
/// called at all.
///
/// Failed operations never touch the cached value.
pub struct Entry<ValueT, ErrorT> {
    configuration: CallCacheConfiguration,
    cached: CachedCell<ValueT>,
    in_flight: InFlight<ValueT, ErrorT>,
}

impl<ValueT, ErrorT> Entry<ValueT, ErrorT>
where
    ValueT: CallOutput,
    ErrorT: CallOutput,
{
    /// Constructor.
    pub fn new(configuration: CallCacheConfiguration) -> Self {
        Self { configuration, cached: Default::default(), in_flight: Default::default() }
    }

    /// Configuration.
    pub fn configuration(&self) -> &CallCacheConfiguration {
        &self.configuration
    }

    /// The cached value, regardless of its age.
    pub fn peek(&self) -> Option<ValueT> {
        self.cached.value()
    }

    /// When the cached value was stored.
    ///
    /// [None] if it never was.
    pub fn last_update(&self) -> Option<Instant> {
        self.cached.updated()
    }

    /// Whether an update is in flight.
    pub fn is_updating(&self) -> bool {
        self.in_flight.is_in_flight()
    }

    /// Get the cached value or call `op`, depending on the cached value's age.
    ///
    /// `op` is only called if this invocation ends up starting an update.
    pub async fn invoke<OpT, FutureT>(&self, op: OpT) -> Result<ValueT, ErrorT>
    where
        OpT: 'static + FnOnce() -> FutureT + Send,
        FutureT: 'static + Future<Output = Result<ValueT, ErrorT>> + Send,
    {
        let now = Instant::now();
        let configuration = self.configuration;
        let (value, elapsed) = self
            .cached
            .snapshot(now, |elapsed| configuration.staleness(Some(elapsed)) != Staleness::Expired);

        match (self.configuration.staleness(elapsed), value) {
            (Staleness::Fresh, Some(value)) => {
                tracing::trace!("hit");
                Ok(value)
            }

            (Staleness::Stale, Some(value)) => {
                if let Some(elapsed) = elapsed {
                    tracing::debug!("stale after {}: refreshing in background", elapsed.human_format());
                }
                self.refresh(op);
                Ok(value)
            }

            _ => {
                tracing::debug!("expired: updating");
                self.update(op).await
            }
        }
    }

    // Update without waiting. Its result is discarded.
    fn refresh<OpT, FutureT>(&self, op: OpT)
    where
        OpT: 'static + FnOnce() -> FutureT + Send,
        FutureT: 'static + Future<Output = Result<ValueT, ErrorT>> + Send,
    {
        let _span = tracing::debug_span!("background refresh").entered();
        drop(self.update(op));
    }

    // Join the update in flight or start a new one. A started update runs to completion on its own
    // task, whether or not the flight is awaited.
    fn update<OpT, FutureT>(&self, op: OpT) -> Flight<ValueT, ErrorT>
    where
        OpT: 'static + FnOnce() -> FutureT + Send,
        FutureT: 'static + Future<Output = Result<ValueT, ErrorT>> + Send,
    {
        let configuration = self.configuration;
        let cached = self.cached.clone();

        let (flight, started) = self.in_flight.join_or_start(move || async move {
            let now = Instant::now();

            if let (Some(value), _) = cached.snapshot(now, |elapsed| configuration.is_fresh(Some(elapsed))) {
                tracing::debug!("updated meanwhile: not calling");
                return Ok(value);
            }

            let result = op().await;
            if let Ok(value) = &result {
                cached.store(value.clone(), now);
                tracing::debug!("updated");
            }
            result
        });

        if !started {
            tracing::trace!("joining update in flight");
        }

        flight
    }
}
