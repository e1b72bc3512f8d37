use {
    futures::future::{BoxFuture, FutureExt, Shared},
    parking_lot::Mutex,
    std::{
        panic,
        sync::{Arc, Weak},
    },
    tracing::Instrument,
};

/// An update that every interested caller can await.
///
/// All of them receive the same result.
pub type Flight<ValueT, ErrorT> = Shared<BoxFuture<'static, Result<ValueT, ErrorT>>>;

type FlightSlot<ValueT, ErrorT> = Arc<Mutex<Option<Flight<ValueT, ErrorT>>>>;

//
// InFlight
//

/// Tracks the one update that may be in flight for an [Entry](super::Entry).
///
/// Starting an update while another is in flight joins the latter instead. The slot is cleared by
/// the update itself as soon as it finishes (or panics), so that the next start is a new update.
pub struct InFlight<ValueT, ErrorT> {
    slot: FlightSlot<ValueT, ErrorT>,
}

impl<ValueT, ErrorT> InFlight<ValueT, ErrorT>
where
    ValueT: 'static + Clone + Send + Sync,
    ErrorT: 'static + Clone + Send + Sync,
{
    /// Join the update in flight, or start one with the future returned by `update`.
    ///
    /// `update` is only called when starting. A started update is spawned right away on the
    /// current Tokio runtime, in the current span, and runs to completion even if nobody awaits
    /// the returned flight. A panic in the update is resumed in whoever awaits it.
    ///
    /// The returned boolean is true if we started the update.
    pub fn join_or_start<UpdateT, FutureT>(&self, update: UpdateT) -> (Flight<ValueT, ErrorT>, bool)
    where
        UpdateT: FnOnce() -> FutureT,
        FutureT: 'static + Future<Output = Result<ValueT, ErrorT>> + Send,
    {
        let mut slot = self.slot.lock();

        if let Some(flight) = slot.as_ref() {
            return (flight.clone(), false);
        }

        let landing = Landing { slot: Arc::downgrade(&self.slot) };
        let update = update();
        let task = tokio::spawn(
            async move {
                // Dropped before the task's output is ready
                let _landing = landing;
                update.await
            }
            .in_current_span(),
        );

        let flight = task
            .map(|joined| match joined {
                Ok(result) => result,
                Err(error) => match error.try_into_panic() {
                    Ok(payload) => panic::resume_unwind(payload),
                    Err(error) => panic!("update did not finish: {}", error),
                },
            })
            .boxed()
            .shared();

        *slot = Some(flight.clone());
        (flight, true)
    }

    /// Whether an update is in flight.
    pub fn is_in_flight(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl<ValueT, ErrorT> Default for InFlight<ValueT, ErrorT> {
    fn default() -> Self {
        Self { slot: Default::default() }
    }
}

// Clears the slot when the update is done with, whether it completed or panicked.
// Weak, so that a forgotten entry does not outlive its last update.
struct Landing<ValueT, ErrorT> {
    slot: Weak<Mutex<Option<Flight<ValueT, ErrorT>>>>,
}

impl<ValueT, ErrorT> Drop for Landing<ValueT, ErrorT> {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.upgrade() {
            let landed = slot.lock().take();
            drop(landed);
        }
    }
}
