use {
    std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    tracing_subscriber::*,
};

pub fn init_tracing() {
    // Ignore the error: another test may have initialized it
    _ = fmt().with_env_filter(EnvFilter::from_default_env()).with_test_writer().try_init();
}

//
// Calls
//

/// Counts operation calls.
#[derive(Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// An operation returning the value.
    pub fn returning(
        &self,
        value: u32,
    ) -> impl 'static + FnOnce() -> futures::future::Ready<Result<u32, String>> + Send {
        let calls = self.0.clone();
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(Ok(value))
        }
    }

    /// An operation failing with the message.
    pub fn failing(
        &self,
        message: &str,
    ) -> impl 'static + FnOnce() -> futures::future::Ready<Result<u32, String>> + Send {
        let calls = self.0.clone();
        let message = message.to_string();
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(Err(message))
        }
    }
}
