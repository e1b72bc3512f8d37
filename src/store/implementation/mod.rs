/// Mutex-guarded map implementation.
pub mod map;

/// Moka implementation.
#[cfg(feature = "moka")]
pub mod moka;
