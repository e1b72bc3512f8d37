mod key;
mod store;

/// Entry store implementations.
pub mod implementation;

#[allow(unused_imports)]
pub use {key::*, store::*};
