mod cached;
mod entry;
mod flight;

#[allow(unused_imports)]
pub use {cached::*, entry::*, flight::*};
