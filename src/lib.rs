// https://stackoverflow.com/a/61417700
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod call_cache;
mod configuration;
mod error;

/// Per-key cached call state.
pub mod entry;

/// Key to entry mapping.
pub mod store;

pub use {call_cache::*, configuration::*, error::*};
