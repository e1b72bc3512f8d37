use std::{fmt, hash::*};

//
// CallKey
//

/// Call key.
///
/// Identifies independent cached state. Compared by equality only.
pub trait CallKey
where
    Self: 'static + Clone + fmt::Debug + Eq + Hash + Send + Sync,
{
}

impl<KeyT> CallKey for KeyT where KeyT: 'static + Clone + fmt::Debug + Eq + Hash + Send + Sync {}
