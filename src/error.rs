use thiserror::*;

//
// ConfigurationError
//

/// Configuration error.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConfigurationError {
    /// Malformed duration.
    #[error("malformed duration for {option}: {message}")]
    Duration {
        /// Option name.
        option: &'static str,

        /// Parser message.
        message: String,
    },
}
