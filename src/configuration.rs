use super::error::*;

use std::time::*;

/// Default expiration.
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(60);

//
// Staleness
//

/// How a cached value relates to the configured thresholds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Staleness {
    /// Can be served as is.
    Fresh,

    /// Can still be served, but should be refreshed in the background.
    Stale,

    /// Must not be served. Recompute before returning.
    Expired,
}

//
// CallCacheConfiguration
//

/// Call cache configuration.
///
/// Both durations apply uniformly to every key of a [CallCache](super::CallCache) and are fixed
/// once it is constructed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CallCacheConfiguration {
    /// Age after which a cached value is unusable and must be recomputed before it is returned.
    pub expiration: Duration,

    /// Age after which a still-valid cached value triggers a background recompute.
    ///
    /// [None] disables background refresh.
    pub refresh_interval: Option<Duration>,
}

impl CallCacheConfiguration {
    /// Constructor.
    ///
    /// A zero refresh interval is the same as [None].
    pub fn new(expiration: Duration, refresh_interval: Option<Duration>) -> Self {
        Self::default().expire_after(expiration).refresh_after(refresh_interval.unwrap_or_default())
    }

    /// Parse from human-readable durations, e.g. "1m" or "1h 30m".
    ///
    /// An empty or absent refresh interval disables background refresh.
    ///
    /// Parsing is handled by [duration-str](https://github.com/baoyachi/duration-str).
    pub fn parse(expiration: &str, refresh_interval: Option<&str>) -> Result<Self, ConfigurationError> {
        let expiration = parse_duration("expiration", expiration)?;

        let refresh_interval = match refresh_interval.map(str::trim) {
            Some(refresh_interval) if !refresh_interval.is_empty() => {
                parse_duration("refresh_interval", refresh_interval)?
            }
            _ => Duration::ZERO,
        };

        Ok(Self::new(expiration, Some(refresh_interval)))
    }

    /// Set the expiration.
    ///
    /// The default is 1 minute.
    pub fn expire_after(mut self, expiration: Duration) -> Self {
        self.expiration = expiration;
        self
    }

    /// Set the refresh interval.
    ///
    /// Zero disables background refresh, which is the default.
    pub fn refresh_after(mut self, refresh_interval: Duration) -> Self {
        self.refresh_interval = if refresh_interval.is_zero() { None } else { Some(refresh_interval) };
        self
    }

    /// Whether background refresh can ever happen.
    ///
    /// It can't if the value expires before it becomes stale.
    pub fn refreshes(&self) -> bool {
        self.refresh_interval.is_some_and(|refresh_interval| refresh_interval < self.expiration)
    }

    /// Classify a cached value by its age.
    ///
    /// [None] means the value was never stored, which is always [Staleness::Expired].
    pub fn staleness(&self, elapsed: Option<Duration>) -> Staleness {
        match elapsed {
            None => Staleness::Expired,

            Some(elapsed) => {
                if elapsed > self.expiration {
                    Staleness::Expired
                } else if self.refresh_interval.is_some_and(|refresh_interval| elapsed > refresh_interval) {
                    Staleness::Stale
                } else {
                    Staleness::Fresh
                }
            }
        }
    }

    /// Whether a value of this age can be served without recomputing it.
    ///
    /// Stricter than [staleness](Self::staleness): it is used right before calling the operation,
    /// and a value right at a threshold is not considered fresh.
    pub fn is_fresh(&self, elapsed: Option<Duration>) -> bool {
        elapsed.is_some_and(|elapsed| {
            (elapsed < self.expiration)
                && self.refresh_interval.is_none_or(|refresh_interval| elapsed < refresh_interval)
        })
    }
}

impl Default for CallCacheConfiguration {
    fn default() -> Self {
        Self { expiration: DEFAULT_EXPIRATION, refresh_interval: None }
    }
}

fn parse_duration(option: &'static str, representation: &str) -> Result<Duration, ConfigurationError> {
    duration_str::parse(representation)
        .map_err(|error| ConfigurationError::Duration { option, message: error.to_string() })
}
