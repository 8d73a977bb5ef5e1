//! Timing and protocol settings for mode 6 queries.

use std::time::Duration;

use super::TracingConfig;
use crate::{fragment::CollectorLimits, protocol::ProtocolVersion};

/// Default wait for the first fragment of a response.
pub const DEFAULT_PRIMARY_TIMEOUT: Duration = Duration::from_secs(5);
/// Default wait for each later fragment.
pub const DEFAULT_SECONDARY_TIMEOUT: Duration = Duration::from_secs(3);

const MIN_TIMEOUT: Duration = Duration::from_millis(1);

/// Settings shared by every query issued through a client.
///
/// # Default Values
/// - `primary_timeout`: 5 seconds
/// - `secondary_timeout`: 3 seconds
/// - `version`: 2
/// - `always_authenticate`: `false`
/// - `limits`: [`CollectorLimits::default`]
///
/// # Invariants
/// - both timeouts are at least 1 millisecond once normalised
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use ntp_mode6::client::QueryConfig;
///
/// let config = QueryConfig::default()
///     .with_primary_timeout(Duration::ZERO)
///     .with_secondary_timeout(Duration::from_millis(250))
///     .normalized();
/// assert_eq!(config.primary_timeout(), Duration::from_millis(1));
/// assert_eq!(config.secondary_timeout(), Duration::from_millis(250));
/// ```
#[derive(Clone, Debug)]
pub struct QueryConfig {
    primary_timeout: Duration,
    secondary_timeout: Duration,
    version: ProtocolVersion,
    always_authenticate: bool,
    limits: CollectorLimits,
    tracing: TracingConfig,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            primary_timeout: DEFAULT_PRIMARY_TIMEOUT,
            secondary_timeout: DEFAULT_SECONDARY_TIMEOUT,
            version: ProtocolVersion::default(),
            always_authenticate: false,
            limits: CollectorLimits::default(),
            tracing: TracingConfig::default(),
        }
    }
}

impl QueryConfig {
    /// Set the wait used until the first fragment is accepted.
    #[must_use]
    pub fn with_primary_timeout(mut self, timeout: Duration) -> Self {
        self.primary_timeout = timeout;
        self
    }

    /// Set the wait used once at least one fragment has been accepted.
    #[must_use]
    pub fn with_secondary_timeout(mut self, timeout: Duration) -> Self {
        self.secondary_timeout = timeout;
        self
    }

    /// Set the protocol version stamped on requests.
    #[must_use]
    pub fn with_version(mut self, version: ProtocolVersion) -> Self {
        self.version = version;
        self
    }

    /// Sign every request, whether or not the query asks for it.
    #[must_use]
    pub fn with_always_authenticate(mut self, enabled: bool) -> Self {
        self.always_authenticate = enabled;
        self
    }

    /// Replace the fragment collection limits.
    #[must_use]
    pub fn with_limits(mut self, limits: CollectorLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Replace the tracing configuration.
    #[must_use]
    pub fn with_tracing(mut self, tracing: TracingConfig) -> Self {
        self.tracing = tracing;
        self
    }

    /// Clamp timeouts and limits to usable values.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.primary_timeout = self.primary_timeout.max(MIN_TIMEOUT);
        self.secondary_timeout = self.secondary_timeout.max(MIN_TIMEOUT);
        self.limits = self.limits.normalized();
        self
    }

    /// Wait used until the first fragment is accepted.
    #[must_use]
    pub const fn primary_timeout(&self) -> Duration { self.primary_timeout }

    /// Wait used once at least one fragment has been accepted.
    #[must_use]
    pub const fn secondary_timeout(&self) -> Duration { self.secondary_timeout }

    /// Protocol version stamped on requests.
    #[must_use]
    pub const fn version(&self) -> ProtocolVersion { self.version }

    /// Report whether every request is signed.
    #[must_use]
    pub const fn always_authenticate(&self) -> bool { self.always_authenticate }

    /// Fragment collection limits.
    #[must_use]
    pub const fn limits(&self) -> CollectorLimits { self.limits }

    /// Tracing configuration.
    #[must_use]
    pub const fn tracing(&self) -> &TracingConfig { &self.tracing }
}
