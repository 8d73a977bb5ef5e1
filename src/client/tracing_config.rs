//! Tracing configuration for mode 6 queries.
//!
//! [`TracingConfig`] controls the level of the spans wrapped around each
//! query and each attempt, and whether elapsed-time events are recorded.

use tracing::Level;

/// Controls tracing span levels and timing for client operations.
///
/// By default the `query` span is emitted at `DEBUG` and each `attempt` span
/// at `TRACE`. Timing is disabled.
///
/// Spans are always created at the configured level. When no `tracing`
/// subscriber is installed, span creation is a no-op. When timing is enabled
/// for an operation, an event recording `elapsed_us` is emitted when the
/// operation completes.
///
/// # Examples
///
/// ```
/// use ntp_mode6::client::TracingConfig;
/// use tracing::Level;
///
/// let config = TracingConfig::default()
///     .with_query_level(Level::INFO)
///     .with_query_timing(true);
/// let _ = config;
///
/// let verbose = TracingConfig::default()
///     .with_all_levels(Level::TRACE)
///     .with_all_timing(true);
/// let _ = verbose;
/// ```
#[derive(Clone, Debug)]
pub struct TracingConfig {
    pub(crate) query_level: Level,
    pub(crate) attempt_level: Level,
    pub(crate) query_timing: bool,
    pub(crate) attempt_timing: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            query_level: Level::DEBUG,
            attempt_level: Level::TRACE,
            query_timing: false,
            attempt_timing: false,
        }
    }
}

impl TracingConfig {
    /// Set the tracing level for the `query` span.
    #[must_use]
    pub fn with_query_level(mut self, level: Level) -> Self {
        self.query_level = level;
        self
    }

    /// Enable or disable timing for whole queries.
    ///
    /// When enabled, an event recording `elapsed_us` is emitted at `DEBUG`
    /// level when the query completes, retries included.
    #[must_use]
    pub fn with_query_timing(mut self, enabled: bool) -> Self {
        self.query_timing = enabled;
        self
    }

    /// Set the tracing level for each `attempt` span.
    #[must_use]
    pub fn with_attempt_level(mut self, level: Level) -> Self {
        self.attempt_level = level;
        self
    }

    /// Enable or disable timing for individual attempts.
    #[must_use]
    pub fn with_attempt_timing(mut self, enabled: bool) -> Self {
        self.attempt_timing = enabled;
        self
    }

    /// Set the tracing level for all operations at once.
    #[must_use]
    pub fn with_all_levels(mut self, level: Level) -> Self {
        self.query_level = level;
        self.attempt_level = level;
        self
    }

    /// Enable or disable timing for all operations at once.
    #[must_use]
    pub fn with_all_timing(mut self, enabled: bool) -> Self {
        self.query_timing = enabled;
        self.attempt_timing = enabled;
        self
    }
}
