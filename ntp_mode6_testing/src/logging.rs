//! Serialised access to a process-wide [`logtest::Logger`].

use std::sync::{Mutex, MutexGuard, OnceLock};

use logtest::Logger;
use rstest::fixture;

/// Handle to the global logger with exclusive access.
///
/// The guard keeps tests from reading each other's records while they hold
/// it. Records emitted by tests that do not take the handle may still appear,
/// so assertions should search for their message rather than count records.
pub struct LoggerHandle {
    guard: MutexGuard<'static, Logger>,
}

impl LoggerHandle {
    /// Acquire the global [`Logger`] instance.
    ///
    /// A poisoned lock is recovered rather than propagated so one failing
    /// test does not cascade into every later log assertion.
    pub fn new() -> Self {
        static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

        let logger = LOGGER.get_or_init(|| Mutex::new(Logger::start()));
        let guard = logger
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        Self { guard }
    }

    /// Discard every captured record.
    pub fn clear(&mut self) { while self.guard.pop().is_some() {} }

    /// Drain every captured record and return the rendered messages.
    pub fn messages(&mut self) -> Vec<String> {
        std::iter::from_fn(|| self.guard.pop())
            .map(|record| record.args().to_string())
            .collect()
    }

    /// Drain the captured records and report whether any message contains
    /// `needle`.
    pub fn contains(&mut self, needle: &str) -> bool {
        self.messages().iter().any(|message| message.contains(needle))
    }
}

impl Default for LoggerHandle {
    fn default() -> Self { Self::new() }
}

impl std::ops::Deref for LoggerHandle {
    type Target = Logger;

    fn deref(&self) -> &Self::Target { &self.guard }
}

impl std::ops::DerefMut for LoggerHandle {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.guard }
}

#[allow(
    unused_braces,
    reason = "rustc false positive for single line rstest fixtures"
)]
#[fixture]
pub fn logger() -> LoggerHandle { LoggerHandle::new() }

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use ntp_mode6::{
        fragment::{CollectorLimits, FragmentCollector},
        protocol::Opcode,
        request::RequestContext,
    };
    use rstest::rstest;

    use super::{LoggerHandle, logger};

    fn log_ignored_packet() {
        let context = RequestContext::new(Opcode::READ_VARIABLES, 0, 1);
        let mut collector = FragmentCollector::new(context, CollectorLimits::default());
        let _ = collector.accept(Bytes::from_static(&[0x16, 0x82]));
    }

    #[rstest]
    fn clear_discards_captured_records(mut logger: LoggerHandle) {
        log_ignored_packet();
        logger.clear();
        assert!(logger.is_empty());

        log_ignored_packet();
        assert!(logger.contains("packet ignored"));
    }
}
