//! Bounds applied while collecting one response.

use crate::protocol::{MAX_FRAGMENTS, RESPONSE_CAPACITY};

/// Hard limits on fragment collection.
///
/// # Default Values
/// - `max_fragments`: [`MAX_FRAGMENTS`] (32)
/// - `response_capacity`: [`RESPONSE_CAPACITY`] (15 360 bytes)
///
/// # Invariants
/// - at most `max_fragments - 1` fragments are held at once
/// - no fragment may reach past `response_capacity`
/// - at most `2 * max_fragments` packets are examined per attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollectorLimits {
    /// Protocol fragment limit; the set holds one fewer than this.
    pub max_fragments: usize,
    /// Size of the response buffer.
    pub response_capacity: usize,
}

impl Default for CollectorLimits {
    fn default() -> Self {
        Self {
            max_fragments: MAX_FRAGMENTS,
            response_capacity: RESPONSE_CAPACITY,
        }
    }
}

impl CollectorLimits {
    /// Clamp the limits so every attempt can hold at least one fragment.
    ///
    /// # Examples
    ///
    /// ```
    /// use ntp_mode6::fragment::CollectorLimits;
    ///
    /// let limits = CollectorLimits {
    ///     max_fragments: 0,
    ///     response_capacity: 64,
    /// }
    /// .normalized();
    /// assert_eq!(limits.max_fragments, 2);
    /// assert_eq!(limits.fragment_capacity(), 1);
    /// ```
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.max_fragments = self.max_fragments.max(2);
        self
    }

    /// Number of fragments the set may hold.
    #[must_use]
    pub const fn fragment_capacity(&self) -> usize { self.max_fragments.saturating_sub(1) }

    /// Number of packets examined before an attempt is abandoned.
    #[must_use]
    pub const fn packet_budget(&self) -> usize { self.max_fragments.saturating_mul(2) }
}
