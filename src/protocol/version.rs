use derive_more::{Display, Into};

/// NTP protocol version carried in the `li_vn_mode` octet.
///
/// Control replies are accepted for any version between
/// [`ProtocolVersion::OLDEST`] and [`ProtocolVersion::NEWEST`]. Requests are
/// sent with [`ProtocolVersion::default`], which matches what long-lived
/// daemons expect from query tools.
///
/// # Examples
///
/// ```
/// use ntp_mode6::protocol::ProtocolVersion;
///
/// assert_eq!(ProtocolVersion::new(4), Some(ProtocolVersion::NEWEST));
/// assert!(ProtocolVersion::new(5).is_none());
/// assert_eq!(ProtocolVersion::default().get(), 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Into)]
#[display("{_0}")]
pub struct ProtocolVersion(u8);

impl ProtocolVersion {
    /// Oldest version whose replies are understood.
    pub const OLDEST: Self = Self(1);
    /// Newest version whose replies are understood.
    pub const NEWEST: Self = Self(4);

    /// Validate and wrap a raw version number.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if Self::is_supported(value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Return the raw version number.
    #[must_use]
    pub const fn get(self) -> u8 { self.0 }

    /// Report whether a raw version number lies in the supported range.
    #[must_use]
    pub const fn is_supported(value: u8) -> bool {
        value >= Self::OLDEST.0 && value <= Self::NEWEST.0
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self { Self(Self::OLDEST.0 + 1) }
}
