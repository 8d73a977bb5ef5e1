use crate::protocol::Opcode;

/// Identity of one outstanding request.
///
/// A context is fixed for the life of an attempt. Replies are matched against
/// its opcode and sequence number; a retry that must not accept fragments of
/// the abandoned attempt gets a fresh context via [`RequestContext::next`].
///
/// # Examples
///
/// ```
/// use ntp_mode6::{protocol::Opcode, request::RequestContext};
///
/// let context = RequestContext::new(Opcode::READ_STATUS, 0, u16::MAX).authenticated(true);
/// let retry = context.next();
/// assert_eq!(retry.sequence(), 0);
/// assert!(retry.is_authenticated());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestContext {
    opcode: Opcode,
    association_id: u16,
    sequence: u16,
    authenticated: bool,
}

impl RequestContext {
    /// Create an unauthenticated request context.
    #[must_use]
    pub const fn new(opcode: Opcode, association_id: u16, sequence: u16) -> Self {
        Self {
            opcode,
            association_id,
            sequence,
            authenticated: false,
        }
    }

    /// Set whether the request is signed.
    #[must_use]
    pub const fn authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }

    /// Copy of this context with the sequence number advanced by one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            sequence: self.sequence.wrapping_add(1),
            ..self
        }
    }

    /// Operation code of the request.
    #[must_use]
    pub const fn opcode(&self) -> Opcode { self.opcode }

    /// Association the request addresses.
    #[must_use]
    pub const fn association_id(&self) -> u16 { self.association_id }

    /// Correlation sequence number.
    #[must_use]
    pub const fn sequence(&self) -> u16 { self.sequence }

    /// Report whether the request carries a MAC.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool { self.authenticated }
}
