use std::fmt;

/// Error code reported by the server in the high byte of the status word
/// when a reply carries the error flag.
///
/// # Examples
///
/// ```
/// use ntp_mode6::protocol::ServerErrorCode;
///
/// assert_eq!(ServerErrorCode::from_status(0x0400), ServerErrorCode::BadAssociation);
/// assert_eq!(ServerErrorCode::from(42), ServerErrorCode::Unknown(42));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ServerErrorCode {
    /// The server declined to say what went wrong.
    Unspecified,
    /// The request was not authorised (usually missing or bad authentication).
    Permission,
    /// The request packet was malformed.
    BadFormat,
    /// The opcode is not supported by the server.
    BadOpcode,
    /// The association id is unknown to the server.
    BadAssociation,
    /// A requested variable is unknown to the server.
    UnknownVariable,
    /// A supplied variable value was rejected.
    BadValue,
    /// Access was refused by a restriction rule.
    Restricted,
    /// A code this crate does not recognise.
    Unknown(u8),
}

impl ServerErrorCode {
    /// Extract the error code from a reply's status word.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        let [code, _] = crate::byte_order::write_network_u16(status);
        Self::from(code)
    }

    /// Return the raw wire value.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Unspecified => 0,
            Self::Permission => 1,
            Self::BadFormat => 2,
            Self::BadOpcode => 3,
            Self::BadAssociation => 4,
            Self::UnknownVariable => 5,
            Self::BadValue => 6,
            Self::Restricted => 7,
            Self::Unknown(code) => code,
        }
    }
}

impl From<u8> for ServerErrorCode {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::Unspecified,
            1 => Self::Permission,
            2 => Self::BadFormat,
            3 => Self::BadOpcode,
            4 => Self::BadAssociation,
            5 => Self::UnknownVariable,
            6 => Self::BadValue,
            7 => Self::Restricted,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for ServerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified => f.write_str("server returned an unspecified error"),
            Self::Permission => f.write_str("server disallowed request (authentication?)"),
            Self::BadFormat => f.write_str("server reports a bad format request packet"),
            Self::BadOpcode => f.write_str("server reports a bad opcode in request"),
            Self::BadAssociation => f.write_str("association id unknown to server"),
            Self::UnknownVariable => f.write_str("a request variable unknown to the server"),
            Self::BadValue => f.write_str("server indicates a request variable was bad"),
            Self::Restricted => f.write_str("server refused the request by restriction"),
            Self::Unknown(code) => write!(f, "server returns unknown error code {code}"),
        }
    }
}
