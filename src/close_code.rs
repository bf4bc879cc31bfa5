use strum::{Display, EnumIter, IntoEnumIterator};

/// The registered close codes this endpoint understands.
///
/// The display form is the symbolic violation name used in logs.
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum CloseCode {
    /// The purpose of the connection has been fulfilled.
    #[strum(to_string = "NormalError")]
    Normal = 1000,
    /// The endpoint is going away, e.g. a server shutting down.
    #[strum(to_string = "GoingAwayError")]
    Away = 1001,
    /// The peer broke the framing rules.
    #[strum(to_string = "ProtocolError")]
    Protocol = 1002,
    /// A type of data was received that cannot be accepted.
    #[strum(to_string = "UnknownType")]
    Unsupported = 1003,
    /// Message data did not match its type, e.g. non UTF-8 text.
    #[strum(to_string = "TypeError")]
    Invalid = 1007,
    #[strum(to_string = "PolicyError")]
    Policy = 1008,
    #[strum(to_string = "MessageTooLargeError")]
    Size = 1009,
    #[strum(to_string = "ExtensionError")]
    Extension = 1010,
    #[strum(to_string = "UnexpectedError")]
    Error = 1011,
}

impl CloseCode {
    pub fn code(self) -> u16 {
        self as u16
    }
    pub fn from_u16(code: u16) -> Option<Self> {
        Self::iter().find(|c| c.code() == code)
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> u16 {
        code.code()
    }
}

/// Codes below 3000 must be registered, 3000..=4999 are open for libraries and applications.
pub fn is_valid_close_code(code: u16) -> bool {
    match code {
        0..=2999 => CloseCode::from_u16(code).is_some(),
        3000..=4999 => true,
        _ => false,
    }
}
