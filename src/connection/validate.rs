use crate::close_code::{is_valid_close_code, CloseCode};
use crate::connection::utf8_validation::{validate_utf8, Utf8Error};
use crate::frame::{Opcode, WsFrame};

/// A protocol rule broken by a received frame.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    #[error("protocol error: unmasked client frame")]
    UnmaskedFrame,
    #[error("protocol error: control frames must not be fragmented and carry at most 125 bytes (opcode {opcode:?}, {payload_len} bytes, fin: {fin})")]
    ControlFrameShape {
        opcode: Opcode,
        payload_len: u64,
        fin: bool,
    },
    #[error("protocol error: opcode {0:#x} is reserved")]
    ReservedOpcode(u8),
    #[error("protocol error: RSV bits {0:#05b} are reserved")]
    ReservedBits(u8),
    #[error("invalid text message: {0}")]
    InvalidText(Utf8Error),
    #[error("protocol error: close code {0} is not allowed")]
    InvalidCloseCode(u16),
    #[error("protocol error: close payload too short to carry a close code")]
    TruncatedCloseCode,
    #[error("invalid close reason: {0}")]
    InvalidCloseReason(Utf8Error),
}

impl Violation {
    /// Status code sent in the close frame that answers this violation.
    pub fn close_code(&self) -> CloseCode {
        match self {
            Violation::InvalidText(_) | Violation::InvalidCloseReason(_) => CloseCode::Invalid,
            Violation::UnmaskedFrame
            | Violation::ControlFrameShape { .. }
            | Violation::ReservedOpcode(_)
            | Violation::ReservedBits(_)
            | Violation::InvalidCloseCode(_)
            | Violation::TruncatedCloseCode => CloseCode::Protocol,
        }
    }
}

/// Checks a frame received by a server. The first broken rule is reported.
///
/// Text payloads are only checked on final frames; fragments of a larger message are passed
/// through as they are.
pub fn validate(frame: &WsFrame) -> Result<(), Violation> {
    if !frame.masked {
        return Err(Violation::UnmaskedFrame);
    }
    if frame.is_control() && (frame.payload_len() > 125 || !frame.fin) {
        return Err(Violation::ControlFrameShape {
            opcode: frame.opcode,
            payload_len: frame.payload_len(),
            fin: frame.fin,
        });
    }
    if let Opcode::Reserved(bits) = frame.opcode {
        return Err(Violation::ReservedOpcode(bits));
    }
    if frame.rsv != 0 {
        return Err(Violation::ReservedBits(frame.rsv));
    }
    match frame.opcode {
        Opcode::Text if frame.fin => {
            validate_utf8(&frame.payload).map_err(Violation::InvalidText)?;
        }
        Opcode::Close => validate_close_payload(&frame.payload)?,
        _ => {}
    }
    Ok(())
}

fn validate_close_payload(payload: &[u8]) -> Result<(), Violation> {
    match payload.len() {
        0 => Ok(()),
        1 => Err(Violation::TruncatedCloseCode),
        _ => {
            let code = u16::from_be_bytes([payload[0], payload[1]]);
            if !is_valid_close_code(code) {
                return Err(Violation::InvalidCloseCode(code));
            }
            validate_utf8(&payload[2..]).map_err(Violation::InvalidCloseReason)
        }
    }
}
