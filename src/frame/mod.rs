mod decode;
mod encode;
mod frame_head;
mod masking;

pub use decode::*;
pub use encode::*;
pub use frame_head::*;
pub use masking::*;

use std::convert::TryInto;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    Continuation,
    Text,
    Binary,
    Close,
    Ping,
    Pong,
    /// One of `0x3..=0x7` or `0xB..=0xF`.
    Reserved(u8),
}

impl Opcode {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x0F {
            0x0 => Opcode::Continuation,
            0x1 => Opcode::Text,
            0x2 => Opcode::Binary,
            0x8 => Opcode::Close,
            0x9 => Opcode::Ping,
            0xA => Opcode::Pong,
            n => Opcode::Reserved(n),
        }
    }
    pub fn bits(self) -> u8 {
        match self {
            Opcode::Continuation => 0x0,
            Opcode::Text => 0x1,
            Opcode::Binary => 0x2,
            Opcode::Close => 0x8,
            Opcode::Ping => 0x9,
            Opcode::Pong => 0xA,
            Opcode::Reserved(n) => n & 0x0F,
        }
    }
    /// The high opcode bit marks control frames, including the reserved ones.
    pub fn is_control(self) -> bool {
        self.bits() & 0x08 == 0x08
    }
    pub fn is_reserved(self) -> bool {
        matches!(self, Opcode::Reserved(_))
    }
}

/// A complete frame with its payload in memory.
///
/// Received payloads are already unmasked; `masked` records whether the sender masked them.
/// The declared payload length is always `payload.len()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WsFrame {
    pub fin: bool,
    pub rsv: u8,
    pub opcode: Opcode,
    pub masked: bool,
    pub payload: Vec<u8>,
}

impl WsFrame {
    /// A final, unmasked frame without reserved bits.
    pub fn new(opcode: Opcode, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            fin: true,
            rsv: 0,
            opcode,
            masked: false,
            payload: payload.into(),
        }
    }
    pub fn close(code: u16) -> Self {
        Self::new(Opcode::Close, code.to_be_bytes().to_vec())
    }
    pub fn payload_len(&self) -> u64 {
        self.payload.len() as u64
    }
    pub fn is_control(&self) -> bool {
        self.opcode.is_control()
    }
    pub fn has_reserved_opcode(&self) -> bool {
        self.opcode.is_reserved()
    }
    /// Status code carried by a close frame, if the payload is long enough to hold one.
    pub fn close_code(&self) -> Option<u16> {
        if self.opcode != Opcode::Close {
            return None;
        }
        let code: [u8; 2] = self.payload.get(0..2)?.try_into().ok()?;
        Some(u16::from_be_bytes(code))
    }
    pub fn close_reason(&self) -> Option<&[u8]> {
        match self.close_code() {
            Some(_) => Some(&self.payload[2..]),
            None => None,
        }
    }
    pub fn into_pong(self) -> Self {
        Self {
            opcode: Opcode::Pong,
            ..self
        }
    }
    /// Header for sending this frame. Reserved bits are never set on outgoing frames.
    pub fn head(&self, mask: Option<[u8; 4]>) -> FrameHead {
        FrameHead {
            fin: self.fin,
            rsv: 0,
            opcode: self.opcode,
            mask,
            payload_len: self.payload_len(),
        }
    }
    /// Server-side wire form: unmasked, shortest length encoding.
    pub fn encode_vec(&self) -> Vec<u8> {
        FrameEncoder::server().encode_vec(self)
    }
}
