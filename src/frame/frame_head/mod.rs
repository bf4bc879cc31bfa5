mod decode;

pub use decode::*;

use crate::frame::Opcode;

/// Wire header of a single frame, as it appears before the payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameHead {
    pub fin: bool,
    /// The three RSV bits, right-aligned (`0b000..=0b111`).
    pub rsv: u8,
    pub opcode: Opcode,
    pub mask: Option<[u8; 4]>,
    pub payload_len: u64,
}

impl FrameHead {
    /// Parses a frame head from the start of `buffer`. Returns `Incomplete(n)` until at least `n`
    /// bytes are available. Reserved bits and reserved opcodes are kept as they are, rejecting them
    /// is up to the validator.
    pub fn parse(buffer: &[u8]) -> Result<FrameHead, FrameHeadParseError> {
        if buffer.len() < 2 {
            return Err(FrameHeadParseError::Incomplete(2));
        }
        let (masked, extra_payload_len_bytes) = match buffer[1] {
            0..=125 => (false, 0usize),
            126 => (false, 2usize),
            127 => (false, 8usize),
            128..=253 => (true, 0usize),
            254 => (true, 2usize),
            255 => (true, 8usize),
        };
        let expected_buffer_len = 2 + extra_payload_len_bytes + (masked as usize) * 4;
        if buffer.len() < expected_buffer_len {
            return Err(FrameHeadParseError::Incomplete(expected_buffer_len));
        }
        let fin = buffer[0] & 0x80 == 0x80;
        let rsv = (buffer[0] >> 4) & 0x07;
        let opcode = Opcode::from_bits(buffer[0] & 0x0F);
        let mut payload_len = [0u8; 8];
        match extra_payload_len_bytes {
            0 => payload_len[7] = buffer[1] & 127,
            2 => payload_len[6..8].copy_from_slice(&buffer[2..4]),
            _ => payload_len.copy_from_slice(&buffer[2..10]),
        };
        let payload_len = u64::from_be_bytes(payload_len);
        let mask = match masked {
            true => {
                let mut mask = [0u8; 4];
                mask.copy_from_slice(
                    &buffer[2 + extra_payload_len_bytes..6 + extra_payload_len_bytes],
                );
                Some(mask)
            }
            false => None,
        };
        Ok(FrameHead {
            fin,
            rsv,
            opcode,
            mask,
            payload_len,
        })
    }
    /// Length of the encoded frame head in bytes ([2..14]).
    pub fn len_bytes(&self) -> usize {
        2 + Self::extra_payload_len_bytes(self.payload_len) + self.mask.is_some() as usize * 4
    }
    fn extra_payload_len_bytes(payload_len: u64) -> usize {
        match payload_len {
            0..=125 => 0,
            126..=65535 => 2,
            _ => 8,
        }
    }
    /// Writes the frame head to `buffer` using the shortest length encoding and returns the number
    /// of bytes written. Panics if `buffer` is too small. See [len_bytes()][`Self::len_bytes()`].
    pub fn encode(&self, buffer: &mut [u8]) -> usize {
        buffer[0] = self.fin as u8 * 0x80 | (self.rsv & 0x07) << 4 | self.opcode.bits();
        let extra = Self::extra_payload_len_bytes(self.payload_len);
        buffer[1] = match extra {
            0 => self.payload_len as u8,
            2 => 126u8,
            _ => 127u8,
        };
        match extra {
            2 => buffer[2..4].copy_from_slice(&(self.payload_len as u16).to_be_bytes()),
            8 => buffer[2..10].copy_from_slice(&self.payload_len.to_be_bytes()),
            _ => {}
        }
        if let Some(mask) = self.mask {
            buffer[2 + extra..6 + extra].copy_from_slice(&mask);
            buffer[1] |= 0x80;
        }
        self.len_bytes()
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FrameHeadParseError {
    #[error("incomplete, need at least {0} bytes")]
    Incomplete(usize),
}
