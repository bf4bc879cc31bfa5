use crate::frame::{mask, FrameHeadDecodeState, WsFrame};
use futures::prelude::*;
use std::convert::TryFrom;
use std::io;

/// Payload limit of a default decoder and of [`WsConfig::server`](crate::connection::WsConfig::server).
pub const DEFAULT_MAX_PAYLOAD_LEN: u64 = 16 << 20;

/// Reads whole frames from a transport.
#[derive(Copy, Clone, Debug)]
pub struct FrameDecoder {
    pub max_payload_len: u64,
}

impl FrameDecoder {
    pub fn new(max_payload_len: u64) -> Self {
        Self { max_payload_len }
    }

    /// Reads one frame, unmasking the payload if the sender masked it.
    ///
    /// Either a complete frame is returned or an error, a partially read frame is never handed
    /// out. A declared length above `max_payload_len` fails before any payload byte is consumed.
    pub async fn decode<T: AsyncRead + Unpin>(
        &self,
        transport: &mut T,
    ) -> Result<WsFrame, FrameDecodeError> {
        let (_, head) = FrameHeadDecodeState::new().restore(&mut *transport).await?;
        if head.payload_len > self.max_payload_len {
            return Err(FrameDecodeError::PayloadTooLarge(head.payload_len));
        }
        let payload_len = usize::try_from(head.payload_len)
            .map_err(|_| FrameDecodeError::PayloadTooLarge(head.payload_len))?;
        let mut payload = vec![0u8; payload_len];
        transport.read_exact(&mut payload).await?;
        if let Some(key) = head.mask {
            mask(key, 0, &mut payload);
        }
        Ok(WsFrame {
            fin: head.fin,
            rsv: head.rsv,
            opcode: head.opcode,
            masked: head.mask.is_some(),
            payload,
        })
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAYLOAD_LEN)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FrameDecodeError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("payload of {0} bytes exceeds the accepted maximum")]
    PayloadTooLarge(u64),
}
