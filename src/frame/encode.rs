use crate::frame::{mask, WsFrame};
use futures_lite::prelude::*;
use rand::prelude::*;
use std::io;

/// Renders frames to wire bytes. Servers never mask, clients mask with a fresh key per frame.
#[derive(Clone, Debug)]
pub struct FrameEncoder<R: RngCore = StdRng> {
    pub mask_rng: Option<R>,
}

impl FrameEncoder<StdRng> {
    pub fn client() -> Self {
        Self {
            mask_rng: Some(StdRng::from_entropy()),
        }
    }
    pub fn server() -> Self {
        Self { mask_rng: None }
    }
}

impl Default for FrameEncoder<StdRng> {
    fn default() -> Self {
        Self::server()
    }
}

impl<R: RngCore> FrameEncoder<R> {
    pub fn with_mask_rng(rng: R) -> Self {
        Self {
            mask_rng: Some(rng),
        }
    }
    pub fn encode_vec(&mut self, frame: &WsFrame) -> Vec<u8> {
        let key = self
            .mask_rng
            .as_mut()
            .map(|rng| rng.next_u32().to_ne_bytes());
        let head = frame.head(key);
        let mut head_buf = [0u8; 14];
        let head_len = head.encode(&mut head_buf);
        let mut buffer = Vec::with_capacity(head_len + frame.payload.len());
        buffer.extend_from_slice(&head_buf[..head_len]);
        buffer.extend_from_slice(&frame.payload);
        if let Some(key) = key {
            mask(key, 0, &mut buffer[head_len..]);
        }
        buffer
    }
    /// Writes the whole frame and flushes, so a reply is on the wire before the next read.
    pub async fn encode<T: AsyncWrite + Unpin>(
        &mut self,
        transport: &mut T,
        frame: &WsFrame,
    ) -> io::Result<()> {
        let buffer = self.encode_vec(frame);
        transport.write_all(&buffer).await?;
        transport.flush().await
    }
}
