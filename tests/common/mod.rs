#![allow(dead_code)]

use echo_ws::frame::{FrameDecoder, FrameEncoder, WsFrame};
use futures::executor::block_on;
use futures::io::Cursor;
use futures::prelude::*;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

pub const KEY: &str = "dGhlIHNhbXBsZSBub25jZQ==";
pub const ACCEPT: &str = "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=";

/// In-memory stream: reads come from a fixed script, writes are recorded.
pub struct MockTransport {
    input: Vec<u8>,
    read_pos: usize,
    read_chunk: usize,
    pub output: Vec<u8>,
    pub closed: bool,
    pub fail_writes: bool,
    pub fail_close: bool,
}

impl MockTransport {
    pub fn new(input: Vec<u8>) -> Self {
        Self::chunked(input, usize::MAX)
    }
    // Every read returns at most `read_chunk` bytes.
    pub fn chunked(input: Vec<u8>, read_chunk: usize) -> Self {
        Self {
            input,
            read_pos: 0,
            read_chunk,
            output: Vec::new(),
            closed: false,
            fail_writes: false,
            fail_close: false,
        }
    }
    pub fn unread(&self) -> usize {
        self.input.len() - self.read_pos
    }
}

impl AsyncRead for MockTransport {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let remaining = &this.input[this.read_pos..];
        let n = remaining.len().min(buf.len()).min(this.read_chunk);
        buf[..n].copy_from_slice(&remaining[..n]);
        this.read_pos += n;
        Poll::Ready(Ok(n))
    }
}

impl AsyncWrite for MockTransport {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        if this.fail_writes || this.closed {
            return Poll::Ready(Err(io::ErrorKind::BrokenPipe.into()));
        }
        this.output.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if this.fail_close {
            return Poll::Ready(Err(io::ErrorKind::NotConnected.into()));
        }
        this.closed = true;
        Poll::Ready(Ok(()))
    }
}

/// Masked client-side wire form of `frames`.
pub fn client_bytes(frames: &[WsFrame]) -> Vec<u8> {
    let mut encoder = FrameEncoder::client();
    frames.iter().flat_map(|f| encoder.encode_vec(f)).collect()
}

/// Splits server output into the handshake response head and the frames that follow it.
pub fn split_response(output: &[u8]) -> (String, Vec<WsFrame>) {
    let end = output
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("no response head")
        + 4;
    let head = String::from_utf8(output[..end].to_vec()).unwrap();
    (head, read_frames(&output[end..]))
}

pub fn read_frames(bytes: &[u8]) -> Vec<WsFrame> {
    let mut cursor = Cursor::new(bytes.to_vec());
    let decoder = FrameDecoder::default();
    let mut frames = Vec::new();
    while (cursor.position() as usize) < bytes.len() {
        frames.push(block_on(decoder.decode(&mut cursor)).unwrap());
    }
    frames
}
