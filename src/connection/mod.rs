mod config;
mod utf8_validation;
mod validate;

pub use config::*;
pub use utf8_validation::Utf8Error;
pub use validate::*;

use crate::close_code::CloseCode;
use crate::frame::{FrameDecodeError, FrameDecoder, FrameEncoder, Opcode, WsFrame};
use crate::handshake::{accept_hash, render_upgrade_response, validate_key, HandshakeError};
use futures::prelude::*;
use http::Request;
use std::io;

/// Lifecycle of a server connection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WsState {
    Handshaking,
    Open,
    /// A close frame carrying this status code is about to be sent.
    Closing(u16),
    Closed,
}

/// Server side of a single WebSocket connection over an already upgraded stream.
///
/// Frames are handled strictly one at a time: data frames are echoed, pings answered with pongs
/// and the connection is closed with the appropriate status code on a close frame or on the first
/// protocol violation.
pub struct WsConnection<T: AsyncRead + AsyncWrite + Unpin> {
    transport: T,
    key: Vec<u8>,
    state: WsState,
    decoder: FrameDecoder,
    encoder: FrameEncoder,
    sent_close: Option<u16>,
}

impl<T: AsyncRead + AsyncWrite + Unpin> WsConnection<T> {
    pub fn new(transport: T, key: impl Into<Vec<u8>>) -> Self {
        Self::with_config(transport, key, WsConfig::server())
    }
    pub fn with_config(transport: T, key: impl Into<Vec<u8>>, config: WsConfig) -> Self {
        Self {
            transport,
            key: key.into(),
            state: WsState::Handshaking,
            decoder: FrameDecoder::new(config.max_payload_len),
            encoder: FrameEncoder::server(),
            sent_close: None,
        }
    }
    /// Takes the `Sec-WebSocket-Key` from the upgrade request the stream was hijacked from.
    pub fn from_request<B>(transport: T, request: &Request<B>) -> Result<Self, HandshakeError> {
        let key = request
            .headers()
            .get("Sec-WebSocket-Key")
            .ok_or(HandshakeError::MissingKey)?;
        Ok(Self::new(transport, key.as_bytes()))
    }
    pub fn state(&self) -> WsState {
        self.state
    }
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Sends the upgrade response. Does nothing once the handshake is done.
    pub async fn handshake(&mut self) -> Result<(), WsConnectionError> {
        match self.state {
            WsState::Handshaking => self.step().await.map(drop),
            _ => Ok(()),
        }
    }

    /// Drives the connection until it is closed.
    ///
    /// Returns the status code of the close frame that was sent, or `None` if the connection
    /// ended without one.
    pub async fn run(&mut self) -> Result<Option<u16>, WsConnectionError> {
        while self.state != WsState::Closed {
            self.step().await?;
        }
        Ok(self.sent_close)
    }

    /// Performs a single transition. Any error leaves the connection `Closed`, without a close
    /// frame.
    pub async fn step(&mut self) -> Result<WsState, WsConnectionError> {
        let result = match self.state {
            WsState::Handshaking => self.accept().await,
            WsState::Open => self.receive().await,
            WsState::Closing(code) => self.close(code).await,
            WsState::Closed => return Err(WsConnectionError::Closed),
        };
        match result {
            Ok(()) => Ok(self.state),
            Err(err) => {
                log::error!("connection failed: {}", err);
                self.state = WsState::Closed;
                Err(err)
            }
        }
    }

    async fn accept(&mut self) -> Result<(), WsConnectionError> {
        let accept = accept_hash(validate_key(&self.key)?);
        self.transport
            .write_all(&render_upgrade_response(&accept))
            .await?;
        self.transport.flush().await?;
        log::info!("handshake complete");
        self.state = WsState::Open;
        Ok(())
    }

    async fn receive(&mut self) -> Result<(), WsConnectionError> {
        let frame = match self.decoder.decode(&mut self.transport).await {
            Ok(frame) => frame,
            Err(FrameDecodeError::PayloadTooLarge(len)) => {
                log::warn!("{}: payload of {} bytes", CloseCode::Size, len);
                self.state = WsState::Closing(CloseCode::Size.code());
                return Ok(());
            }
            Err(FrameDecodeError::Io(err)) => return Err(err.into()),
        };
        log::debug!(
            "received {:?} frame, fin: {}, {} bytes",
            frame.opcode,
            frame.fin,
            frame.payload_len()
        );
        if let Err(violation) = validate(&frame) {
            let code = violation.close_code();
            log::warn!("{}: {}", code, violation);
            self.state = WsState::Closing(code.code());
            return Ok(());
        }
        match frame.opcode {
            Opcode::Close => {
                let code = frame.close_code().unwrap_or_else(|| CloseCode::Normal.code());
                log::info!("peer closed the connection with status {}", code);
                self.state = WsState::Closing(code);
            }
            Opcode::Ping => self.send(&frame.into_pong()).await?,
            Opcode::Continuation | Opcode::Text | Opcode::Binary => self.send(&frame).await?,
            Opcode::Pong | Opcode::Reserved(_) => log::debug!("dropping {:?} frame", frame.opcode),
        }
        Ok(())
    }

    async fn send(&mut self, frame: &WsFrame) -> io::Result<()> {
        self.encoder.encode(&mut self.transport, frame).await
    }

    async fn close(&mut self, code: u16) -> Result<(), WsConnectionError> {
        self.send(&WsFrame::close(code)).await?;
        self.sent_close = Some(code);
        self.state = WsState::Closed;
        match self.transport.close().await {
            Ok(()) => log::info!("connection closed with status {}", code),
            Err(err) => log::warn!("sent status {}, shutdown failed: {}", code, err),
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum WsConnectionError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("handshake failed: {0}")]
    Handshake(#[from] HandshakeError),
    #[error("connection is closed")]
    Closed,
}
