//! Server side of the WebSocket protocol (RFC 6455) over an already upgraded byte stream.
//!
//! The host accepts the HTTP request and hijacks the connection, then hands the stream and the
//! client's `Sec-WebSocket-Key` to a [`WsConnection`](connection::WsConnection), which answers
//! the handshake, echoes data frames, answers pings and performs the close handshake.

pub mod close_code;
pub mod connection;
pub mod frame;
pub mod handshake;
