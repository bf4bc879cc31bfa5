use http::{HeaderValue, Method, Request};
use ring::digest::{Context, SHA1_FOR_LEGACY_USE_ONLY};

const ACCEPT_GUID: &[u8] = b"258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

pub fn is_upgrade_request<T>(request: &Request<T>) -> bool {
    request.method() == Method::GET
        && request
            .headers()
            .get("Connection")
            .iter()
            .flat_map(|v| v.as_bytes().split(|&c| c == b' ' || c == b','))
            .any(|h| h.eq_ignore_ascii_case(b"Upgrade"))
        && request
            .headers()
            .get("Upgrade")
            .filter(|v| v.as_bytes().eq_ignore_ascii_case(b"websocket"))
            .is_some()
        && request
            .headers()
            .get("Sec-WebSocket-Version")
            .map(HeaderValue::as_bytes)
            == Some(&b"13"[..])
        && request.headers().get("Sec-WebSocket-Key").is_some()
}

/// Checks that a `Sec-WebSocket-Key` is the base64 form of a 16 byte nonce.
pub fn validate_key(key: &[u8]) -> Result<&[u8], HandshakeError> {
    if key.is_empty() {
        return Err(HandshakeError::MissingKey);
    }
    match base64::decode(key) {
        Ok(nonce) if nonce.len() == 16 => Ok(key),
        _ => Err(HandshakeError::InvalidKey),
    }
}

/// Value of the `Sec-WebSocket-Accept` header for a given `Sec-WebSocket-Key`.
pub fn accept_hash(key: &[u8]) -> String {
    let mut ctx = Context::new(&SHA1_FOR_LEGACY_USE_ONLY);
    ctx.update(key);
    ctx.update(ACCEPT_GUID);
    base64::encode(ctx.finish())
}

/// Raw `101 Switching Protocols` response head, ready to be written to the stream.
pub fn render_upgrade_response(accept_hash: &str) -> Vec<u8> {
    format!(
        "HTTP/1.1 101 Switching Protocols\r\n\
         Upgrade: websocket\r\n\
         Connection: Upgrade\r\n\
         Sec-WebSocket-Accept: {}\r\n\
         \r\n",
        accept_hash
    )
    .into_bytes()
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum HandshakeError {
    #[error("missing Sec-WebSocket-Key header")]
    MissingKey,
    #[error("Sec-WebSocket-Key is not a base64 encoded 16 byte nonce")]
    InvalidKey,
}
