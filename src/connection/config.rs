use crate::frame::DEFAULT_MAX_PAYLOAD_LEN;

/// Per-connection settings.
#[derive(Copy, Clone, Debug)]
pub struct WsConfig {
    /// Largest payload accepted in a single frame. Bigger frames close the connection with 1009.
    pub max_payload_len: u64,
    _private: (),
}

impl WsConfig {
    pub fn server() -> Self {
        Self {
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
            _private: (),
        }
    }
}

impl Default for WsConfig {
    fn default() -> Self {
        Self::server()
    }
}
