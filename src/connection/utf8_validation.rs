use utf8::DecodeError;

#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Utf8Error {
    #[error("invalid byte sequence after {valid_up_to} valid bytes")]
    Invalid { valid_up_to: usize },
    #[error("incomplete code point at the end")]
    Incomplete,
}

// A payload ending in the middle of a multi-byte sequence is rejected like any other invalid
// input, nothing is carried over to a following frame.
pub(super) fn validate_utf8(input: &[u8]) -> Result<(), Utf8Error> {
    match utf8::decode(input) {
        Ok(_) => Ok(()),
        Err(DecodeError::Invalid { valid_prefix, .. }) => Err(Utf8Error::Invalid {
            valid_up_to: valid_prefix.len(),
        }),
        Err(DecodeError::Incomplete { .. }) => Err(Utf8Error::Incomplete),
    }
}
