use thiserror::Error;

pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while sealing or opening a column value.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The stored value is shorter than the envelope header.
    #[error("sealed value truncated: {len} bytes")]
    Truncated { len: usize },

    #[error("unsupported envelope version {0}")]
    UnsupportedVersion(u8),

    /// Wrong key or tampered ciphertext.
    #[error("decryption failed: authentication tag mismatch")]
    Authentication,

    #[error("decrypted value is not valid UTF-8")]
    InvalidUtf8,

    #[error("encryption failed")]
    Encrypt,

    #[error("invalid column key: {0}")]
    InvalidKey(String),
}
