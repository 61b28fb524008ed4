/// colcrypt Crypto Library
///
/// Symmetric sealing of individual column values with AES-256-GCM.
/// One key protects every encrypted column; it is supplied through
/// configuration and never stored alongside the data.

pub mod encrypt;
pub mod error;
pub mod keys;

pub use encrypt::ColumnCipher;
pub use error::CodecError;
pub use keys::ColumnKey;
