use aes_gcm::aead::OsRng;
use aes_gcm::aead::rand_core::RngCore;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::error::{CodecError, CodecResult};

/// 256-bit key shared by every encrypted column.
#[derive(Clone)]
pub struct ColumnKey([u8; 32]);

impl ColumnKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for ColumnKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ColumnKey(<redacted>)")
    }
}

/// Generate a random key for AES-256-GCM.
pub fn generate_column_key() -> ColumnKey {
    let mut key = [0u8; 32];
    OsRng.fill_bytes(&mut key);
    ColumnKey(key)
}

/// Encode a key to base64 for configuration files.
pub fn key_to_base64(key: &ColumnKey) -> String {
    BASE64.encode(key.0)
}

/// Decode a base64 key.
pub fn key_from_base64(encoded: &str) -> CodecResult<ColumnKey> {
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| CodecError::InvalidKey(e.to_string()))?;
    let key: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| CodecError::InvalidKey(format!("expected 32 bytes, got {}", b.len())))?;
    Ok(ColumnKey(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_roundtrip() {
        let key = generate_column_key();
        let decoded = key_from_base64(&key_to_base64(&key)).unwrap();
        assert_eq!(decoded.as_bytes(), key.as_bytes());
    }

    #[test]
    fn rejects_short_key() {
        let err = key_from_base64(&BASE64.encode([7u8; 16])).unwrap_err();
        assert!(matches!(err, CodecError::InvalidKey(_)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(key_from_base64("not base64 at all!").is_err());
    }

    #[test]
    fn debug_does_not_leak() {
        let key = ColumnKey::from_bytes([0xAB; 32]);
        assert_eq!(format!("{:?}", key), "ColumnKey(<redacted>)");
    }
}
