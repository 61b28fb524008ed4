use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit, OsRng, rand_core::RngCore},
};

use crate::error::{CodecError, CodecResult};
use crate::keys::ColumnKey;

const ENVELOPE_VERSION: u8 = 1;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const HEADER_LEN: usize = 1 + NONCE_LEN;

/// Seals and opens column values.
///
/// Envelope layout: `[version][nonce: 12][ciphertext + tag]`. Every call to
/// [`ColumnCipher::seal`] draws a fresh nonce, so equal plaintexts produce
/// different ciphertexts.
#[derive(Clone)]
pub struct ColumnCipher {
    cipher: Aes256Gcm,
}

impl ColumnCipher {
    pub fn new(key: &ColumnKey) -> Self {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        Self { cipher }
    }

    /// Encrypt a plaintext value into a self-contained envelope.
    pub fn seal(&self, plaintext: &str) -> CodecResult<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CodecError::Encrypt)?;

        let mut sealed = Vec::with_capacity(HEADER_LEN + ciphertext.len());
        sealed.push(ENVELOPE_VERSION);
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Decrypt an envelope produced by [`ColumnCipher::seal`].
    pub fn open(&self, sealed: &[u8]) -> CodecResult<String> {
        if sealed.len() < HEADER_LEN + TAG_LEN {
            return Err(CodecError::Truncated { len: sealed.len() });
        }
        if sealed[0] != ENVELOPE_VERSION {
            return Err(CodecError::UnsupportedVersion(sealed[0]));
        }

        let nonce = Nonce::from_slice(&sealed[1..HEADER_LEN]);
        let plaintext = self
            .cipher
            .decrypt(nonce, &sealed[HEADER_LEN..])
            .map_err(|_| CodecError::Authentication)?;

        String::from_utf8(plaintext).map_err(|_| CodecError::InvalidUtf8)
    }
}

impl std::fmt::Debug for ColumnCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnCipher").finish_non_exhaustive()
    }
}
