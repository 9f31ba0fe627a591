//! At-rest encryption of substituted field values.
//!
//! AES-256-GCM (authenticated: confidentiality + integrity). Each
//! encryption uses a fresh random 96-bit nonce, prepended to the
//! ciphertext; the whole blob is base64-encoded for storage as a single
//! string column. Decryption fails closed: truncated input, a wrong key,
//! or a flipped bit all reject rather than returning garbage.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::RngCore;

use crate::context::RenderContext;
use crate::error::{CoreError, CoreResult};

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;
/// AES-GCM nonce length in bytes.
const NONCE_LEN: usize = 12;

/// Cipher for sensitive substituted values.
///
/// Constructed once at startup from process-wide configuration and shared
/// read-only across requests. Tests inject a throwaway key via
/// [`SensitiveValueCipher::new`].
#[derive(Clone)]
pub struct SensitiveValueCipher {
    key: [u8; KEY_LEN],
}

impl std::fmt::Debug for SensitiveValueCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never leak key material through Debug output.
        f.debug_struct("SensitiveValueCipher").finish_non_exhaustive()
    }
}

impl SensitiveValueCipher {
    /// Build a cipher from raw key bytes.
    pub fn new(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// Build a cipher from a 64-character hex-encoded key, the storage
    /// format of the `ENCRYPTION_KEY` environment variable.
    pub fn from_hex(hex_key: &str) -> CoreResult<Self> {
        let bytes = hex::decode(hex_key)
            .map_err(|_| CoreError::Crypto("encryption key is not valid hex".into()))?;
        let key: [u8; KEY_LEN] = bytes.try_into().map_err(|_| {
            CoreError::Crypto(format!("encryption key must be {KEY_LEN} bytes"))
        })?;
        Ok(Self::new(key))
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key))
    }

    /// Encrypt a resolved context into an opaque string.
    ///
    /// Layout: `base64(nonce || ciphertext+tag)`.
    pub fn encrypt(&self, context: &RenderContext) -> CoreResult<String> {
        let plaintext = serde_json::to_vec(context)
            .map_err(|e| CoreError::Crypto(format!("context serialization failed: {e}")))?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher()
            .encrypt(nonce, plaintext.as_ref())
            .map_err(|_| CoreError::Crypto("encryption failed".into()))?;

        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(combined))
    }

    /// Decrypt an opaque string back into the context.
    ///
    /// Rejects on any authentication failure; never returns partially
    /// decrypted data.
    pub fn decrypt(&self, encrypted: &str) -> CoreResult<RenderContext> {
        let combined = BASE64
            .decode(encrypted)
            .map_err(|_| CoreError::Crypto("encrypted blob is not valid base64".into()))?;

        if combined.len() <= NONCE_LEN {
            return Err(CoreError::Crypto("encrypted blob is truncated".into()));
        }
        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher()
            .decrypt(nonce, ciphertext)
            .map_err(|_| CoreError::Crypto("decryption failed".into()))?;

        serde_json::from_slice(&plaintext)
            .map_err(|_| CoreError::Crypto("decrypted payload is not a valid context".into()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn test_cipher() -> SensitiveValueCipher {
        SensitiveValueCipher::new([7u8; KEY_LEN])
    }

    fn sample_context() -> RenderContext {
        let mut ctx = BTreeMap::new();
        ctx.insert("clientName".to_string(), "Jane Doe".to_string());
        ctx.insert("amount".to_string(), "$50,000".to_string());
        ctx.insert("empty".to_string(), String::new());
        ctx
    }

    #[test]
    fn round_trips_context() {
        let cipher = test_cipher();
        let ctx = sample_context();
        let blob = cipher.encrypt(&ctx).unwrap();
        assert_eq!(cipher.decrypt(&blob).unwrap(), ctx);
    }

    #[test]
    fn round_trips_empty_context() {
        let cipher = test_cipher();
        let ctx = RenderContext::new();
        let blob = cipher.encrypt(&ctx).unwrap();
        assert_eq!(cipher.decrypt(&blob).unwrap(), ctx);
    }

    #[test]
    fn fresh_nonce_per_encryption() {
        let cipher = test_cipher();
        let ctx = sample_context();
        let a = cipher.encrypt(&ctx).unwrap();
        let b = cipher.encrypt(&ctx).unwrap();
        assert_ne!(a, b, "identical plaintext must not produce identical blobs");
    }

    #[test]
    fn ciphertext_does_not_contain_plaintext() {
        let cipher = test_cipher();
        let blob = cipher.encrypt(&sample_context()).unwrap();
        assert!(!blob.contains("Jane"));
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let cipher = test_cipher();
        let blob = cipher.encrypt(&sample_context()).unwrap();
        let mut raw = BASE64.decode(&blob).unwrap();

        // Flip one bit in every byte position in turn; all must fail.
        for i in 0..raw.len() {
            raw[i] ^= 0x01;
            let tampered = BASE64.encode(&raw);
            assert!(
                cipher.decrypt(&tampered).is_err(),
                "bit flip at byte {i} was not detected"
            );
            raw[i] ^= 0x01;
        }
    }

    #[test]
    fn wrong_key_is_rejected() {
        let blob = test_cipher().encrypt(&sample_context()).unwrap();
        let other = SensitiveValueCipher::new([8u8; KEY_LEN]);
        assert!(other.decrypt(&blob).is_err());
    }

    #[test]
    fn truncated_blob_is_rejected() {
        let cipher = test_cipher();
        let blob = cipher.encrypt(&sample_context()).unwrap();
        let raw = BASE64.decode(&blob).unwrap();
        let truncated = BASE64.encode(&raw[..NONCE_LEN]);
        assert!(cipher.decrypt(&truncated).is_err());
        assert!(cipher.decrypt("").is_err());
        assert!(cipher.decrypt("not base64 !!!").is_err());
    }

    #[test]
    fn from_hex_accepts_64_char_keys_only() {
        assert!(SensitiveValueCipher::from_hex(&"ab".repeat(32)).is_ok());
        assert!(SensitiveValueCipher::from_hex("abcd").is_err());
        assert!(SensitiveValueCipher::from_hex("not-hex").is_err());
    }
}
