//! Key ring: the cipher provider for the value pipeline.
//!
//! The ring holds an ordered list of symmetric keys. The first key is the
//! *active* key and encrypts every new value; all keys are *candidate* keys
//! and are tried in order on decryption. Rotation therefore needs no data
//! migration: prepend a fresh key, keep the old ones until no row encrypted
//! under them remains.

use crate::error::{DecryptionFailed, Error};
use crate::token::{Token, NONCE_SIZE};
use chacha20poly1305::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    ChaCha20Poly1305, Nonce,
};
use secrecy::{ExposeSecret, SecretVec};
use std::sync::OnceLock;

/// Symmetric key size in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Environment variable holding the key list (required).
///
/// One or more URL-safe-base64 32-byte keys, comma-separated, the first
/// being the active encryption key.
pub const KEY_ENV: &str = "SEALED_FIELDS_KEY";

/// Environment variable holding the blind-index salt (optional).
pub const SALT_ENV: &str = "SEALED_FIELDS_HASH_SALT";

static GLOBAL_RING: OnceLock<Result<KeyRing, String>> = OnceLock::new();

/// Ordered ring of symmetric keys plus the process-wide blind-index salt.
///
/// Immutable once constructed; safe to share across threads.
///
/// # Example
///
/// ```
/// use sealed_fields::keyring::KeyRing;
///
/// let ring = KeyRing::new(vec![KeyRing::generate_key()]).unwrap();
/// let token = ring.encrypt(b"secret").unwrap();
/// assert_eq!(ring.decrypt(&token).unwrap(), b"secret");
/// ```
pub struct KeyRing {
    keys: Vec<SecretVec<u8>>,
    index_salt: Vec<u8>,
}

impl KeyRing {
    /// Creates a ring from raw key material, first key active.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the ring is empty or any key is
    /// not exactly [`KEY_SIZE`] bytes.
    pub fn new(keys: Vec<SecretVec<u8>>) -> Result<Self, Error> {
        if keys.is_empty() {
            return Err(Error::Configuration("key ring must hold at least one key".to_string()));
        }
        for (i, key) in keys.iter().enumerate() {
            let len = key.expose_secret().len();
            if len != KEY_SIZE {
                return Err(Error::Configuration(format!(
                    "key {i} has invalid length: {len} bytes (expected: {KEY_SIZE})"
                )));
            }
        }
        Ok(Self { keys, index_salt: Vec::new() })
    }

    /// Sets the blind-index salt. Defaults to empty.
    #[must_use]
    pub fn with_index_salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.index_salt = salt.into();
        self
    }

    /// Returns the configured blind-index salt.
    #[must_use]
    pub fn index_salt(&self) -> &[u8] {
        &self.index_salt
    }

    /// Returns the number of candidate keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false: an empty ring cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Generates a fresh random key suitable for this ring.
    #[must_use]
    pub fn generate_key() -> SecretVec<u8> {
        let mut key = vec![0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut key);
        SecretVec::new(key)
    }

    /// Builds the ring from [`KEY_ENV`] and [`SALT_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if [`KEY_ENV`] is unset or holds
    /// anything other than comma-separated URL-safe-base64 32-byte keys.
    pub fn from_env() -> Result<Self, Error> {
        let spec = std::env::var(KEY_ENV).map_err(|_| {
            Error::Configuration(format!("`{KEY_ENV}` is required when using sealed-fields"))
        })?;
        let salt = std::env::var(SALT_ENV).unwrap_or_default();
        Self::from_key_spec(&spec, salt.as_bytes())
    }

    /// Builds the ring from a comma-separated base64 key list and a salt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on an empty list or undecodable key.
    pub fn from_key_spec(spec: &str, salt: &[u8]) -> Result<Self, Error> {
        use base64::engine::general_purpose::URL_SAFE;
        use base64::Engine as _;

        let mut keys = Vec::new();
        for entry in spec.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let raw = URL_SAFE.decode(entry).map_err(|e| {
                Error::Configuration(format!("key {} is not valid base64: {e}", keys.len()))
            })?;
            keys.push(SecretVec::new(raw));
        }

        Ok(Self::new(keys)?.with_index_salt(salt))
    }

    /// Returns the process-wide ring, initializing it from the environment
    /// on first use.
    ///
    /// Initialization happens at most once; the result (including a
    /// configuration failure) is latched for the process lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the environment held no usable
    /// key material when the ring was first requested.
    pub fn global() -> Result<&'static Self, Error> {
        GLOBAL_RING
            .get_or_init(|| {
                let ring = Self::from_env().map_err(|e| match e {
                    Error::Configuration(msg) => msg,
                    other => other.to_string(),
                })?;
                tracing::debug!(keys = ring.len(), "key ring initialized from environment");
                Ok(ring)
            })
            .as_ref()
            .map_err(|msg| Error::Configuration(msg.clone()))
    }

    /// Encrypts plaintext under the active key.
    ///
    /// Returns the token in its text form. A fresh random nonce is drawn
    /// per call, so equal plaintexts never produce equal tokens.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encryption`] if the AEAD operation fails.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);

        let cipher = ChaCha20Poly1305::new_from_slice(self.keys[0].expose_secret())
            .map_err(|e| Error::Encryption(format!("invalid active key: {e}")))?;

        let ciphertext = cipher
            .encrypt(&Nonce::from(nonce_bytes), plaintext)
            .map_err(|e| Error::Encryption(format!("ChaCha20-Poly1305 encryption failed: {e}")))?;

        Ok(Token::new(nonce_bytes, ciphertext).encode())
    }

    /// Decrypts a token by trying each candidate key in ring order.
    ///
    /// # Errors
    ///
    /// Returns [`DecryptionFailed`] if the text is not a well-formed token
    /// or no key validates its authentication tag. Callers must treat this
    /// as "not decryptable under any known key" — the encrypted value store
    /// interprets it as legacy plaintext, not as a hard error.
    pub fn decrypt(&self, token_text: &[u8]) -> Result<Vec<u8>, DecryptionFailed> {
        let token = Token::decode(token_text).map_err(|_| DecryptionFailed)?;
        let nonce = Nonce::from(*token.nonce());

        for key in &self.keys {
            let cipher = ChaCha20Poly1305::new_from_slice(key.expose_secret())
                .map_err(|_| DecryptionFailed)?;
            if let Ok(plaintext) = cipher.decrypt(&nonce, token.ciphertext()) {
                return Ok(plaintext);
            }
        }

        Err(DecryptionFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE;
    use base64::Engine as _;

    fn test_ring() -> KeyRing {
        KeyRing::new(vec![SecretVec::new(vec![42u8; KEY_SIZE])]).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let ring = test_ring();
        let token = ring.encrypt(b"alice@example.com").expect("encryption failed");
        let plaintext = ring.decrypt(&token).expect("decryption failed");

        assert_eq!(plaintext, b"alice@example.com");
    }

    #[test]
    fn test_ciphertext_is_non_deterministic() {
        let ring = test_ring();
        let token1 = ring.encrypt(b"same plaintext").unwrap();
        let token2 = ring.encrypt(b"same plaintext").unwrap();

        assert_ne!(token1, token2);
    }

    #[test]
    fn test_empty_ring_rejected() {
        let result = KeyRing::new(Vec::new());
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_wrong_key_size_rejected() {
        let result = KeyRing::new(vec![SecretVec::new(vec![1u8; 16])]);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_rotation_old_token_still_decrypts() {
        let old_key = vec![1u8; KEY_SIZE];
        let old_ring = KeyRing::new(vec![SecretVec::new(old_key.clone())]).unwrap();
        let token = old_ring.encrypt(b"rotated").unwrap();

        // New ring: fresh active key first, old key kept as candidate.
        let rotated = KeyRing::new(vec![
            SecretVec::new(vec![2u8; KEY_SIZE]),
            SecretVec::new(old_key),
        ])
        .unwrap();

        assert_eq!(rotated.decrypt(&token).unwrap(), b"rotated");
    }

    #[test]
    fn test_new_tokens_encrypt_under_active_key() {
        let active = vec![2u8; KEY_SIZE];
        let rotated = KeyRing::new(vec![
            SecretVec::new(active.clone()),
            SecretVec::new(vec![1u8; KEY_SIZE]),
        ])
        .unwrap();

        let token = rotated.encrypt(b"fresh").unwrap();

        // A ring holding only the active key must be able to decrypt it.
        let active_only = KeyRing::new(vec![SecretVec::new(active)]).unwrap();
        assert_eq!(active_only.decrypt(&token).unwrap(), b"fresh");
    }

    #[test]
    fn test_unknown_key_fails() {
        let ring = test_ring();
        let token = ring.encrypt(b"secret").unwrap();

        let other = KeyRing::new(vec![SecretVec::new(vec![9u8; KEY_SIZE])]).unwrap();
        assert_eq!(other.decrypt(&token), Err(DecryptionFailed));
    }

    #[test]
    fn test_garbage_input_fails() {
        let ring = test_ring();
        assert_eq!(ring.decrypt(b"legacy plaintext"), Err(DecryptionFailed));
        assert_eq!(ring.decrypt(b""), Err(DecryptionFailed));
    }

    #[test]
    fn test_corrupted_token_fails() {
        let ring = test_ring();
        let mut token = ring.encrypt(b"secret").unwrap();
        let len = token.len();
        token[len - 5] = if token[len - 5] == b'A' { b'B' } else { b'A' };

        assert_eq!(ring.decrypt(&token), Err(DecryptionFailed));
    }

    #[test]
    fn test_from_key_spec() {
        let key1 = URL_SAFE.encode([1u8; KEY_SIZE]);
        let key2 = URL_SAFE.encode([2u8; KEY_SIZE]);
        let ring = KeyRing::from_key_spec(&format!("{key1},{key2}"), b"pepper").unwrap();

        assert_eq!(ring.len(), 2);
        assert_eq!(ring.index_salt(), b"pepper");

        // First key is the active one.
        let token = ring.encrypt(b"x").unwrap();
        let first_only = KeyRing::from_key_spec(&key1, b"").unwrap();
        assert_eq!(first_only.decrypt(&token).unwrap(), b"x");
    }

    #[test]
    fn test_from_key_spec_rejects_garbage() {
        assert!(matches!(
            KeyRing::from_key_spec("!!not-base64!!", b""),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(KeyRing::from_key_spec("", b""), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_generate_key_size_and_uniqueness() {
        let key1 = KeyRing::generate_key();
        let key2 = KeyRing::generate_key();

        assert_eq!(key1.expose_secret().len(), KEY_SIZE);
        assert_ne!(key1.expose_secret(), key2.expose_secret());
    }
}
