//! Ciphertext token framing.
//!
//! A token is the self-describing unit persisted for an encrypted value. It
//! carries everything needed to decrypt it apart from the key ring itself:
//!
//! ```text
//! base64url( [version:1][nonce:12][ciphertext+tag] )
//! ```
//!
//! The base64 text form keeps the token inside a known alphabet
//! (`A-Z a-z 0-9 - _ =`), which is what makes the stored blob's `$`-separated
//! blind-index suffix unambiguous to strip.

use crate::error::Error;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;

/// Current token format version.
pub const TOKEN_VERSION: u8 = 1;

/// Nonce size for ChaCha20-Poly1305 (96 bits).
pub const NONCE_SIZE: usize = 12;

/// Poly1305 authentication tag size.
const TAG_SIZE: usize = 16;

/// Minimum raw token length: version byte, nonce, tag of an empty message.
const MIN_RAW_LEN: usize = 1 + NONCE_SIZE + TAG_SIZE;

/// A parsed ciphertext token: version-framed nonce plus AEAD output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    nonce: [u8; NONCE_SIZE],
    ciphertext: Vec<u8>,
}

impl Token {
    /// Creates a token from a fresh nonce and AEAD output (ciphertext + tag).
    #[must_use]
    pub fn new(nonce: [u8; NONCE_SIZE], ciphertext: Vec<u8>) -> Self {
        Self { nonce, ciphertext }
    }

    /// Returns the nonce.
    #[must_use]
    pub const fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    /// Returns the AEAD output (ciphertext + tag).
    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Serializes the token to its base64url text form.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut raw = Vec::with_capacity(1 + NONCE_SIZE + self.ciphertext.len());
        raw.push(TOKEN_VERSION);
        raw.extend_from_slice(&self.nonce);
        raw.extend_from_slice(&self.ciphertext);
        URL_SAFE.encode(raw).into_bytes()
    }

    /// Parses a token from its base64url text form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decryption`] if the text is not valid base64, the
    /// raw token is too short, or the version byte is unknown. Callers on
    /// the read path map any of these to "not decryptable under any known
    /// key"; the distinction only matters for diagnostics.
    pub fn decode(text: &[u8]) -> Result<Self, Error> {
        let raw = URL_SAFE
            .decode(text)
            .map_err(|e| Error::Decryption(format!("token is not valid base64: {e}")))?;

        if raw.len() < MIN_RAW_LEN {
            return Err(Error::Decryption(format!(
                "token too short: {} bytes (min: {MIN_RAW_LEN})",
                raw.len()
            )));
        }

        if raw[0] != TOKEN_VERSION {
            return Err(Error::Decryption(format!(
                "unsupported token version: {} (supported: {TOKEN_VERSION})",
                raw[0]
            )));
        }

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&raw[1..=NONCE_SIZE]);
        let ciphertext = raw[1 + NONCE_SIZE..].to_vec();

        Ok(Self { nonce, ciphertext })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let token = Token::new([7u8; NONCE_SIZE], vec![1, 2, 3, 4, 5]);
        let text = token.encode();
        let parsed = Token::decode(&text).expect("decode failed");

        assert_eq!(parsed, token);
    }

    #[test]
    fn test_token_text_is_base64_alphabet() {
        let token = Token::new([0xFF; NONCE_SIZE], vec![0xFE; 40]);
        let text = token.encode();

        assert!(text
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'=')));
    }

    #[test]
    fn test_token_rejects_invalid_base64() {
        let result = Token::decode(b"not base64!!");
        assert!(matches!(result, Err(Error::Decryption(_))));
    }

    #[test]
    fn test_token_rejects_truncated_input() {
        let token = Token::new([1u8; NONCE_SIZE], vec![9; 16]);
        let text = token.encode();
        let raw = URL_SAFE.decode(&text).unwrap();
        let truncated = URL_SAFE.encode(&raw[..MIN_RAW_LEN - 2]).into_bytes();

        let result = Token::decode(&truncated);
        assert!(matches!(result, Err(Error::Decryption(_))));
    }

    #[test]
    fn test_token_rejects_unknown_version() {
        let token = Token::new([1u8; NONCE_SIZE], vec![9; 16]);
        let text = token.encode();
        let mut raw = URL_SAFE.decode(&text).unwrap();
        raw[0] = 99;
        let reencoded = URL_SAFE.encode(&raw).into_bytes();

        let result = Token::decode(&reencoded);
        assert!(matches!(result, Err(Error::Decryption(_))));
    }

    #[test]
    fn test_token_empty_ciphertext_below_minimum() {
        // An AEAD output always carries at least the tag; shorter inputs are
        // structural garbage.
        let raw = [TOKEN_VERSION; 1 + NONCE_SIZE];
        let text = URL_SAFE.encode(raw).into_bytes();

        assert!(Token::decode(&text).is_err());
    }
}
