//! The encrypted value store: encode → encrypt → index → blob, and back.
//!
//! Write path: canonicalize the value, encrypt the canonical bytes under
//! the ring's active key, and — for searchable fields — append the
//! `$`-separated blind-index suffix.
//!
//! Read path: strip the suffix when present, try to decrypt, and fall back
//! to parsing the bytes as legacy plaintext when no ring key validates
//! them. The fallback is deliberate backward compatibility with rows
//! written before encryption was enabled, not error suppression; it is
//! silent by contract. A corrupted token is indistinguishable from legacy
//! plaintext at this layer and will be read the same way.

use crate::blind_index::{self, BLIND_INDEX_HEX_LEN};
use crate::codec::{self, Value};
use crate::error::{DecryptionFailed, Error};
use crate::field::FieldConfig;
use crate::keyring::KeyRing;
use zeroize::Zeroizing;

/// Separator between the ciphertext token and the blind-index suffix.
///
/// `$` is outside both the token's base64url alphabet and the suffix's hex
/// alphabet, so the fixed-width strip cannot misfire on an encrypted blob.
pub const SEPARATOR: u8 = b'$';

/// One encrypted field, validated at definition time.
///
/// # Example
///
/// ```
/// use sealed_fields::codec::{Value, ValueKind};
/// use sealed_fields::field::FieldConfig;
/// use sealed_fields::keyring::KeyRing;
/// use sealed_fields::store::EncryptedField;
///
/// let ring = KeyRing::new(vec![KeyRing::generate_key()]).unwrap();
/// let field = EncryptedField::new(FieldConfig::new(ValueKind::Text)).unwrap();
///
/// let blob = field.store(&ring, Some(&Value::Text("hello".into()))).unwrap().unwrap();
/// let value = field.load(&ring, Some(&blob)).unwrap();
/// assert_eq!(value, Some(Value::Text("hello".into())));
/// ```
#[derive(Debug, Clone)]
pub struct EncryptedField {
    config: FieldConfig,
}

impl EncryptedField {
    /// Creates the field, checking structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for a searchable binary field.
    pub fn new(config: FieldConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the field configuration.
    #[must_use]
    pub const fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Runs the write pipeline, producing the blob to persist.
    ///
    /// `None` maps to `None` before the pipeline runs: absence of a value
    /// is stored as the backing store's native null and is never encrypted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the value cannot be canonicalized for
    /// the field's kind, or [`Error::Encryption`] if the cipher fails.
    pub fn store(&self, ring: &KeyRing, value: Option<&Value>) -> Result<Option<Vec<u8>>, Error> {
        let Some(value) = value else {
            return Ok(None);
        };

        let canonical = Zeroizing::new(codec::encode(
            value,
            self.config.kind(),
            self.config.timezone_policy(),
        )?);
        let mut blob = ring.encrypt(&canonical)?;

        if self.config.is_searchable() {
            blob.push(SEPARATOR);
            blob.extend_from_slice(
                blind_index::compute_hex(&canonical, ring.index_salt()).as_bytes(),
            );
        }

        Ok(Some(blob))
    }

    /// Runs the read pipeline, recovering the typed value from a blob.
    ///
    /// A backing-store null comes back as `None` without touching the
    /// ring. A blob that no ring key can decrypt is parsed directly as
    /// canonical plaintext of the declared kind — the legacy fallback.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the recovered bytes are not a
    /// canonical encoding of the field's kind. Decryption failure itself is
    /// never surfaced.
    pub fn load(&self, ring: &KeyRing, blob: Option<&[u8]>) -> Result<Option<Value>, Error> {
        let Some(blob) = blob else {
            return Ok(None);
        };

        let body = if self.config.is_searchable() { strip_index_suffix(blob) } else { blob };

        match ring.decrypt(body) {
            Ok(plaintext) => {
                let plaintext = Zeroizing::new(plaintext);
                codec::decode(&plaintext, self.config.kind(), self.config.timezone_policy())
                    .map(Some)
            }
            Err(DecryptionFailed) => {
                tracing::debug!(
                    kind = %self.config.kind(),
                    "blob does not authenticate under any ring key, reading as legacy plaintext"
                );
                codec::decode(body, self.config.kind(), self.config.timezone_policy()).map(Some)
            }
        }
    }
}

/// Strips the fixed-width blind-index suffix when one is present.
///
/// Legacy rows were written without a suffix; a blob only loses its last
/// `1 + BLIND_INDEX_HEX_LEN` bytes when they actually have the
/// separator-plus-hex shape.
fn strip_index_suffix(blob: &[u8]) -> &[u8] {
    let Some(cut) = blob.len().checked_sub(1 + BLIND_INDEX_HEX_LEN) else {
        return blob;
    };
    let (head, tail) = blob.split_at(cut);
    if tail[0] == SEPARATOR && tail[1..].iter().all(u8::is_ascii_hexdigit) {
        head
    } else {
        blob
    }
}
