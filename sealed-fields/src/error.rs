//! Error types for `sealed-fields` operations.

/// Main error type for `sealed-fields` operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required configuration is missing or invalid (fatal, surfaced at first use)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Encryption operation failed
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed outside the legacy-fallback path (e.g. file content)
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Canonical byte encoding or parsing failed
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// The predicate/kind combination has no defined translation
    #[error("lookup `{lookup}` is not supported for field kind `{kind}`")]
    LookupNotSupported {
        /// The field's value kind, as spelled by [`crate::codec::ValueKind`]
        kind: String,
        /// The lookup name as the caller spelled it
        lookup: String,
    },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds a [`Error::LookupNotSupported`] for the given kind and lookup name.
    ///
    /// Public so host adapters can reject lookup names this crate cannot
    /// express (range, substring, ordering) with the same error the
    /// translator produces, before any query reaches the backing store.
    #[must_use]
    pub fn lookup_not_supported(kind: impl Into<String>, lookup: impl Into<String>) -> Self {
        Self::LookupNotSupported { kind: kind.into(), lookup: lookup.into() }
    }
}

/// No key in the ring validates the token.
///
/// This is a dedicated type rather than an [`Error`] variant: the encrypted
/// value store pattern-matches on it to take the legacy-plaintext fallback,
/// so it must never be confused with a surfaced failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("ciphertext does not authenticate under any ring key")]
pub struct DecryptionFailed;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_not_supported_message() {
        let err = Error::lookup_not_supported("binary", "exact");
        assert_eq!(err.to_string(), "lookup `exact` is not supported for field kind `binary`");
    }

    #[test]
    fn test_decryption_failed_is_copy() {
        let err = DecryptionFailed;
        let copied = err;
        assert_eq!(err, copied);
    }
}
