//! Blind index computation for searchable encryption.
//!
//! A blind index is a deterministic salted digest of a value's canonical
//! bytes: `SHA-256(bytes ++ salt)`. Identical plaintext always yields the
//! identical digest, which is what makes equality lookup possible — and is
//! also the deliberate trade-off: searchable fields leak equality and
//! frequency information to anyone holding the column.
//!
//! The digest is one-way; no inverse operation exists or is exposed. Its
//! comparison is ordinary equality — the secrecy lives in the canonical
//! bytes being hashed under a shared salt, not in hiding the digest.

use sha2::{Digest, Sha256};

/// Digest width in bytes.
pub const BLIND_INDEX_SIZE: usize = 32;

/// Width of the digest's lowercase hex form as stored in the blob suffix.
pub const BLIND_INDEX_HEX_LEN: usize = 2 * BLIND_INDEX_SIZE;

/// Computes the blind index of canonical plaintext bytes under a salt.
///
/// Deterministic: the same `(canonical, salt)` pair always produces the
/// same digest.
#[must_use]
pub fn compute(canonical: &[u8], salt: &[u8]) -> [u8; BLIND_INDEX_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(canonical);
    hasher.update(salt);
    hasher.finalize().into()
}

/// Computes the blind index and returns its fixed-width lowercase hex form.
#[must_use]
pub fn compute_hex(canonical: &[u8], salt: &[u8]) -> String {
    hex::encode(compute(canonical, salt))
}

/// Compares two digests.
///
/// Not a secret-comparison boundary; plain equality is sufficient here.
#[must_use]
pub fn matches(a: &[u8], b: &[u8]) -> bool {
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let index1 = compute(b"alice@example.com", b"salt");
        let index2 = compute(b"alice@example.com", b"salt");

        assert_eq!(index1, index2);
        assert!(matches(&index1, &index2));
    }

    #[test]
    fn test_different_values_differ() {
        let index1 = compute(b"alice@example.com", b"salt");
        let index2 = compute(b"bob@example.com", b"salt");

        assert_ne!(index1, index2);
    }

    #[test]
    fn test_different_salts_differ() {
        let index1 = compute(b"alice@example.com", b"salt_1");
        let index2 = compute(b"alice@example.com", b"salt_2");

        assert_ne!(index1, index2);
    }

    #[test]
    fn test_known_vector_with_salt() {
        // SHA-256("100" ++ "test")
        assert_eq!(
            compute_hex(b"100", b"test"),
            "cae451dc70bdd2d6038709ec1290aaa72896ad6cbdf6fe37e903436effc608db"
        );
    }

    #[test]
    fn test_known_vector_empty_salt() {
        // SHA-256("100")
        assert_eq!(
            compute_hex(b"100", b""),
            "ad57366865126e55649ecb23ae1d48887544976efea46a48eb5d85a6eeb4d306"
        );
    }

    #[test]
    fn test_hex_width_is_fixed() {
        assert_eq!(compute_hex(b"", b"").len(), BLIND_INDEX_HEX_LEN);
        assert_eq!(compute_hex(&[7u8; 10_000], b"salt").len(), BLIND_INDEX_HEX_LEN);
    }

    #[test]
    fn test_salt_is_appended_not_prepended() {
        // compute("ab", "c") must equal SHA-256("abc"), not SHA-256("cab").
        let direct: [u8; BLIND_INDEX_SIZE] = Sha256::digest(b"abc").into();
        assert_eq!(compute(b"ab", b"c"), direct);
        assert_ne!(compute(b"c", b"ab"), direct);
    }
}
