//! Translation of predicates over searchable fields into conditions the
//! backing store can evaluate against stored blobs — without decryption.
//!
//! An equality predicate becomes a suffix match: the stored blob of a
//! searchable field ends with `$` plus the value's blind-index hex, and the
//! ciphertext prefix length varies per row, so "ends with the known
//! fixed-width suffix" is the whole translation. Membership becomes the OR
//! of per-value suffix matches. Null checks pass through untouched.
//!
//! Anything else — range, substring, ordering — has no defined translation
//! over an encrypted column. The [`Lookup`] enum makes those predicates
//! unrepresentable here; host adapters reject them by name via
//! [`Error::lookup_not_supported`] before any query is issued.

use crate::blind_index;
use crate::codec::{self, Value, ValueKind};
use crate::error::Error;
use crate::keyring::KeyRing;
use crate::store::{EncryptedField, SEPARATOR};

/// A predicate over one encrypted field, as handed over by the host ORM.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Plaintext equality.
    Exact(Value),
    /// Set membership (relational `IN`).
    In(Vec<Value>),
    /// Null / not-null check on the blob itself.
    IsNull(bool),
}

impl Lookup {
    /// Returns the lookup's name as used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Exact(_) => "exact",
            Self::In(_) => "in",
            Self::IsNull(_) => "isnull",
        }
    }
}

/// A backing-store-evaluable condition over the stored blob column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The column is (or is not) null.
    IsNull(bool),
    /// The blob ends with the given separator-plus-hex suffix.
    EndsWith(String),
    /// The blob ends with any of the given suffixes (logical OR).
    AnyEndsWith(Vec<String>),
}

impl Condition {
    /// Returns the condition's suffixes as SQL `LIKE` patterns
    /// (`%$<hex>`), one per OR branch. Empty for null checks.
    #[must_use]
    pub fn like_patterns(&self) -> Vec<String> {
        match self {
            Self::IsNull(_) => Vec::new(),
            Self::EndsWith(suffix) => vec![format!("%{suffix}")],
            Self::AnyEndsWith(suffixes) => {
                suffixes.iter().map(|s| format!("%{s}")).collect()
            }
        }
    }

    /// Evaluates the condition against one stored blob in memory.
    ///
    /// The production path hands [`Condition`] to the backing store; this
    /// evaluator exists for tests and in-process filtering.
    #[must_use]
    pub fn matches(&self, blob: Option<&[u8]>) -> bool {
        match self {
            Self::IsNull(want_null) => blob.is_none() == *want_null,
            Self::EndsWith(suffix) => {
                blob.is_some_and(|b| b.ends_with(suffix.as_bytes()))
            }
            Self::AnyEndsWith(suffixes) => blob
                .is_some_and(|b| suffixes.iter().any(|s| b.ends_with(s.as_bytes()))),
        }
    }
}

/// Translates a predicate on a field into a blob condition.
///
/// # Errors
///
/// Returns [`Error::LookupNotSupported`] when the field is binary kind
/// (under any predicate), when `Exact`/`In` target a field that is not
/// searchable (no blind-index suffix is stored to match against), or for
/// `In` against the JSON kind (no per-element hash semantics are defined
/// for document membership). The error is produced before anything reaches
/// the backing store.
pub fn translate(
    field: &EncryptedField,
    lookup: &Lookup,
    ring: &KeyRing,
) -> Result<Condition, Error> {
    let config = field.config();

    if config.kind() == ValueKind::Binary {
        return Err(Error::lookup_not_supported(config.kind().as_str(), lookup.name()));
    }

    match lookup {
        Lookup::IsNull(want_null) => Ok(Condition::IsNull(*want_null)),
        Lookup::Exact(value) => {
            require_searchable(field, lookup)?;
            Ok(Condition::EndsWith(index_suffix(field, value, ring)?))
        }
        Lookup::In(values) => {
            require_searchable(field, lookup)?;
            if config.kind() == ValueKind::Json {
                return Err(Error::lookup_not_supported(config.kind().as_str(), lookup.name()));
            }
            let suffixes = values
                .iter()
                .map(|v| index_suffix(field, v, ring))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Condition::AnyEndsWith(suffixes))
        }
    }
}

fn require_searchable(field: &EncryptedField, lookup: &Lookup) -> Result<(), Error> {
    if field.config().is_searchable() {
        Ok(())
    } else {
        Err(Error::lookup_not_supported(field.config().kind().as_str(), lookup.name()))
    }
}

/// Canonicalizes the predicate value and builds its stored-blob suffix.
fn index_suffix(field: &EncryptedField, value: &Value, ring: &KeyRing) -> Result<String, Error> {
    let config = field.config();
    let canonical = codec::encode(value, config.kind(), config.timezone_policy())?;
    let hex = blind_index::compute_hex(&canonical, ring.index_salt());
    Ok(format!("{}{hex}", char::from(SEPARATOR)))
}
