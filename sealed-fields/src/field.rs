//! Per-field configuration surface.
//!
//! This is the contract consumed from the field-definition collaborator
//! (the host ORM): which kind the column holds, whether equality search is
//! wanted, and — for datetime fields — the timezone policy.

use crate::codec::{TimezonePolicy, ValueKind};
use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Configuration of one encrypted field.
///
/// # Example
///
/// ```
/// use sealed_fields::field::FieldConfig;
/// use sealed_fields::codec::ValueKind;
///
/// let config = FieldConfig::new(ValueKind::Integer).searchable();
/// assert!(config.is_searchable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    kind: ValueKind,
    searchable: bool,
    timezone_policy: TimezonePolicy,
}

impl FieldConfig {
    /// Creates a non-searchable field of the given kind with the default
    /// timezone policy.
    #[must_use]
    pub fn new(kind: ValueKind) -> Self {
        Self { kind, searchable: false, timezone_policy: TimezonePolicy::default() }
    }

    /// Marks the field searchable (a blind-index suffix is appended to
    /// every stored blob).
    #[must_use]
    pub const fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// Sets the timezone policy. Only meaningful for datetime fields.
    #[must_use]
    pub const fn with_timezone_policy(mut self, policy: TimezonePolicy) -> Self {
        self.timezone_policy = policy;
        self
    }

    /// Returns the value kind.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Returns whether the field is searchable.
    #[must_use]
    pub const fn is_searchable(&self) -> bool {
        self.searchable
    }

    /// Returns the timezone policy.
    #[must_use]
    pub const fn timezone_policy(&self) -> TimezonePolicy {
        self.timezone_policy
    }

    /// Checks structural invariants at field-definition time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for a searchable binary field:
    /// binary values have no canonical hashable string form, so no blind
    /// index is defined for them.
    pub fn validate(&self) -> Result<(), Error> {
        if self.kind == ValueKind::Binary && self.searchable {
            return Err(Error::Configuration(
                "binary fields cannot be searchable: no canonical hashable form is defined"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
