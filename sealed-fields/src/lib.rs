//! # `sealed-fields`
//!
//! Transparent at-rest encryption for individual structured values in a
//! relational backing store, with equality and set-membership queries over
//! the encrypted values via blind indexes.
//!
//! ## Features
//!
//! - AEAD encryption (ChaCha20-Poly1305) with non-deterministic tokens
//! - Multi-key ring for zero-downtime key rotation
//! - Canonical byte encoding per value kind (booleans, integers, decimals,
//!   text, dates, datetimes, binary, JSON documents)
//! - Salted SHA-256 blind indexes for equality and membership queries
//! - Silent read fallback for legacy unencrypted rows
//! - Whole-file encrypting storage decorator
//!
//! ## Example
//!
//! ```rust,ignore
//! use sealed_fields::prelude::*;
//!
//! let ring = KeyRing::global()?;
//! let email = EncryptedField::new(FieldConfig::new(ValueKind::Text).searchable())?;
//!
//! let blob = email.store(ring, Some(&Value::Text("alice@example.com".into())))?;
//! let value = email.load(ring, blob.as_deref())?;
//!
//! let condition = translate(&email, &Lookup::Exact("alice@example.com".into()), ring)?;
//! ```

#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod blind_index;
pub mod codec;
pub mod error;
pub mod field;
pub mod keyring;
pub mod lookups;
pub mod storage;
pub mod store;
pub mod token;

pub mod prelude {
    //! Convenience re-exports for common use.
    pub use crate::codec::{TimezonePolicy, Value, ValueKind};
    pub use crate::error::{DecryptionFailed, Error};
    pub use crate::field::FieldConfig;
    pub use crate::keyring::KeyRing;
    pub use crate::lookups::{translate, Condition, Lookup};
    pub use crate::storage::{EncryptedStorage, FileSystemStorage, Storage};
    pub use crate::store::EncryptedField;
}
