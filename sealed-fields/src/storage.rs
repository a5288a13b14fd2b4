//! Encrypted file content storage.
//!
//! A specialization of the pipeline for whole-file payloads: the entire
//! content is encrypted in one call before it reaches the backing storage,
//! and the entire stored stream is decrypted in one call on the way back.
//! No chunking and no streaming cipher — both paths materialize the full
//! content in memory, which bounds this design to files that fit
//! comfortably there.
//!
//! Path and naming logic stays with the wrapped [`Storage`] backend; the
//! decorator only transforms bytes.

use crate::error::Error;
use crate::keyring::KeyRing;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Whole-payload storage backend.
pub trait Storage {
    /// Reads the full content stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the payload cannot be read.
    fn open(&self, name: &str) -> Result<Vec<u8>, Error>;

    /// Writes the full content under `name`, replacing any previous payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the payload cannot be written.
    fn save(&self, name: &str, content: &[u8]) -> Result<(), Error>;
}

/// Filesystem-backed storage rooted at one directory.
pub struct FileSystemStorage {
    root: PathBuf,
}

impl FileSystemStorage {
    /// Creates the storage, creating the root directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the root cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }
}

impl Storage for FileSystemStorage {
    fn open(&self, name: &str) -> Result<Vec<u8>, Error> {
        Ok(fs::read(self.root.join(name))?)
    }

    fn save(&self, name: &str, content: &[u8]) -> Result<(), Error> {
        Ok(fs::write(self.root.join(name), content)?)
    }
}

/// Decorator that encrypts content on save and decrypts it on open.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use sealed_fields::keyring::KeyRing;
/// use sealed_fields::storage::{EncryptedStorage, FileSystemStorage, Storage};
///
/// # fn main() -> Result<(), sealed_fields::error::Error> {
/// let ring = Arc::new(KeyRing::new(vec![KeyRing::generate_key()])?);
/// let storage = EncryptedStorage::new(FileSystemStorage::new("./media")?, ring);
///
/// storage.save("report.pdf", b"file content")?;
/// assert_eq!(storage.open("report.pdf")?, b"file content");
/// # Ok(())
/// # }
/// ```
pub struct EncryptedStorage<S: Storage> {
    inner: S,
    ring: Arc<KeyRing>,
}

impl<S: Storage> EncryptedStorage<S> {
    /// Wraps a backend with the given key ring.
    pub fn new(inner: S, ring: Arc<KeyRing>) -> Self {
        Self { inner, ring }
    }
}

impl<S: Storage> Storage for EncryptedStorage<S> {
    /// Reads and decrypts the full stored stream.
    ///
    /// Unlike the value pipeline there is no legacy fallback for files: a
    /// payload that no ring key validates is an error.
    fn open(&self, name: &str) -> Result<Vec<u8>, Error> {
        let stored = self.inner.open(name)?;
        self.ring.decrypt(&stored).map_err(|_| {
            Error::Decryption(format!(
                "stored content of `{name}` does not authenticate under any ring key"
            ))
        })
    }

    fn save(&self, name: &str, content: &[u8]) -> Result<(), Error> {
        let sealed = self.ring.encrypt(content)?;
        self.inner.save(name, &sealed)
    }
}
