//! Record store error types.

/// Errors that can occur reading or writing segment records.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("store I/O error: {message}")]
    Io { message: String },

    /// The backing file exists but could not be decoded
    #[error("store file is corrupt: {message}")]
    Corrupt { message: String },

    /// A writer panicked while holding the lock
    #[error("store lock poisoned")]
    Poisoned,
}
