//! Error types for seal/open operations.

use thiserror::Error;

/// Result type alias for lockbox operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type covering every way a seal or open can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// An option lies outside its declared domain. Raised before any KDF
    /// work is started.
    #[error("invalid option: {0}")]
    Validation(String),

    /// Malformed binary box.
    #[error("malformed box: {0}")]
    Format(String),

    /// The box names an algorithm this crate does not implement.
    #[error("unknown pwhash algorithm id: {0}")]
    Algorithm(String),

    /// Authentication failure while opening a box. Tampering, truncation
    /// and a wrong password are deliberately indistinguishable.
    #[error("box corrupted")]
    Corrupted,

    /// The crypto backend itself failed (OS RNG unavailable, scrypt
    /// parameter rejection, worker task failure).
    #[error("crypto backend failure: {0}")]
    Backend(String),
}
