//! Password-based authenticated encryption.
//!
//! A password is stretched into a key and nonce with scrypt, the message is
//! sealed with NaCl's secretbox (XSalsa20-Poly1305), and the result is
//! packed into a fixed binary layout together with the salt and the cost
//! budgets used, so any compatible implementation can open it.
//!
//! [`Lockbox::seal`] and [`Lockbox::open`] are async: the KDF is CPU- and
//! memory-hard by design and runs on a blocking worker thread, and every
//! outcome, including validation errors, is delivered through the returned
//! future rather than synchronously within the initiating call.
//!
//! ```no_run
//! # async fn demo() -> lockbox::Result<()> {
//! let pwbox = lockbox::Lockbox::new();
//! let sealed = pwbox
//!     .seal(b"message", "correct horse battery staple", &Default::default())
//!     .await?;
//! let message = pwbox.open(&sealed, "correct horse battery staple").await?;
//! # Ok(())
//! # }
//! ```

pub mod crypto;
mod error;
pub mod format;

use std::sync::Arc;

use tokio::task;
use zeroize::Zeroizing;

use crate::crypto::params;
pub use crate::crypto::{
    CryptoBackend, DEFAULT_MEMLIMIT, DEFAULT_OPSLIMIT, DK_LEN, KEY_LEN, MAX_MEMLIMIT,
    MAX_OPSLIMIT, MIN_MEMLIMIT, MIN_OPSLIMIT, NONCE_LEN, RustCryptoBackend, SALT_LEN,
    SECRETBOX_OVERHEAD, ScryptCost,
};
pub use crate::error::{Error, Result};
pub use crate::format::{Algorithm, HEADER_LEN, OVERHEAD_LEN, PwBox, SCRYPT_ID};

/// Options accepted by [`Lockbox::seal`] and [`Lockbox::seal_box`].
#[derive(Debug, Clone)]
pub struct SealOptions {
    /// KDF salt. Defaults to fresh random bytes; supply one for testing
    /// only, never in production.
    pub salt: Option<[u8; SALT_LEN]>,
    /// CPU cost budget, within `[MIN_OPSLIMIT, MAX_OPSLIMIT]`.
    pub opslimit: u64,
    /// Memory cost budget in bytes, within `[MIN_MEMLIMIT, MAX_MEMLIMIT]`.
    pub memlimit: u64,
}

impl Default for SealOptions {
    fn default() -> Self {
        Self {
            salt: None,
            opslimit: DEFAULT_OPSLIMIT,
            memlimit: DEFAULT_MEMLIMIT,
        }
    }
}

/// Seal/open engine over a [`CryptoBackend`] capability.
///
/// The engine holds no mutable state; one instance can serve any number of
/// concurrent calls.
#[derive(Debug)]
pub struct Lockbox<B: CryptoBackend = RustCryptoBackend> {
    backend: Arc<B>,
}

impl Lockbox<RustCryptoBackend> {
    /// Creates an engine on the default RustCrypto backend.
    pub fn new() -> Self {
        Self::with_backend(RustCryptoBackend)
    }
}

impl Default for Lockbox<RustCryptoBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: CryptoBackend> Lockbox<B> {
    /// Creates an engine on a caller-supplied backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Seals a message under a password and returns the binary box.
    pub async fn seal(
        &self,
        message: &[u8],
        password: impl AsRef<[u8]>,
        options: &SealOptions,
    ) -> Result<Vec<u8>> {
        let pwbox = self.seal_box(message, password, options).await?;
        format::serialize(&pwbox)
    }

    /// Seals a message under a password and returns the structured box.
    pub async fn seal_box(
        &self,
        message: &[u8],
        password: impl AsRef<[u8]>,
        options: &SealOptions,
    ) -> Result<PwBox> {
        validate_limits(options.opslimit, options.memlimit)?;

        let salt = match options.salt {
            Some(salt) => salt,
            None => {
                let mut salt = [0u8; SALT_LEN];
                self.backend.random_bytes(&mut salt)?;
                salt
            }
        };

        let cost = params::pick(options.opslimit, options.memlimit);
        let backend = Arc::clone(&self.backend);
        let message = message.to_vec();
        let password = Zeroizing::new(password.as_ref().to_vec());

        let ciphertext = task::spawn_blocking(move || {
            // Wiped on every exit path by the Zeroizing drop guard.
            let mut dk = Zeroizing::new([0u8; DK_LEN]);
            backend.scrypt(&password, &salt, &cost, &mut dk[..])?;

            let (key, nonce) = dk.split_at(KEY_LEN);
            backend.secretbox_seal(&message, nonce, key)
        })
        .await
        .map_err(|e| Error::Backend(format!("key derivation task failed: {e}")))??;

        Ok(PwBox::new(
            Algorithm::new(SCRYPT_ID, options.opslimit as u32, options.memlimit as u32),
            salt.to_vec(),
            ciphertext,
        ))
    }

    /// Opens a binary box and returns the message.
    pub async fn open(
        &self,
        boxed: &[u8],
        password: impl AsRef<[u8]>,
    ) -> Result<Zeroizing<Vec<u8>>> {
        let pwbox = format::deserialize(boxed)?;
        self.open_box(&pwbox, password).await
    }

    /// Opens a structured box and returns the message.
    ///
    /// Fails with [`Error::Corrupted`] on any authentication failure; a
    /// wrong password and a tampered box are indistinguishable by design.
    pub async fn open_box(
        &self,
        pwbox: &PwBox,
        password: impl AsRef<[u8]>,
    ) -> Result<Zeroizing<Vec<u8>>> {
        let algorithm = pwbox.algorithm();
        if algorithm.id() != SCRYPT_ID {
            return Err(Error::Algorithm(algorithm.id().to_string()));
        }

        // The header is untrusted input; re-validate the budgets so a
        // corrupted cost field cannot trigger an unbounded KDF run.
        let opslimit = u64::from(algorithm.opslimit());
        let memlimit = u64::from(algorithm.memlimit());
        validate_limits(opslimit, memlimit)?;

        // Cost parameters are recovered from the persisted budgets through
        // the same picker as seal, never re-guessed.
        let cost = params::pick(opslimit, memlimit);
        let backend = Arc::clone(&self.backend);
        let password = Zeroizing::new(password.as_ref().to_vec());
        let salt = pwbox.salt().to_vec();
        let ciphertext = pwbox.ciphertext().to_vec();

        task::spawn_blocking(move || {
            let mut dk = Zeroizing::new([0u8; DK_LEN]);
            backend.scrypt(&password, &salt, &cost, &mut dk[..])?;

            let (key, nonce) = dk.split_at(KEY_LEN);
            backend
                .secretbox_open(&ciphertext, nonce, key)
                .map(Zeroizing::new)
                .ok_or(Error::Corrupted)
        })
        .await
        .map_err(|e| Error::Backend(format!("key derivation task failed: {e}")))?
    }
}

fn validate_limits(opslimit: u64, memlimit: u64) -> Result<()> {
    if opslimit < MIN_OPSLIMIT {
        return Err(Error::Validation(format!(
            "opslimit {opslimit} below minimum {MIN_OPSLIMIT}"
        )));
    }
    if opslimit > MAX_OPSLIMIT {
        return Err(Error::Validation(format!(
            "opslimit {opslimit} above maximum {MAX_OPSLIMIT}"
        )));
    }
    if memlimit < MIN_MEMLIMIT {
        return Err(Error::Validation(format!(
            "memlimit {memlimit} below minimum {MIN_MEMLIMIT}"
        )));
    }
    if memlimit > MAX_MEMLIMIT {
        return Err(Error::Validation(format!(
            "memlimit {memlimit} above maximum {MAX_MEMLIMIT}"
        )));
    }
    Ok(())
}
