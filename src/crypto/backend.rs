//! Pluggable crypto capability.
//!
//! The engine never reaches for globals: everything it needs from a crypto
//! library is behind [`CryptoBackend`], injected at construction. The
//! default implementation sits on the pure-Rust `scrypt` and
//! `crypto_secretbox` crates.

use crypto_secretbox::{
    Key, Nonce, XSalsa20Poly1305,
    aead::{Aead, KeyInit},
};
use getrandom::fill;
use scrypt::Params;

use super::ScryptCost;
use crate::error::{Error, Result};

/// Capability set consumed by the engine: randomness, the scrypt KDF and the
/// secretbox AEAD.
///
/// Implementations must be stateless and reentrant; the engine shares one
/// instance across concurrent calls and never mutates it. The KDF receives a
/// concrete [`ScryptCost`] picked by the engine, so two backends fed the
/// same budgets always run the same derivation.
pub trait CryptoBackend: Send + Sync + 'static {
    /// Fills `buf` with cryptographically secure random bytes.
    fn random_bytes(&self, buf: &mut [u8]) -> Result<()>;

    /// Derives `dk.len()` bytes of key material from a password and salt.
    /// Blocking; the engine moves it off the async executor.
    fn scrypt(&self, password: &[u8], salt: &[u8], cost: &ScryptCost, dk: &mut [u8])
    -> Result<()>;

    /// Seals a message under the given nonce and key.
    fn secretbox_seal(&self, message: &[u8], nonce: &[u8], key: &[u8]) -> Result<Vec<u8>>;

    /// Opens a sealed message. `None` signals authentication failure.
    fn secretbox_open(&self, ciphertext: &[u8], nonce: &[u8], key: &[u8]) -> Option<Vec<u8>>;
}

/// Default backend on the RustCrypto crates.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustCryptoBackend;

impl CryptoBackend for RustCryptoBackend {
    fn random_bytes(&self, buf: &mut [u8]) -> Result<()> {
        fill(buf).map_err(|_| Error::Backend("OS random generator unavailable".into()))
    }

    fn scrypt(
        &self,
        password: &[u8],
        salt: &[u8],
        cost: &ScryptCost,
        dk: &mut [u8],
    ) -> Result<()> {
        let params = Params::new(cost.log2_n(), cost.r(), cost.p(), dk.len())
            .map_err(|e| Error::Backend(format!("scrypt rejected parameters: {e}")))?;

        scrypt::scrypt(password, salt, &params, dk)
            .map_err(|e| Error::Backend(format!("scrypt derivation failed: {e}")))
    }

    fn secretbox_seal(&self, message: &[u8], nonce: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        let cipher = XSalsa20Poly1305::new(Key::from_slice(key));

        cipher
            .encrypt(Nonce::from_slice(nonce), message)
            .map_err(|_| Error::Backend("secretbox sealing failed".into()))
    }

    fn secretbox_open(&self, ciphertext: &[u8], nonce: &[u8], key: &[u8]) -> Option<Vec<u8>> {
        let cipher = XSalsa20Poly1305::new(Key::from_slice(key));

        cipher.decrypt(Nonce::from_slice(nonce), ciphertext).ok()
    }
}
