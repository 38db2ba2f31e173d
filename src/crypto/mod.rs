//! Cryptographic building blocks: cost-budget constants, scrypt parameter
//! picking, and the pluggable backend capability.

pub mod backend;
pub mod params;

pub use backend::{CryptoBackend, RustCryptoBackend};
pub use params::ScryptCost;

/// Length of the scrypt salt (32 bytes).
pub const SALT_LEN: usize = 32;
/// Length of the secretbox key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Length of the secretbox nonce (24 bytes for XSalsa20-Poly1305).
pub const NONCE_LEN: usize = 24;
/// Bytes the secretbox authenticator adds to every ciphertext.
pub const SECRETBOX_OVERHEAD: usize = 16;
/// Length of the derived key material: key and nonce, back to back.
pub const DK_LEN: usize = KEY_LEN + NONCE_LEN;

/// Default (interactive) CPU cost budget.
pub const DEFAULT_OPSLIMIT: u64 = 524_288;
/// Default (interactive) memory cost budget, in bytes.
pub const DEFAULT_MEMLIMIT: u64 = 16_777_216;
/// Smallest accepted `opslimit`.
pub const MIN_OPSLIMIT: u64 = 32_768;
/// Smallest accepted `memlimit`.
pub const MIN_MEMLIMIT: u64 = 16_777_216;
/// Largest accepted `opslimit`; boxes persist the budget as an unsigned
/// 32-bit field.
pub const MAX_OPSLIMIT: u64 = u32::MAX as u64;
/// Largest accepted `memlimit`; same serialization bound as `MAX_OPSLIMIT`.
pub const MAX_MEMLIMIT: u64 = u32::MAX as u64;
