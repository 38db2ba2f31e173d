//! Binary box format.
//!
//! Layout (little-endian, fixed header):
//! ```text
//! ALGORITHM ID (8, ASCII, NUL-padded) | OPSLIMIT (4, LE) | MEMLIMIT (4, LE) | SALT (32) | CIPHERTEXT
//! ```
//!
//! The layout is shared with other pwbox implementations; boxes produced
//! here open anywhere and vice versa, byte for byte.

use crate::crypto::{SALT_LEN, SECRETBOX_OVERHEAD};
use crate::error::{Error, Result};

/// Algorithm id written by seal.
pub const SCRYPT_ID: &str = "scrypt";

/// Length of the algorithm id field.
pub const ALGORITHM_ID_LEN: usize = 8;
const OPS_LEN: usize = 4;
const MEM_LEN: usize = 4;

/// Length of the fixed header preceding the ciphertext.
pub const HEADER_LEN: usize = ALGORITHM_ID_LEN + OPS_LEN + MEM_LEN + SALT_LEN;

/// Bytes a sealed box adds on top of the message length; also the minimum
/// valid box size. Consumers use this to size buffers.
pub const OVERHEAD_LEN: usize = HEADER_LEN + SECRETBOX_OVERHEAD;

/// KDF algorithm metadata persisted in the box header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Algorithm {
    id: String,
    opslimit: u32,
    memlimit: u32,
}

impl Algorithm {
    pub fn new(id: impl Into<String>, opslimit: u32, memlimit: u32) -> Self {
        Self {
            id: id.into(),
            opslimit,
            memlimit,
        }
    }

    /// Algorithm identifier, at most 8 ASCII bytes.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Portable CPU cost budget.
    pub fn opslimit(&self) -> u32 {
        self.opslimit
    }

    /// Portable memory cost budget, in bytes.
    pub fn memlimit(&self) -> u32 {
        self.memlimit
    }
}

/// A sealed box: algorithm metadata, KDF salt and AEAD ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PwBox {
    algorithm: Algorithm,
    salt: Vec<u8>,
    ciphertext: Vec<u8>,
}

impl PwBox {
    pub fn new(algorithm: Algorithm, salt: Vec<u8>, ciphertext: Vec<u8>) -> Self {
        Self {
            algorithm,
            salt,
            ciphertext,
        }
    }

    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Serializes the box into the binary layout. See [`serialize`].
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    /// Parses a box from the binary layout. See [`deserialize`].
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        deserialize(data)
    }
}

/// Serializes a box into the fixed binary layout.
///
/// # Errors
///
/// Returns [`Error::Format`] if the algorithm id is longer than 8 bytes or
/// contains a non-ASCII character, or if the salt has the wrong length.
pub fn serialize(pwbox: &PwBox) -> Result<Vec<u8>> {
    let id = pwbox.algorithm.id.as_bytes();
    if id.len() > ALGORITHM_ID_LEN {
        return Err(Error::Format(format!(
            "algorithm id exceeds {ALGORITHM_ID_LEN} bytes"
        )));
    }
    if !id.is_ascii() {
        return Err(Error::Format("non-ASCII character in algorithm id".into()));
    }
    if pwbox.salt.len() != SALT_LEN {
        return Err(Error::Format(format!(
            "salt length {} != {SALT_LEN}",
            pwbox.salt.len()
        )));
    }

    let mut buf = Vec::with_capacity(HEADER_LEN + pwbox.ciphertext.len());

    buf.extend_from_slice(id);
    buf.resize(ALGORITHM_ID_LEN, 0);

    buf.extend_from_slice(&pwbox.algorithm.opslimit.to_le_bytes());
    buf.extend_from_slice(&pwbox.algorithm.memlimit.to_le_bytes());

    buf.extend_from_slice(&pwbox.salt);
    buf.extend_from_slice(&pwbox.ciphertext);

    Ok(buf)
}

/// Parses a box from the fixed binary layout.
///
/// Trailing NULs are not part of the logical algorithm id; an id filling all
/// 8 bytes decodes in full.
///
/// # Errors
///
/// Returns [`Error::Format`] if the input is shorter than [`OVERHEAD_LEN`]
/// or the algorithm id is not ASCII.
pub fn deserialize(data: &[u8]) -> Result<PwBox> {
    if data.len() < OVERHEAD_LEN {
        return Err(Error::Format(format!(
            "insufficient length: {}, minimum {OVERHEAD_LEN} expected",
            data.len()
        )));
    }

    let id_field = &data[..ALGORITHM_ID_LEN];
    let id_end = id_field
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(ALGORITHM_ID_LEN);
    let id_bytes = &id_field[..id_end];
    if !id_bytes.is_ascii() {
        return Err(Error::Format("non-ASCII character in algorithm id".into()));
    }
    let id = String::from_utf8_lossy(id_bytes).into_owned();

    let mut offset = ALGORITHM_ID_LEN;
    let opslimit = read_le_u32(data, offset)?;
    offset += OPS_LEN;

    let memlimit = read_le_u32(data, offset)?;
    offset += MEM_LEN;

    let salt = data[offset..offset + SALT_LEN].to_vec();
    offset += SALT_LEN;

    let ciphertext = data[offset..].to_vec();

    Ok(PwBox::new(
        Algorithm::new(id, opslimit, memlimit),
        salt,
        ciphertext,
    ))
}

fn read_le_u32(data: &[u8], offset: usize) -> Result<u32> {
    let bytes = data[offset..offset + 4]
        .try_into()
        .map_err(|_| Error::Format("truncated header".into()))?;
    Ok(u32::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_box() -> PwBox {
        let salt: Vec<u8> = (0..SALT_LEN as u8).collect();
        let ciphertext: Vec<u8> = (0..40u8).map(|i| 255 - i).collect();
        PwBox::new(
            Algorithm::new(SCRYPT_ID, 524_288, 16_777_216),
            salt,
            ciphertext,
        )
    }

    #[test]
    fn serializes_to_correct_size() {
        let bytes = serialize(&sample_box()).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 40);
    }

    #[test]
    fn serializes_id_with_trailing_zeros() {
        let bytes = serialize(&sample_box()).unwrap();
        assert_eq!(&bytes[..8], b"scrypt\0\0");
    }

    #[test]
    fn serializes_limits_as_le_u32() {
        let bytes = serialize(&sample_box()).unwrap();
        assert_eq!(&bytes[8..12], &[0, 0, 8, 0]);
        assert_eq!(&bytes[12..16], &[0, 0, 0, 1]);

        let pwbox = PwBox::new(
            Algorithm::new(SCRYPT_ID, u32::from_le_bytes([129, 2, 255, 4]), 1),
            vec![0; SALT_LEN],
            vec![0; 16],
        );
        let bytes = serialize(&pwbox).unwrap();
        assert_eq!(&bytes[8..12], &[129, 2, 255, 4]);
    }

    #[test]
    fn leaves_salt_and_ciphertext_intact() {
        let pwbox = sample_box();
        let bytes = serialize(&pwbox).unwrap();
        assert_eq!(&bytes[16..48], pwbox.salt());
        assert_eq!(&bytes[48..], pwbox.ciphertext());
    }

    #[test]
    fn roundtrip_reproduces_box_exactly() {
        let pwbox = sample_box();
        let parsed = deserialize(&serialize(&pwbox).unwrap()).unwrap();
        assert_eq!(parsed, pwbox);
    }

    #[test]
    fn eight_byte_id_roundtrips_without_truncation() {
        let pwbox = PwBox::new(
            Algorithm::new("scrypt00", 1, 2),
            vec![0; SALT_LEN],
            vec![0; 16],
        );
        let parsed = deserialize(&serialize(&pwbox).unwrap()).unwrap();
        assert_eq!(parsed.algorithm().id(), "scrypt00");
    }

    #[test]
    fn id_decoding_stops_at_first_nul() {
        let mut data = vec![0u8; 100];
        data[0] = b'A';
        data[1] = b'B';
        // After the first NUL; not part of the logical id.
        data[5] = b'C';

        let parsed = deserialize(&data).unwrap();
        assert_eq!(parsed.algorithm().id(), "AB");
    }

    #[test]
    fn rejects_overlong_id() {
        let pwbox = PwBox::new(
            Algorithm::new("scrypt-v2", 1, 2),
            vec![0; SALT_LEN],
            vec![0; 16],
        );
        assert!(matches!(serialize(&pwbox), Err(Error::Format(_))));
    }

    #[test]
    fn rejects_non_ascii_id() {
        let pwbox = PwBox::new(
            Algorithm::new("scrÿpt", 1, 2),
            vec![0; SALT_LEN],
            vec![0; 16],
        );
        assert!(matches!(serialize(&pwbox), Err(Error::Format(_))));
    }

    #[test]
    fn rejects_wrong_salt_length() {
        let pwbox = PwBox::new(Algorithm::new(SCRYPT_ID, 1, 2), vec![0; 16], vec![0; 16]);
        assert!(matches!(serialize(&pwbox), Err(Error::Format(_))));
    }

    #[test]
    fn rejects_every_insufficient_length() {
        for len in 0..OVERHEAD_LEN {
            let data = vec![0u8; len];
            assert!(matches!(deserialize(&data), Err(Error::Format(_))));
        }
    }
}
