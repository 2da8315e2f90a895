use std::fmt;
use std::str::FromStr;

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

use crate::AccessError;

pub const KEY_LENGTH: usize = 32;

type Blake2b256 = Blake2b<U32>;

/// 32-byte BLAKE2b digest used for every storage address computation.
pub fn sum256(bytes: &[u8]) -> [u8; KEY_LENGTH] {
    let digest = Blake2b256::digest(bytes);
    let mut out = [0u8; KEY_LENGTH];
    out.copy_from_slice(&digest);
    out
}

/// Storage address: a 256-bit big-endian integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StorageKey([u8; KEY_LENGTH]);

impl StorageKey {
    pub const fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        StorageKey(bytes)
    }

    /// Key of a top-level state slot.
    pub fn from_slot(slot: u32) -> Self {
        let mut bytes = [0u8; KEY_LENGTH];
        bytes[KEY_LENGTH - 4..].copy_from_slice(&slot.to_be_bytes());
        StorageKey(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }

    pub fn hashed(&self) -> Self {
        StorageKey(sum256(&self.0))
    }

    /// Integer addition modulo 2^256.
    pub fn wrapping_add(self, n: u64) -> Self {
        let mut bytes = self.0;
        let mut carry = u128::from(n);
        for byte in bytes.iter_mut().rev() {
            if carry == 0 {
                break;
            }
            let sum = u128::from(*byte) + (carry & 0xff);
            *byte = sum as u8;
            carry = (carry >> 8) + (sum >> 8);
        }
        StorageKey(bytes)
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn from_hex_str(s: &str) -> Result<Self, AccessError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != KEY_LENGTH * 2 {
            return Err(AccessError::InvalidKey(format!(
                "expected {} hex digits, got {}",
                KEY_LENGTH * 2,
                digits.len()
            )));
        }
        let mut bytes = [0u8; KEY_LENGTH];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|err| AccessError::InvalidKey(err.to_string()))?;
        Ok(StorageKey(bytes))
    }
}

impl From<u32> for StorageKey {
    fn from(slot: u32) -> Self {
        StorageKey::from_slot(slot)
    }
}

impl From<[u8; KEY_LENGTH]> for StorageKey {
    fn from(bytes: [u8; KEY_LENGTH]) -> Self {
        StorageKey(bytes)
    }
}

impl From<StorageKey> for [u8; KEY_LENGTH] {
    fn from(key: StorageKey) -> Self {
        key.0
    }
}

impl AsRef<[u8]> for StorageKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for StorageKey {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorageKey::from_hex_str(s)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StorageKey").field(&self.to_hex()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_is_big_endian_in_low_bytes() {
        let key = StorageKey::from_slot(0x0102);
        assert_eq!(key.as_bytes()[30..], [0x01, 0x02]);
        assert!(key.as_bytes()[..30].iter().all(|b| *b == 0));
    }

    #[test]
    fn addition_carries_and_wraps() {
        let mut bytes = [0u8; KEY_LENGTH];
        bytes[31] = 0xff;
        bytes[30] = 0xff;
        let key = StorageKey::from_bytes(bytes).wrapping_add(1);
        assert_eq!(key.as_bytes()[29..], [0x01, 0x00, 0x00]);

        let max = StorageKey::from_bytes([0xff; KEY_LENGTH]);
        assert_eq!(max.wrapping_add(2), StorageKey::from_slot(1));
        assert_eq!(max.wrapping_add(u64::MAX), StorageKey::from_bytes({
            let mut b = [0u8; KEY_LENGTH];
            b[24..].copy_from_slice(&(u64::MAX - 1).to_be_bytes());
            b
        }));
    }

    #[test]
    fn hex_round_trip() {
        let key = StorageKey::from_slot(7).hashed();
        let parsed: StorageKey = key.to_string().parse().unwrap();
        assert_eq!(parsed, key);
        assert!(matches!(
            "0x1234".parse::<StorageKey>(),
            Err(AccessError::InvalidKey(_))
        ));
    }

    #[test]
    fn digest_is_blake2b_256() {
        assert_eq!(
            hex::encode(sum256(b"")),
            "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
        );
    }
}
