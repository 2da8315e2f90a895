use std::cmp::Ordering;
use std::fmt;

/// Arbitrary-width signed integer kept as sign plus big-endian magnitude.
///
/// The magnitude never carries leading zero bytes and zero is never negative,
/// so the representation is canonical and matches the integer wire body.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Integer {
    negative: bool,
    magnitude: Vec<u8>,
}

impl Integer {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_be_bytes(negative: bool, bytes: &[u8]) -> Self {
        let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        let magnitude = bytes[first..].to_vec();
        Self {
            negative: negative && !magnitude.is_empty(),
            magnitude,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.is_empty()
    }

    /// Big-endian magnitude without leading zeros; empty for zero.
    pub fn magnitude(&self) -> &[u8] {
        &self.magnitude
    }

    pub fn to_u128(&self) -> Option<u128> {
        if self.negative || self.magnitude.len() > 16 {
            return None;
        }
        Some(
            self.magnitude
                .iter()
                .fold(0u128, |acc, b| (acc << 8) | u128::from(*b)),
        )
    }

    pub fn to_i128(&self) -> Option<i128> {
        if self.magnitude.len() > 16 {
            return None;
        }
        let abs = self
            .magnitude
            .iter()
            .fold(0u128, |acc, b| (acc << 8) | u128::from(*b));
        if !self.negative {
            return i128::try_from(abs).ok();
        }
        if abs == 1u128 << 127 {
            Some(i128::MIN)
        } else {
            i128::try_from(abs).ok().map(|v| -v)
        }
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.to_u128().and_then(|v| u64::try_from(v).ok())
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.to_i128().and_then(|v| i64::try_from(v).ok())
    }
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Integer {
            fn from(value: $ty) -> Self {
                Integer::from_be_bytes(false, &(value as u128).to_be_bytes())
            }
        })*
    };
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Integer {
            fn from(value: $ty) -> Self {
                let abs = (value as i128).unsigned_abs();
                Integer::from_be_bytes(value < 0, &abs.to_be_bytes())
            }
        })*
    };
}

impl_from_unsigned!(u8, u16, u32, u64, u128, usize);
impl_from_signed!(i8, i16, i32, i64, i128, isize);

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_magnitude = self
            .magnitude
            .len()
            .cmp(&other.magnitude.len())
            .then_with(|| self.magnitude.cmp(&other.magnitude));
        match (self.negative, other.negative) {
            (false, false) => by_magnitude,
            (true, true) => by_magnitude.reverse(),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(v) = self.to_i128() {
            return write!(f, "{v}");
        }
        if let Some(v) = self.to_u128() {
            return write!(f, "{v}");
        }
        let sign = if self.negative { "-" } else { "" };
        write!(f, "{sign}0x{}", hex::encode(&self.magnitude))
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Integer({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_empty_and_unsigned() {
        assert!(Integer::from(0u64).magnitude().is_empty());
        let neg_zero = Integer::from_be_bytes(true, &[0, 0]);
        assert!(!neg_zero.is_negative());
        assert_eq!(neg_zero, Integer::zero());
    }

    #[test]
    fn magnitude_is_minimal_big_endian() {
        assert_eq!(
            Integer::from(100_000_000u64).magnitude(),
            &[0x05, 0xf5, 0xe1, 0x00]
        );
        assert_eq!(Integer::from(-300i32).magnitude(), &[0x01, 0x2c]);
    }

    #[test]
    fn narrowing_conversions() {
        assert_eq!(Integer::from(i64::MIN).to_i64(), Some(i64::MIN));
        assert_eq!(Integer::from(i128::MIN).to_i128(), Some(i128::MIN));
        assert_eq!(Integer::from(u64::MAX).to_i64(), None);
        assert_eq!(Integer::from(-1i8).to_u64(), None);
        let wide = Integer::from_be_bytes(false, &[1; 20]);
        assert_eq!(wide.to_u128(), None);
        assert!(wide.to_string().starts_with("0x0101"));
    }

    #[test]
    fn ordering_is_numeric() {
        let mut values = vec![
            Integer::from(300u32),
            Integer::from(-2i8),
            Integer::from(0u8),
            Integer::from(-300i32),
            Integer::from(7u8),
        ];
        values.sort();
        let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["-300", "-2", "0", "7", "300"]);
    }
}
