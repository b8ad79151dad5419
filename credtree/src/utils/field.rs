//! Conversions between BN254 field elements and their byte, decimal and digit forms.
//!
//! The canonical byte form of a field element is its 32-byte big-endian integer
//! representation. Claim slots use the little-endian form instead, so both
//! directions are provided. Every decoder rejects integers that are not below the
//! field modulus instead of silently reducing them.

use ark_bn254::Fr;
use ark_ff::{BigInt, BigInteger, PrimeField};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use num_bigint::BigUint;
use num_traits::ToPrimitive;

/// Width in bytes of the canonical encoding of a field element.
pub const FIELD_BYTES: usize = 32;

/// Number of 64-bit limbs backing a BN254 scalar.
const LIMBS: usize = FIELD_BYTES / 8;

/// Decodes a 32-byte big-endian integer.
///
/// # Returns
/// `None` if the integer is not below the field modulus
pub fn fr_from_be_bytes(bz: &[u8; FIELD_BYTES]) -> Option<Fr> {
    let mut limbs = [0u64; LIMBS];
    for (i, limb) in limbs.iter_mut().enumerate() {
        let end = FIELD_BYTES - i * 8;
        *limb = BigEndian::read_u64(&bz[end - 8..end]);
    }
    Fr::from_bigint(BigInt::new(limbs))
}

/// Decodes a 32-byte little-endian integer.
///
/// # Returns
/// `None` if the integer is not below the field modulus
pub fn fr_from_le_bytes(bz: &[u8; FIELD_BYTES]) -> Option<Fr> {
    let mut limbs = [0u64; LIMBS];
    for (i, limb) in limbs.iter_mut().enumerate() {
        *limb = LittleEndian::read_u64(&bz[i * 8..i * 8 + 8]);
    }
    Fr::from_bigint(BigInt::new(limbs))
}

/// Encodes a field element as a 32-byte big-endian integer.
pub fn fr_to_be_bytes(fr: &Fr) -> [u8; FIELD_BYTES] {
    let v = fr.into_bigint().to_bytes_be();
    let mut out = [0u8; FIELD_BYTES];
    out[FIELD_BYTES - v.len()..].copy_from_slice(&v);
    out
}

/// Encodes a field element as a 32-byte little-endian integer.
pub fn fr_to_le_bytes(fr: &Fr) -> [u8; FIELD_BYTES] {
    let v = fr.into_bigint().to_bytes_le();
    let mut out = [0u8; FIELD_BYTES];
    out[..v.len()].copy_from_slice(&v);
    out
}

pub fn to_biguint(fr: &Fr) -> BigUint {
    BigUint::from_bytes_be(&fr_to_be_bytes(fr))
}

/// Converts an arbitrary-precision integer, failing when it is not below the modulus.
pub fn from_biguint(n: &BigUint) -> Option<Fr> {
    let v = n.to_bytes_be();
    if v.len() > FIELD_BYTES {
        return None;
    }
    let mut bz = [0u8; FIELD_BYTES];
    bz[FIELD_BYTES - v.len()..].copy_from_slice(&v);
    fr_from_be_bytes(&bz)
}

/// Renders a field element as its canonical decimal string ("0" for zero).
pub fn to_decimal(fr: &Fr) -> String {
    to_biguint(fr).to_str_radix(10)
}

/// Parses a canonical decimal string.
///
/// Only plain ASCII digits without leading zeros are accepted, so that every
/// field element has exactly one string form.
pub fn from_decimal(s: &str) -> Option<Fr> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if s.len() > 1 && s.starts_with('0') {
        return None;
    }
    let n = BigUint::parse_bytes(s.as_bytes(), 10)?;
    from_biguint(&n)
}

/// Returns the field modulus as an arbitrary-precision integer.
pub fn modulus() -> BigUint {
    BigUint::from_bytes_be(&Fr::MODULUS.to_bytes_be())
}

/// Decomposes `fr` into `levels` digits of the given radix, least significant first.
///
/// Digits past the most significant one are zero, so any `levels` is valid.
pub fn digits(fr: &Fr, radix: usize, levels: usize) -> Vec<usize> {
    let radix_big = BigUint::from(radix);
    let mut n = to_biguint(fr);
    let mut res = Vec::with_capacity(levels);
    for _ in 0..levels {
        // the remainder is always below `radix`
        res.push((&n % &radix_big).to_usize().unwrap_or_default());
        n /= &radix_big;
    }
    res
}

/// Number of radix digits needed to spell any field element.
///
/// Deeper trees would only add levels whose digit is zero for every key.
pub fn max_digits(radix: usize) -> usize {
    let modulus = modulus();
    let radix_big = BigUint::from(radix);
    let mut cap = BigUint::from(1u32);
    let mut n = 0;
    while cap < modulus {
        cap *= &radix_big;
        n += 1;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::{One, Zero};

    #[test]
    fn test_byte_forms() {
        let x = Fr::from(0x0102_0304_0506_0708u64);
        let be = fr_to_be_bytes(&x);
        assert_eq!(&be[24..], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(be[..24], [0u8; 24]);
        assert_eq!(fr_from_be_bytes(&be), Some(x));

        let le = fr_to_le_bytes(&x);
        assert_eq!(&le[..8], &[8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(fr_from_le_bytes(&le), Some(x));
    }

    #[test]
    fn test_overflow_is_rejected() {
        assert_eq!(fr_from_be_bytes(&[0xff; 32]), None);
        assert_eq!(fr_from_le_bytes(&[0xff; 32]), None);

        let p = modulus();
        assert_eq!(from_biguint(&p), None);
        let p_minus_one = &p - 1u32;
        let max = from_biguint(&p_minus_one).unwrap();
        assert_eq!(max + Fr::one(), Fr::zero());
    }

    #[test]
    fn test_decimal() {
        assert_eq!(to_decimal(&Fr::zero()), "0");
        assert_eq!(to_decimal(&Fr::from(3232u64)), "3232");
        assert_eq!(from_decimal("0"), Some(Fr::zero()));
        assert_eq!(from_decimal("3232"), Some(Fr::from(3232u64)));
        assert_eq!(from_decimal(""), None);
        assert_eq!(from_decimal("007"), None);
        assert_eq!(from_decimal("-7"), None);
        assert_eq!(from_decimal("1_000"), None);
        assert_eq!(from_decimal(&modulus().to_str_radix(10)), None);
    }

    #[test]
    fn test_digits() {
        assert_eq!(digits(&Fr::from(7u64), 2, 5), vec![1, 1, 1, 0, 0]);
        assert_eq!(digits(&Fr::from(32u64), 2, 7), vec![0, 0, 0, 0, 0, 1, 0]);
        // 126 = 1 + 0*5 + 0*25 + 1*125
        assert_eq!(digits(&Fr::from(126u64), 5, 5), vec![1, 0, 0, 1, 0]);
        assert_eq!(digits(&Fr::zero(), 5, 3), vec![0, 0, 0]);
    }

    #[test]
    fn test_max_digits() {
        assert_eq!(max_digits(2), 254);
        assert_eq!(max_digits(5), 110);
    }
}
