//! Scalar field arithmetic modulo the BN254 group order `R`
//!
//! The backing representation is `ark_bn254::Fr`, which already keeps every
//! element canonical in `[0, R)`. This module exposes the handful of
//! operations the polynomial layer is written against, with division and
//! inversion made fallible instead of returning `Option`.
//!
//! ```
//! use tinykzg::field;
//! use tinykzg::F;
//!
//! let a = F::from(7u64);
//! let b = F::from(3u64);
//! let q = field::div(a, b).unwrap();
//! assert_eq!(field::mul(q, b), a);
//! assert!(field::div(a, F::from(0u64)).is_err());
//! ```

#![forbid(unsafe_code)]

use ark_ff::{Field, One, PrimeField, Zero};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::F;

/// Decimal form of the scalar-field modulus `R` (order of G1/G2).
pub const MODULUS_R_DECIMAL: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

/// Decimal form of the BN254 base-field modulus `Q` (the field the curve
/// coordinates live in, i.e. the "outer" snark modulus).
pub const MODULUS_Q_DECIMAL: &str =
    "21888242871839275222246405745257275088696311157297823662689037894645226208583";

/// Bytes drawn per random element. Reducing 512 bits mod a 254-bit prime
/// keeps the statistical distance from uniform below `2^-250`.
const RANDOM_BYTES: usize = 64;

/// Errors produced by field operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// Inversion or division by an element congruent to zero.
    #[error("division by zero in the scalar field")]
    DivisionByZero,
    /// Input that is not an unsigned decimal integer.
    #[error("invalid decimal field element `{0}`")]
    Parse(String),
}

/// `a + b mod R`.
#[inline]
pub fn add(a: F, b: F) -> F {
    a + b
}

/// `a − b mod R`, wrapping into `[0, R)`.
#[inline]
pub fn sub(a: F, b: F) -> F {
    a - b
}

/// `a · b mod R`.
#[inline]
pub fn mul(a: F, b: F) -> F {
    a * b
}

/// `−a mod R`.
#[inline]
pub fn neg(a: F) -> F {
    -a
}

/// Modular inverse `a⁻¹ mod R`.
#[inline]
pub fn inv(a: F) -> Result<F, FieldError> {
    a.inverse().ok_or(FieldError::DivisionByZero)
}

/// `a · b⁻¹ mod R`; fails when `b ≡ 0`.
#[inline]
pub fn div(a: F, b: F) -> Result<F, FieldError> {
    Ok(a * inv(b)?)
}

/// `base^exp` by square-and-multiply. The exponent is a literal integer,
/// not a field element, so `pow(x, 0) == 1` for every `x` (including zero).
#[inline]
pub fn pow(mut base: F, mut exp: u64) -> F {
    let mut acc = F::one();
    while exp > 0 {
        if (exp & 1) == 1 {
            acc *= base;
        }
        base.square_in_place();
        exp >>= 1;
    }
    acc
}

/// `base^exp` for a little-endian limb exponent of arbitrary width.
pub fn pow_big(base: F, exp_le_limbs: &[u64]) -> F {
    let mut acc = F::one();
    for limb in exp_le_limbs.iter().rev() {
        for bit in (0..64).rev() {
            acc.square_in_place();
            if (limb >> bit) & 1 == 1 {
                acc *= base;
            }
        }
    }
    acc
}

/// Lift a signed integer into the field; negative values map to `R − |v|`.
pub fn from_i64(v: i64) -> F {
    let magnitude = F::from(v.unsigned_abs());
    if v < 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Parse an unsigned decimal integer of any width, reducing mod `R`.
pub fn from_decimal(s: &str) -> Result<F, FieldError> {
    let digits = s.trim();
    if digits.is_empty() {
        return Err(FieldError::Parse(s.to_string()));
    }
    let ten = F::from(10u64);
    let mut acc = F::zero();
    for ch in digits.chars() {
        let d = ch
            .to_digit(10)
            .ok_or_else(|| FieldError::Parse(s.to_string()))?;
        acc = acc * ten + F::from(d as u64);
    }
    Ok(acc)
}

/// Canonical decimal rendering in `[0, R)`; zero renders as `"0"`.
pub fn to_decimal(a: &F) -> String {
    a.into_bigint().to_string()
}

/// Draw a uniform element from a cryptographically secure source.
///
/// Uses `try_fill_bytes` so that an entropy failure is reported instead of
/// panicking inside the generator. The byte buffer is wiped before return.
/// For secrets, prefer [`fill_random`] into a zeroizing holder.
pub fn try_random<R: RngCore + CryptoRng>(rng: &mut R) -> Result<F, rand::Error> {
    let mut out = F::zero();
    fill_random(rng, &mut out)?;
    Ok(out)
}

/// Sample a uniform element straight into `dst`, which is left untouched
/// when the entropy source fails.
pub fn fill_random<R: RngCore + CryptoRng>(rng: &mut R, dst: &mut F) -> Result<(), rand::Error> {
    let mut buf = [0u8; RANDOM_BYTES];
    let res = rng.try_fill_bytes(&mut buf);
    if res.is_ok() {
        *dst = F::from_le_bytes_mod_order(&buf);
    }
    buf.zeroize();
    res
}
