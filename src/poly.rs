//! Dense univariate polynomials over `F`
//!
//! Coefficients are stored **low→high**: index `i` holds the coefficient of
//! `xⁱ`. Arithmetic never trims trailing zero coefficients, so the stored
//! length can exceed `degree() + 1`; the lengths produced by each operation
//! are part of its contract (see the per-method docs). Every operation builds
//! a fresh coefficient buffer and leaves its inputs untouched.

#![forbid(unsafe_code)]

use std::fmt;
use std::ops::{Add, Neg, Sub};

use ark_ff::{One, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::field::{self, FieldError};
use crate::F;

/// Errors produced by polynomial arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolyError {
    /// An operand has no coefficients.
    #[error("operand polynomial has no coefficients")]
    Empty,
    /// Division by a zero constant or by a divisor with a zero leading coefficient.
    #[error("division by zero (zero constant or zero leading coefficient)")]
    DivisionByZero,
}

impl From<FieldError> for PolyError {
    fn from(_: FieldError) -> Self {
        // The only fallible field operation reachable from this module is inversion.
        PolyError::DivisionByZero
    }
}

/// Dense coefficient-vector polynomial.
#[derive(Clone, Debug, Default, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Polynomial {
    coeffs: Vec<F>,
}

/// Quotient and remainder of a Euclidean division.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Division {
    /// Length `len(dividend) − len(divisor) + 1`, or `[0]` when the dividend is shorter.
    pub quotient: Polynomial,
    /// Length `len(divisor) − 1` whenever `len(dividend) ≥ len(divisor)`.
    pub remainder: Polynomial,
}

impl Division {
    /// True iff the remainder is the all-zero vector (an empty remainder counts).
    pub fn is_exact(&self) -> bool {
        self.remainder.is_zero()
    }
}

impl Polynomial {
    /// Wrap a low→high coefficient vector as is.
    pub fn from_coeffs(coeffs: Vec<F>) -> Self {
        Self { coeffs }
    }

    /// Lift small unsigned coefficients (low→high) into the field.
    pub fn from_u64(coeffs: &[u64]) -> Self {
        Self::from_coeffs(coeffs.iter().map(|&c| F::from(c)).collect())
    }

    /// The constant polynomial `c` (length 1).
    pub fn constant(c: F) -> Self {
        Self::from_coeffs(vec![c])
    }

    /// The monic linear polynomial `x − z`.
    pub fn x_minus(z: F) -> Self {
        Self::from_coeffs(vec![-z, F::one()])
    }

    /// Stored coefficients, low→high.
    #[inline]
    pub fn coeffs(&self) -> &[F] {
        &self.coeffs
    }

    /// Unwrap into the coefficient vector.
    pub fn into_coeffs(self) -> Vec<F> {
        self.coeffs
    }

    /// Stored coefficient count (not trimmed).
    #[inline]
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// No stored coefficients at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// All stored coefficients are zero (vacuously true when empty).
    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_zero())
    }

    /// Highest-index *stored* coefficient, which may be zero.
    pub fn leading_coefficient(&self) -> Option<F> {
        self.coeffs.last().copied()
    }

    /// True degree ignoring trailing zeros; `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.iter().rposition(|c| !c.is_zero())
    }

    /// Copy with trailing zero coefficients removed (the zero polynomial keeps `[0]`).
    pub fn trimmed(&self) -> Self {
        let keep = self.degree().map_or(1, |d| d + 1);
        let mut coeffs: Vec<F> = self.coeffs.iter().take(keep).copied().collect();
        if coeffs.is_empty() {
            coeffs.push(F::zero());
        }
        Self { coeffs }
    }

    /// Equality of the represented polynomials, ignoring length padding.
    pub fn equivalent(&self, other: &Self) -> bool {
        let n = self.len().max(other.len());
        (0..n).all(|i| self.coeff(i) == other.coeff(i))
    }

    #[inline]
    fn coeff(&self, i: usize) -> F {
        self.coeffs.get(i).copied().unwrap_or_else(F::zero)
    }

    /// Coefficient-wise sum, length `max(len(a), len(b))`.
    pub fn add(&self, other: &Self) -> Self {
        let n = self.len().max(other.len());
        Self::from_coeffs((0..n).map(|i| self.coeff(i) + other.coeff(i)).collect())
    }

    /// Coefficient-wise difference, length `max(len(a), len(b))`.
    pub fn sub(&self, other: &Self) -> Self {
        let n = self.len().max(other.len());
        Self::from_coeffs((0..n).map(|i| self.coeff(i) - other.coeff(i)).collect())
    }

    /// Convolution product, length `len(a) + len(b) − 1`.
    pub fn mul(&self, other: &Self) -> Result<Self, PolyError> {
        if self.is_empty() || other.is_empty() {
            return Err(PolyError::Empty);
        }
        let mut out = vec![F::zero(); self.len() + other.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                out[i + j] += *a * b;
            }
        }
        Ok(Self::from_coeffs(out))
    }

    /// Every coefficient times `c`; length unchanged.
    pub fn mul_by_constant(&self, c: F) -> Self {
        Self::from_coeffs(self.coeffs.iter().map(|a| *a * c).collect())
    }

    /// Every coefficient divided by `c`; fails when `c ≡ 0`.
    pub fn div_by_constant(&self, c: F) -> Result<Self, PolyError> {
        let c_inv = field::inv(c)?;
        Ok(self.mul_by_constant(c_inv))
    }

    /// Euclidean long division by `divisor`.
    ///
    /// Repeatedly cancels the highest stored term of the running remainder
    /// with the highest stored term of `divisor`. The quotient has
    /// `len(a) − len(b) + 1` coefficients and the remainder `len(b) − 1`.
    /// When `len(a) < len(b)` the quotient is `[0]` and the remainder is `a`.
    ///
    /// The divisor's leading *stored* coefficient must be non-zero.
    pub fn divide(&self, divisor: &Self) -> Result<Division, PolyError> {
        let lead = divisor.leading_coefficient().ok_or(PolyError::Empty)?;
        let lead_inv = field::inv(lead)?;
        let (n, m) = (self.len(), divisor.len());
        if n < m {
            return Ok(Division {
                quotient: Self::constant(F::zero()),
                remainder: self.clone(),
            });
        }

        let mut rem = self.coeffs.clone();
        let mut quotient = vec![F::zero(); n - m + 1];
        for pos in (0..=n - m).rev() {
            let l = rem[pos + m - 1] * lead_inv;
            quotient[pos] = l;
            if l.is_zero() {
                continue;
            }
            for (j, b) in divisor.coeffs.iter().enumerate() {
                rem[pos + j] -= l * b;
            }
        }
        rem.truncate(m - 1);

        Ok(Division {
            quotient: Self::from_coeffs(quotient),
            remainder: Self::from_coeffs(rem),
        })
    }

    /// Horner evaluation `Σ pᵢ·xⁱ` in `O(len)` field operations.
    pub fn eval_at(&self, x: F) -> F {
        self.coeffs
            .iter()
            .rev()
            .fold(F::zero(), |acc, c| acc * x + c)
    }

    /// Direct-power baseline: one exponentiation per term, `O(len · log len)`.
    pub fn eval_at_naive(&self, x: F) -> F {
        self.coeffs
            .iter()
            .enumerate()
            .fold(F::zero(), |acc, (i, c)| acc + *c * field::pow(x, i as u64))
    }
}

impl<'a> Add<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;
    fn add(self, rhs: &'a Polynomial) -> Polynomial {
        Polynomial::add(self, rhs)
    }
}

impl<'a> Sub<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;
    fn sub(self, rhs: &'a Polynomial) -> Polynomial {
        Polynomial::sub(self, rhs)
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;
    fn neg(self) -> Polynomial {
        Polynomial::from_coeffs(self.coeffs.iter().map(|c| -*c).collect())
    }
}

const SUPERSCRIPTS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

fn superscript(n: usize) -> String {
    n.to_string()
        .bytes()
        .map(|b| SUPERSCRIPTS[(b - b'0') as usize])
        .collect()
}

/// Highest term first, e.g. `x³ + x¹ + 5`. Zero terms are omitted, a unit
/// coefficient is not printed, and the constant term is always printed.
impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (1..self.len()).rev() {
            let c = self.coeffs[i];
            if c.is_one() {
                write!(f, "x{} + ", superscript(i))?;
            } else if !c.is_zero() {
                write!(f, "{}x{} + ", field::to_decimal(&c), superscript(i))?;
            }
        }
        write!(f, "{}", field::to_decimal(&self.coeff(0)))
    }
}
