//! Lagrange interpolation and vanishing polynomials
//!
//! Both constructions are plain products of linear factors `(x − zᵢ)`.
//! Nothing here assumes the points form a multiplicative subgroup, so any
//! set of distinct evaluation points works.

#![forbid(unsafe_code)]

use ark_ff::{One, Zero};

use crate::field;
use crate::poly::{PolyError, Polynomial};
use crate::F;

/// Errors produced while building interpolating polynomials.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterpolationError {
    /// `xs` and `ys` differ in length.
    #[error("length mismatch: {xs} abscissae vs {ys} ordinates")]
    LengthMismatch {
        /// Number of abscissae.
        xs: usize,
        /// Number of ordinates.
        ys: usize,
    },
    /// No points were given.
    #[error("cannot interpolate through zero points")]
    Empty,
    /// Duplicate abscissae end up here as `PolyError::DivisionByZero`.
    #[error(transparent)]
    Poly(#[from] PolyError),
}

/// The unique polynomial of length `k = xs.len()` with `p(xsᵢ) = ysᵢ`.
///
/// Builds each basis polynomial `Lⱼ(x) = Π_{m≠j} (x − xₘ)/(xⱼ − xₘ)` and
/// accumulates `Σ yⱼ·Lⱼ`. `xs` must be pairwise distinct.
pub fn lagrange_interpolate(xs: &[F], ys: &[F]) -> Result<Polynomial, InterpolationError> {
    if xs.len() != ys.len() {
        return Err(InterpolationError::LengthMismatch { xs: xs.len(), ys: ys.len() });
    }
    if xs.is_empty() {
        return Err(InterpolationError::Empty);
    }

    let k = xs.len();
    let mut acc = Polynomial::from_coeffs(vec![F::zero(); k]);
    for (j, (&xj, &yj)) in xs.iter().zip(ys).enumerate() {
        let mut basis = Polynomial::constant(F::one());
        for (m, &xm) in xs.iter().enumerate() {
            if m == j {
                continue;
            }
            let factor = Polynomial::x_minus(xm).div_by_constant(xj - xm)?;
            basis = basis.mul(&factor)?;
        }
        acc = acc.add(&basis.mul_by_constant(yj));
    }
    Ok(acc)
}

/// `Π (x − zᵢ)`, monic of length `zs.len() + 1`. The empty product is `1`.
pub fn vanishing_polynomial(zs: &[F]) -> Polynomial {
    zs.iter()
        .fold(Polynomial::constant(F::one()), |acc, &z| linear_product(&acc, z))
}

/// `p(x)·(x − z)` without going through the general convolution.
fn linear_product(p: &Polynomial, z: F) -> Polynomial {
    let c = p.coeffs();
    let mut out = vec![F::zero(); c.len() + 1];
    for (i, a) in c.iter().enumerate() {
        out[i] -= z * a;
        out[i + 1] += a;
    }
    Polynomial::from_coeffs(out)
}

/// Polynomial equal to `height` at integer position `point_pos` and zero at
/// every other position in `1..=total_points`.
pub fn zero_at(
    point_pos: usize,
    total_points: usize,
    height: F,
) -> Result<Polynomial, InterpolationError> {
    let pos = F::from(point_pos as u64);
    let others = (1..=total_points).filter(|&i| i != point_pos);

    let denom = others
        .clone()
        .fold(F::one(), |acc, i| acc * (pos - F::from(i as u64)));
    let scale = field::div(height, denom).map_err(PolyError::from)?;

    let mut r = Polynomial::constant(scale);
    for i in others {
        r = r.mul(&Polynomial::x_minus(F::from(i as u64)))?;
    }
    Ok(r)
}
