//! Polynomial Commitment Scheme (PCS): KZG on BN254
//!
//! Commitments and evaluation proofs are single G1 points obtained by
//! "evaluating a polynomial at `s` in the exponent":
//!
//! ```text
//! [p(s)]₁ = Σ pᵢ · Tau1[i]
//! ```
//!
//! | object                 | polynomial encoded                       |
//! |------------------------|------------------------------------------|
//! | `Commitment`           | `p(x)`                                   |
//! | `EvaluationProof`      | `q(x) = (p(x) − y) / (x − z)`            |
//! | `BatchEvaluationProof` | `q(x) = (p(x) − I(x)) / z(x)`            |
//!
//! where `I` interpolates the claimed points and `z` vanishes on them.
//!
//! ## Soundness note
//! Proof generation only ever commits to an **exact** quotient. A nonzero
//! remainder means the claim is false and yields `KzgError::InvalidEvaluation`;
//! it is never turned into a proof.

#![forbid(unsafe_code)]

use ark_bn254::{G1Affine, G1Projective, G2Projective};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use tracing::debug;

use crate::interpolation::{lagrange_interpolate, vanishing_polynomial, InterpolationError};
use crate::poly::{PolyError, Polynomial};
use crate::srs_setup::TrustedSetup;
use crate::F;

/// PCS commitment newtype (wrap **G1Affine** directly).
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Commitment(pub G1Affine);

/// Proof that a committed polynomial takes value `y` at `z`: `[q(s)]₁`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct EvaluationProof(pub G1Affine);

/// Proof for several `(zᵢ, yᵢ)` claims at once: `[q(s)]₁`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct BatchEvaluationProof(pub G1Affine);

/// Errors produced while committing or proving.
#[derive(Debug, thiserror::Error)]
pub enum KzgError {
    /// The polynomial has more coefficients than the setup has powers.
    #[error("polynomial has {poly_len} coefficients but the setup only holds {setup_len} powers")]
    SetupTooSmall {
        /// Stored coefficient count of the polynomial.
        poly_len: usize,
        /// Number of powers in the setup.
        setup_len: usize,
    },
    /// The claimed value(s) do not match the polynomial.
    #[error("claimed evaluation is false: quotient division left a nonzero remainder")]
    InvalidEvaluation,
    /// `zs` and `ys` differ in length.
    #[error("length mismatch: {zs} points vs {ys} values")]
    LengthMismatch {
        /// Number of evaluation points.
        zs: usize,
        /// Number of claimed values.
        ys: usize,
    },
    /// Batch proofs need `len(p) > len(zs) + 1`.
    #[error("polynomial with {poly_len} coefficients is too short to batch {points} points (need more than points + 1)")]
    DegreeTooLow {
        /// Stored coefficient count of the polynomial.
        poly_len: usize,
        /// Number of batched points.
        points: usize,
    },
    /// Polynomial arithmetic failed.
    #[error(transparent)]
    Poly(#[from] PolyError),
    /// Interpolating the claimed points failed (e.g. duplicate points).
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
}

// ===========================================================================
// Evaluation in the exponent
// ===========================================================================

/// `Σ cᵢ · bases[i]`, skipping zero coefficients.
fn msm<A: AffineRepr<ScalarField = F>>(bases: &[A], coeffs: &[F]) -> Result<A::Group, KzgError> {
    if coeffs.len() > bases.len() {
        return Err(KzgError::SetupTooSmall { poly_len: coeffs.len(), setup_len: bases.len() });
    }
    let mut acc = A::Group::zero();
    for (base, c) in bases.iter().zip(coeffs) {
        if c.is_zero() {
            continue;
        }
        acc += base.mul_bigint(c.into_bigint());
    }
    Ok(acc)
}

/// `[p(s)]₁` over the setup's G1 powers.
pub(crate) fn evaluate_g1(
    setup: &TrustedSetup,
    p: &Polynomial,
) -> Result<G1Projective, KzgError> {
    msm(setup.tau1(), p.coeffs())
}

/// `[p(s)]₂` over the setup's G2 powers.
pub(crate) fn evaluate_g2(
    setup: &TrustedSetup,
    p: &Polynomial,
) -> Result<G2Projective, KzgError> {
    msm(setup.tau2(), p.coeffs())
}

// ===========================================================================
// Commit / prove
// ===========================================================================

/// `C = Σ pᵢ · Tau1[i]`. Requires `len(p) ≤ setup.size()`.
pub fn commit(setup: &TrustedSetup, p: &Polynomial) -> Result<Commitment, KzgError> {
    debug!(poly_len = p.len(), setup_len = setup.size(), "commit");
    Ok(Commitment(evaluate_g1(setup, p)?.into_affine()))
}

/// Prove `p(z) = y`.
///
/// Divides `p(x) − y` by `x − z`; succeeds only when the division is exact.
pub fn evaluation_proof(
    setup: &TrustedSetup,
    p: &Polynomial,
    z: F,
    y: F,
) -> Result<EvaluationProof, KzgError> {
    check_fits(setup, p)?;
    let numerator = p.sub(&Polynomial::constant(y));
    let div = numerator.divide(&Polynomial::x_minus(z))?;
    if !div.is_exact() {
        return Err(KzgError::InvalidEvaluation);
    }
    debug!(poly_len = p.len(), quotient_len = div.quotient.len(), "evaluation proof");
    Ok(EvaluationProof(evaluate_g1(setup, &div.quotient)?.into_affine()))
}

/// Evaluate `p` at `z` and prove the result, returning `(p(z), proof)`.
pub fn open_at(
    setup: &TrustedSetup,
    p: &Polynomial,
    z: F,
) -> Result<(F, EvaluationProof), KzgError> {
    let y = p.eval_at(z);
    Ok((y, evaluation_proof(setup, p, z, y)?))
}

/// Prove `p(zsᵢ) = ysᵢ` for every `i` with one G1 point.
///
/// Requires `len(zs) == len(ys)` and `len(p) > len(zs) + 1` (stored length,
/// trailing zeros count). Point order is irrelevant as long as pairs stay
/// aligned.
pub fn evaluation_batch_proof(
    setup: &TrustedSetup,
    p: &Polynomial,
    zs: &[F],
    ys: &[F],
) -> Result<BatchEvaluationProof, KzgError> {
    if zs.len() != ys.len() {
        return Err(KzgError::LengthMismatch { zs: zs.len(), ys: ys.len() });
    }
    if p.len() <= zs.len() + 1 {
        return Err(KzgError::DegreeTooLow { poly_len: p.len(), points: zs.len() });
    }
    check_fits(setup, p)?;

    let vanishing = vanishing_polynomial(zs);
    let interpolant = lagrange_interpolate(zs, ys)?;
    let div = p.sub(&interpolant).divide(&vanishing)?;
    if !div.is_exact() {
        return Err(KzgError::InvalidEvaluation);
    }
    debug!(
        poly_len = p.len(),
        points = zs.len(),
        quotient_len = div.quotient.len(),
        "batch evaluation proof"
    );
    Ok(BatchEvaluationProof(evaluate_g1(setup, &div.quotient)?.into_affine()))
}

/// Reject polynomials longer than the setup before doing any division work.
fn check_fits(setup: &TrustedSetup, p: &Polynomial) -> Result<(), KzgError> {
    if p.len() > setup.size() {
        return Err(KzgError::SetupTooSmall { poly_len: p.len(), setup_len: setup.size() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::Group;
    use ark_ff::One;
    use rand::{rngs::StdRng, SeedableRng};

    /// Setup whose secret is known to the test, so `[p(s)]₁` can be
    /// checked directly against `p(s)·G`.
    fn known_secret_setup(size: usize, s: F) -> TrustedSetup {
        let g1 = G1Projective::generator();
        let g2 = G2Projective::generator();
        let powers: Vec<F> = (0..size).map(|i| crate::field::pow(s, i as u64)).collect();
        TrustedSetup::from_parts(
            powers.iter().map(|p| (g1 * p).into_affine()).collect(),
            powers.iter().map(|p| (g2 * p).into_affine()).collect(),
        )
        .unwrap()
    }

    fn g1_times(x: F) -> G1Affine {
        (G1Projective::generator() * x).into_affine()
    }

    #[test]
    fn commitment_encodes_evaluation_at_secret() {
        let s = F::from(3u64);
        let setup = known_secret_setup(4, s);
        // x³ + x − x² − 1
        let p = Polynomial::from_coeffs(vec![-F::from(1u64), F::from(1u64), -F::from(1u64), F::from(1u64)]);
        let c = commit(&setup, &p).unwrap();
        assert_eq!(c.0, g1_times(p.eval_at(s)));
    }

    #[test]
    fn witness_encodes_quotient_at_secret() {
        let s = F::from(3u64);
        let setup = known_secret_setup(4, s);
        // x³ + x − x² − 1 at z = 2 gives y = 5 and q(x) = x² + x + 3.
        let p = Polynomial::from_coeffs(vec![-F::from(1u64), F::from(1u64), -F::from(1u64), F::from(1u64)]);
        let z = F::from(2u64);
        let (y, proof) = open_at(&setup, &p, z).unwrap();
        assert_eq!(y, F::from(5u64));
        let q = Polynomial::from_u64(&[3, 1, 1]);
        assert_eq!(proof.0, g1_times(q.eval_at(s)));
    }

    #[test]
    fn false_claim_is_rejected() {
        let setup = TrustedSetup::generate_with_rng(4, &mut StdRng::seed_from_u64(5)).unwrap();
        let p = Polynomial::from_u64(&[5, 1, 0, 1]);
        let err = evaluation_proof(&setup, &p, F::from(3u64), F::from(36u64)).unwrap_err();
        assert!(matches!(err, KzgError::InvalidEvaluation));
    }

    #[test]
    fn setup_size_is_enforced() {
        let setup = TrustedSetup::generate_with_rng(3, &mut StdRng::seed_from_u64(6)).unwrap();
        let p = Polynomial::from_u64(&[5, 1, 0, 1]);
        assert!(matches!(
            commit(&setup, &p),
            Err(KzgError::SetupTooSmall { poly_len: 4, setup_len: 3 })
        ));
        assert!(matches!(
            evaluation_proof(&setup, &p, F::from(3u64), F::from(35u64)),
            Err(KzgError::SetupTooSmall { .. })
        ));
    }

    #[test]
    fn batch_preconditions() {
        let setup = TrustedSetup::generate_with_rng(6, &mut StdRng::seed_from_u64(7)).unwrap();
        let p = Polynomial::from_u64(&[5, 1, 0, 1, 10]);
        let zs = [F::from(3u64), F::from(10u64)];

        let err = evaluation_batch_proof(&setup, &p, &zs, &[F::one()]).unwrap_err();
        assert!(matches!(err, KzgError::LengthMismatch { zs: 2, ys: 1 }));

        // len(p) = 5 is not > 4 + 1
        let four: Vec<F> = (1..=4u64).map(F::from).collect();
        let ys: Vec<F> = four.iter().map(|z| p.eval_at(*z)).collect();
        let err = evaluation_batch_proof(&setup, &p, &four, &ys).unwrap_err();
        assert!(matches!(err, KzgError::DegreeTooLow { poly_len: 5, points: 4 }));

        let mut ys: Vec<F> = zs.iter().map(|z| p.eval_at(*z)).collect();
        ys[1] += F::one();
        let err = evaluation_batch_proof(&setup, &p, &zs, &ys).unwrap_err();
        assert!(matches!(err, KzgError::InvalidEvaluation));
    }

    #[test]
    fn batch_with_duplicate_points_surfaces_division_by_zero() {
        let setup = TrustedSetup::generate_with_rng(6, &mut StdRng::seed_from_u64(8)).unwrap();
        let p = Polynomial::from_u64(&[5, 1, 0, 1, 10]);
        let zs = [F::from(3u64), F::from(3u64)];
        let ys = [p.eval_at(zs[0]), p.eval_at(zs[1])];
        let err = evaluation_batch_proof(&setup, &p, &zs, &ys).unwrap_err();
        assert!(matches!(
            err,
            KzgError::Interpolation(InterpolationError::Poly(PolyError::DivisionByZero))
        ));
    }

    #[test]
    fn batch_witness_encodes_quotient_at_secret() {
        let s = F::from(7u64);
        let setup = known_secret_setup(5, s);
        let p = Polynomial::from_u64(&[5, 1, 0, 1, 10]);
        let zs = [F::from(3u64), F::from(10u64), F::from(256u64)];
        let ys: Vec<F> = zs.iter().map(|z| p.eval_at(*z)).collect();
        let proof = evaluation_batch_proof(&setup, &p, &zs, &ys).unwrap();

        let i_s = lagrange_interpolate(&zs, &ys).unwrap().eval_at(s);
        let z_s = vanishing_polynomial(&zs).eval_at(s);
        let q_s = (p.eval_at(s) - i_s) * crate::field::inv(z_s).unwrap();
        assert_eq!(proof.0, g1_times(q_s));
    }

    #[test]
    fn zero_coefficients_contribute_nothing() {
        let setup = TrustedSetup::generate_with_rng(4, &mut StdRng::seed_from_u64(9)).unwrap();
        let a = Polynomial::from_u64(&[5, 1]);
        let b = Polynomial::from_u64(&[5, 1, 0, 0]);
        assert_eq!(commit(&setup, &a).unwrap(), commit(&setup, &b).unwrap());
        assert!(commit(&setup, &Polynomial::default()).unwrap().0.infinity);
    }
}
