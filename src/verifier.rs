//! Verifier: pairing checks for KZG openings
//!
//! Both checks compare two pairings against the G2 generator `H`:
//!
//! ```text
//! single: e(π, [s]₂ − [z]₂)   == e(C − [y]₁,   H)
//! batch : e(π, [z(s)]₂)       == e(C − [I(s)]₁, H)
//! ```
//!
//! Verification never errors. Anything that prevents the check from being
//! carried out (setup too small, mismatched lengths, duplicate points) is
//! reported as rejection.

#![forbid(unsafe_code)]

use ark_bn254::{Bn254, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::{pairing::Pairing, AffineRepr, Group};
use tracing::debug;

use crate::interpolation::{lagrange_interpolate, vanishing_polynomial};
use crate::pcs::{evaluate_g1, evaluate_g2, BatchEvaluationProof, Commitment, EvaluationProof};
use crate::srs_setup::TrustedSetup;
use crate::F;

/// Accept iff `proof` shows that the polynomial behind `c` evaluates to `y`
/// at `z`.
pub fn verify(
    setup: &TrustedSetup,
    c: &Commitment,
    proof: &EvaluationProof,
    z: F,
    y: F,
) -> bool {
    let Some(s_g2) = setup.s_g2() else {
        debug!(setup_len = setup.size(), "verify: setup has no [s]₂");
        return false;
    };
    let s_minus_z = s_g2.into_group() - G2Projective::generator() * z;
    let c_minus_y = c.0.into_group() - G1Projective::generator() * y;
    single_opening_holds(proof.0, s_minus_z, c_minus_y)
}

/// Accept iff `proof` shows `p(zsᵢ) = ysᵢ` for every `i` at once.
pub fn verify_batch(
    setup: &TrustedSetup,
    c: &Commitment,
    proof: &BatchEvaluationProof,
    zs: &[F],
    ys: &[F],
) -> bool {
    if zs.len() != ys.len() {
        debug!(zs = zs.len(), ys = ys.len(), "verify_batch: length mismatch");
        return false;
    }
    let z_at_s = match evaluate_g2(setup, &vanishing_polynomial(zs)) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "verify_batch: vanishing polynomial");
            return false;
        }
    };
    let interpolant = match lagrange_interpolate(zs, ys) {
        Ok(p) => p,
        Err(e) => {
            debug!(error = %e, "verify_batch: interpolation");
            return false;
        }
    };
    let i_at_s = match evaluate_g1(setup, &interpolant) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "verify_batch: interpolant");
            return false;
        }
    };
    batch_opening_holds(proof.0, z_at_s, c.0.into_group() - i_at_s)
}

/// `e(π, [s]₂ − [z]₂) == e(C − [y]₁, H)`
pub fn single_opening_holds(
    proof: G1Affine,
    s_minus_z: G2Projective,
    c_minus_y: G1Projective,
) -> bool {
    Bn254::pairing(proof, s_minus_z) == Bn254::pairing(c_minus_y, G2Affine::generator())
}

/// `e(π, [z(s)]₂) == e(C − [I(s)]₁, H)`
pub fn batch_opening_holds(
    proof: G1Affine,
    z_at_s: G2Projective,
    c_minus_i: G1Projective,
) -> bool {
    Bn254::pairing(proof, z_at_s) == Bn254::pairing(c_minus_i, G2Affine::generator())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcs::{commit, evaluation_batch_proof, evaluation_proof, open_at};
    use crate::poly::Polynomial;
    use ark_ec::CurveGroup;
    use ark_ff::One;
    use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn setup(size: usize, seed: u64) -> TrustedSetup {
        TrustedSetup::generate_with_rng(size, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn single_opening_accepts_true_claim_only() {
        let ts = setup(4, 1);
        let p = Polynomial::from_u64(&[5, 1, 0, 1]);
        let c = commit(&ts, &p).unwrap();
        let z = F::from(3u64);
        let y = F::from(35u64);
        let proof = evaluation_proof(&ts, &p, z, y).unwrap();
        assert!(verify(&ts, &c, &proof, z, y));
        assert!(!verify(&ts, &c, &proof, F::from(4u64), y));
        assert!(!verify(&ts, &c, &proof, z, F::from(36u64)));
    }

    #[test]
    fn random_openings_verify() {
        let ts = setup(16, 2);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..8 {
            let len = rng.gen_range(1..=16);
            let p = Polynomial::from_coeffs((0..len).map(|_| F::from(rng.gen::<u64>())).collect());
            let c = commit(&ts, &p).unwrap();
            let z = F::from(rng.gen::<u64>());
            let (y, proof) = open_at(&ts, &p, z).unwrap();
            assert!(verify(&ts, &c, &proof, z, y));
            assert!(!verify(&ts, &c, &proof, z, y + F::one()));
        }
    }

    #[test]
    fn tampered_proof_or_commitment_is_rejected() {
        let ts = setup(4, 4);
        let p = Polynomial::from_u64(&[5, 1, 0, 1]);
        let c = commit(&ts, &p).unwrap();
        let z = F::from(3u64);
        let y = F::from(35u64);
        let proof = evaluation_proof(&ts, &p, z, y).unwrap();

        let shifted = EvaluationProof((proof.0.into_group() + G1Projective::generator()).into_affine());
        assert!(!verify(&ts, &c, &shifted, z, y));

        let other = commit(&ts, &Polynomial::from_u64(&[6, 1, 0, 1])).unwrap();
        assert!(!verify(&ts, &other, &proof, z, y));

        // Flipping a bit either breaks decoding or yields a different point.
        let mut bytes = Vec::new();
        proof.serialize_compressed(&mut bytes).unwrap();
        bytes[0] ^= 1;
        if let Ok(bad) = EvaluationProof::deserialize_compressed(&bytes[..]) {
            assert!(!verify(&ts, &c, &bad, z, y));
        }
    }

    #[test]
    fn every_commitment_bit_flip_is_rejected() {
        let ts = setup(4, 10);
        let p = Polynomial::from_u64(&[5, 1, 0, 1]);
        let c = commit(&ts, &p).unwrap();
        let z = F::from(3u64);
        let y = F::from(35u64);
        let proof = evaluation_proof(&ts, &p, z, y).unwrap();

        let mut bytes = Vec::new();
        c.serialize_compressed(&mut bytes).unwrap();
        let mut decoded = 0;
        for bit in 0..bytes.len() * 8 {
            let mut flipped = bytes.clone();
            flipped[bit / 8] ^= 1 << (bit % 8);
            if let Ok(bad) = Commitment::deserialize_compressed(&flipped[..]) {
                decoded += 1;
                assert_ne!(bad, c);
                assert!(!verify(&ts, &bad, &proof, z, y), "bit {bit} accepted");
            }
        }
        assert!(decoded > 0);
    }

    #[test]
    fn proof_does_not_verify_under_another_setup() {
        let ts = setup(4, 5);
        let other = setup(4, 6);
        let p = Polynomial::from_u64(&[5, 1, 0, 1]);
        let c = commit(&ts, &p).unwrap();
        let proof = evaluation_proof(&ts, &p, F::from(3u64), F::from(35u64)).unwrap();
        assert!(!verify(&other, &c, &proof, F::from(3u64), F::from(35u64)));
    }

    #[test]
    fn batch_opening_is_order_independent() {
        let ts = setup(5, 7);
        let p = Polynomial::from_u64(&[5, 1, 0, 1, 10]);
        let c = commit(&ts, &p).unwrap();
        let zs = [F::from(3u64), F::from(10u64), F::from(256u64)];
        let ys: Vec<F> = zs.iter().map(|z| p.eval_at(*z)).collect();
        let proof = evaluation_batch_proof(&ts, &p, &zs, &ys).unwrap();
        assert!(verify_batch(&ts, &c, &proof, &zs, &ys));

        let zs_perm = [zs[1], zs[2], zs[0]];
        let ys_perm = [ys[1], ys[2], ys[0]];
        assert!(verify_batch(&ts, &c, &proof, &zs_perm, &ys_perm));

        let proof_perm = evaluation_batch_proof(&ts, &p, &zs_perm, &ys_perm).unwrap();
        assert_eq!(proof, proof_perm);
    }

    #[test]
    fn batch_opening_rejects_wrong_points() {
        let ts = setup(5, 8);
        let p = Polynomial::from_u64(&[5, 1, 0, 1, 10]);
        let c = commit(&ts, &p).unwrap();
        let zs = [F::from(3u64), F::from(10u64), F::from(256u64)];
        let ys: Vec<F> = zs.iter().map(|z| p.eval_at(*z)).collect();
        let proof = evaluation_batch_proof(&ts, &p, &zs, &ys).unwrap();

        let swapped = [F::from(10u64), F::from(3u64), F::from(256u64)];
        assert!(!verify_batch(&ts, &c, &proof, &swapped, &ys));

        let far = [F::from(3u64), F::from(10u64), F::from(2500u64)];
        assert!(!verify_batch(&ts, &c, &proof, &far, &ys));
        let far_ys = [ys[0], ys[1], p.eval_at(far[2])];
        assert!(!verify_batch(&ts, &c, &proof, &far, &far_ys));

        assert!(!verify_batch(&ts, &c, &proof, &zs[..2], &ys));
        let dup = [zs[0], zs[0], zs[2]];
        assert!(!verify_batch(&ts, &c, &proof, &dup, &ys));
    }

    #[test]
    fn batch_rejects_when_setup_cannot_hold_vanishing_polynomial() {
        let ts = setup(5, 9);
        let p = Polynomial::from_u64(&[5, 1, 0, 1, 10]);
        let c = commit(&ts, &p).unwrap();
        let zs = [F::from(3u64), F::from(10u64), F::from(256u64)];
        let ys: Vec<F> = zs.iter().map(|z| p.eval_at(*z)).collect();
        let proof = evaluation_batch_proof(&ts, &p, &zs, &ys).unwrap();

        // Vanishing polynomial on five points needs six G2 powers.
        let five: Vec<F> = (1..=5u64).map(F::from).collect();
        let ys5: Vec<F> = five.iter().map(|z| p.eval_at(*z)).collect();
        assert!(!verify_batch(&ts, &c, &proof, &five, &ys5));
    }

    #[test]
    fn equation_helpers_agree_with_known_secret() {
        // With s known, [s − z]₂ and [p(s) − y]₁ can be built directly.
        let s = F::from(11u64);
        let z = F::from(3u64);
        let p = Polynomial::from_u64(&[5, 1, 0, 1]);
        let y = p.eval_at(z);
        let q = p.sub(&Polynomial::constant(y)).divide(&Polynomial::x_minus(z)).unwrap().quotient;
        let proof = (G1Projective::generator() * q.eval_at(s)).into_affine();
        let s_minus_z = G2Projective::generator() * (s - z);
        let c_minus_y = G1Projective::generator() * (p.eval_at(s) - y);
        assert!(single_opening_holds(proof, s_minus_z, c_minus_y));
        assert!(!single_opening_holds(proof, s_minus_z, c_minus_y + G1Projective::generator()));
        assert!(batch_opening_holds(proof, s_minus_z, c_minus_y));
    }
}
