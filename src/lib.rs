//! Crate root: public surface and core aliases
//!
//! `tinykzg` implements the KZG polynomial commitment scheme over BN254:
//! a trusted setup of powers of a secret `s` in G1 and G2, commitments to
//! coefficient-form polynomials, and single- and multi-point evaluation
//! proofs checked with one pairing equation each.
//!
//! ## Invariants
//!
//! - **Field & Curve.** Scalars are `ark_bn254::Fr` (`F`), always canonical in
//!   `[0, R)`. Commitments and proofs live in `G1 = ark_bn254::G1Affine`; the
//!   setup's second half lives in `G2 = ark_bn254::G2Affine`. The crate
//!   **forbids unsafe**.
//!
//! - **Polynomials are never trimmed.** A polynomial is its stored coefficient
//!   vector, trailing zeros included. Size checks against the setup (and the
//!   batch-proof degree requirement) use that stored length.
//!
//! - **Fallible proving, infallible verifying.** Commitment and proof
//!   generation return precise errors (`KzgError`); verification answers
//!   `true`/`false` and never panics on malformed input.
//!
//! ```
//! use tinykzg::{commit, evaluation_proof, verify, Polynomial, TrustedSetup, F};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let setup = TrustedSetup::generate_with_rng(4, &mut StdRng::seed_from_u64(1)).unwrap();
//! let p = Polynomial::from_u64(&[5, 1, 0, 1]); // x³ + x + 5
//! let c = commit(&setup, &p).unwrap();
//! let proof = evaluation_proof(&setup, &p, F::from(3u64), F::from(35u64)).unwrap();
//! assert!(verify(&setup, &c, &proof, F::from(3u64), F::from(35u64)));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms)]

/// Scalar-field helpers modulo the BN254 group order.
pub mod field;
/// Dense coefficient-form polynomials over `F`.
pub mod poly;
/// Lagrange interpolation and vanishing polynomials.
pub mod interpolation;
/// Trusted setup generation, validation, and persistence.
pub mod srs_setup;
/// Commitments and evaluation proofs (KZG).
pub mod pcs;
/// Pairing checks for single and batch openings.
pub mod verifier;
/// On-disk proof bundle shared by the CLI tools.
pub mod proof_file;

// ============================================================================
// Canonical aliases and root-level re-exports
// ============================================================================

/// Scalar field used across the crate.
pub type F = ark_bn254::Fr;

/// G1 affine group element used for commitments and proofs.
pub type G1 = ark_bn254::G1Affine;

/// G2 affine group element used for the setup's second half.
pub type G2 = ark_bn254::G2Affine;

pub use crate::field::FieldError;
pub use crate::interpolation::{
    lagrange_interpolate, vanishing_polynomial, zero_at, InterpolationError,
};
pub use crate::pcs::{
    commit, evaluation_batch_proof, evaluation_proof, open_at, BatchEvaluationProof, Commitment,
    EvaluationProof, KzgError,
};
pub use crate::poly::{Division, PolyError, Polynomial};
pub use crate::srs_setup::{SrsSetupError, TrustedSetup};
pub use crate::verifier::{verify, verify_batch};
