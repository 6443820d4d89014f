//! Trusted setup (structured reference string) generation and management
//!
//! # What is the setup?
//!
//! For a secret scalar `s` and size `n` the setup is the pair of sequences
//!
//! ```text
//! Tau1 = [s⁰·G, s¹·G, …, sⁿ⁻¹·G]   (G the BN254 G1 generator)
//! Tau2 = [s⁰·H, s¹·H, …, sⁿ⁻¹·H]   (H the BN254 G2 generator)
//! ```
//!
//! A setup of size `n` supports commitments to polynomials with at most `n`
//! coefficients. Verification reads `Tau2[1] = [s]₂`, so `n ≥ 2`.
//!
//! # Security model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  SECURITY ASSUMPTION: s is unknown and destroyed            │
//! │                                                             │
//! │  IF attacker knows s:                                       │
//! │    → Can open a commitment to any value at any point        │
//! │    → Can create false proofs that verify                    │
//! │                                                             │
//! │  MITIGATION: draw s from OsRng, never persist it            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! `s` is held in a `ToxicWaste` guard that zeroizes on drop, so it is wiped
//! on every exit path out of [`TrustedSetup::generate_with_rng`], including
//! the early return when the entropy source fails. The returned
//! [`TrustedSetup`] holds curve points only.
//!
//! # File format
//!
//! ```text
//! magic   b"KZGSRS1\0"                       (8 bytes)
//! version u16 big-endian (= 1)
//! tau1    Vec<G1Affine>, arkworks compressed
//! tau2    Vec<G2Affine>, arkworks compressed
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use tinykzg::srs_setup::TrustedSetup;
//!
//! let setup = TrustedSetup::generate(1024)?;
//! setup.save("setup.bin")?;
//!
//! let loaded = TrustedSetup::load("setup.bin")?;
//! assert_eq!(setup.g1_digest()?, loaded.g1_digest()?);
//! # Ok::<(), tinykzg::srs_setup::SrsSetupError>(())
//! ```

#![forbid(unsafe_code)]

use ark_bn254::{Bn254, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, Group};
use ark_ff::{One, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use blake3::Hasher;
use rand::{rngs::OsRng, CryptoRng, RngCore};
use std::path::Path;
use tracing::{debug, info};
use zeroize::Zeroize;

use crate::{field, F};

const FILE_MAGIC: &[u8; 8] = b"KZGSRS1\0";
const FILE_VERSION: u16 = 1;

/// Smallest usable setup: `[s⁰]` plus the `[s]₂` the verifier needs.
pub const MIN_SETUP_SIZE: usize = 2;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during setup generation, persistence and validation.
#[derive(Debug, thiserror::Error)]
pub enum SrsSetupError {
    /// File I/O error (file not found, permissions, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The secure randomness source failed while drawing the secret.
    #[error("randomness source failed: {0}")]
    Randomness(#[from] rand::Error),

    /// Failed to (de)serialize the setup
    #[error("serialization error: {0}")]
    Deserialize(String),

    /// Setup failed structural validation
    #[error("setup validation failed: {0}")]
    Validation(String),

    /// Pairing check failed (corrupted or inconsistent setup)
    #[error("pairing check failed: {0}")]
    PairingCheck(String),
}

// ============================================================================
// Secret handling
// ============================================================================

/// Scoped holder for the setup secret and its running powers.
struct ToxicWaste(F);

impl ToxicWaste {
    /// Sample a nonzero secret directly into the guard, redrawing on zero
    /// (which would collapse every power onto the identity).
    fn draw<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, rand::Error> {
        let mut secret = ToxicWaste(F::zero());
        while secret.0.is_zero() {
            field::fill_random(rng, &mut secret.0)?;
        }
        Ok(secret)
    }
}

impl Drop for ToxicWaste {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

// ============================================================================
// The setup
// ============================================================================

/// Powers of the secret in both pairing groups.
#[derive(Debug, Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct TrustedSetup {
    tau1: Vec<G1Affine>,
    tau2: Vec<G2Affine>,
}

impl TrustedSetup {
    /// Draw a fresh secret from the operating system's CSPRNG and expand it
    /// into a setup of `size` powers.
    pub fn generate(size: usize) -> Result<Self, SrsSetupError> {
        Self::generate_with_rng(size, &mut OsRng)
    }

    /// Same as [`generate`](Self::generate) with a caller-supplied CSPRNG.
    pub fn generate_with_rng<R: RngCore + CryptoRng>(
        size: usize,
        rng: &mut R,
    ) -> Result<Self, SrsSetupError> {
        check_size(size)?;
        let secret = ToxicWaste::draw(rng)?;
        info!(size, "generating trusted setup");
        Ok(Self::expand(size, &secret))
    }

    /// Deterministic setup from a fixed seed. The secret is publicly
    /// reproducible, so anything committed under it can be forged.
    #[cfg(feature = "dev-srs")]
    pub fn dev(size: usize) -> Result<Self, SrsSetupError> {
        use rand::{rngs::StdRng, SeedableRng};

        tracing::warn!(size, "generating DEVELOPMENT setup (seed=42, secret is PUBLIC)");
        let mut rng = StdRng::from_seed([42u8; 32]);
        Self::generate_with_rng(size, &mut rng)
    }

    fn expand(size: usize, secret: &ToxicWaste) -> Self {
        let g1_gen = G1Projective::generator();
        let g2_gen = G2Projective::generator();

        let mut g1 = Vec::with_capacity(size);
        let mut g2 = Vec::with_capacity(size);
        let mut power = ToxicWaste(F::one());
        for i in 0..size {
            g1.push(g1_gen * power.0);
            g2.push(g2_gen * power.0);
            power.0 *= secret.0;

            if i > 0 && i % 1024 == 0 {
                debug!(done = i, total = size, "setup powers");
            }
        }

        Self {
            tau1: G1Projective::normalize_batch(&g1),
            tau2: G2Projective::normalize_batch(&g2),
        }
    }

    /// Assemble a setup from externally produced powers (e.g. a ceremony
    /// transcript) after structural validation.
    pub fn from_parts(tau1: Vec<G1Affine>, tau2: Vec<G2Affine>) -> Result<Self, SrsSetupError> {
        let setup = Self { tau1, tau2 };
        setup.validate()?;
        Ok(setup)
    }

    /// `[sⁱ]₁` for `i` in `0..size`.
    #[inline]
    pub fn tau1(&self) -> &[G1Affine] {
        &self.tau1
    }

    /// `[sⁱ]₂` for `i` in `0..size`.
    #[inline]
    pub fn tau2(&self) -> &[G2Affine] {
        &self.tau2
    }

    /// Number of powers `n`; polynomials of up to `n` coefficients fit.
    #[inline]
    pub fn size(&self) -> usize {
        self.tau1.len()
    }

    /// `[s]₂`, the only G2 power single-point verification needs.
    #[inline]
    pub fn s_g2(&self) -> Option<G2Affine> {
        self.tau2.get(1).copied()
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Structural checks: equal lengths `≥ 2`, generators at index 0 and a
    /// non-identity `[s]₂`.
    pub fn validate(&self) -> Result<(), SrsSetupError> {
        if self.tau1.len() != self.tau2.len() {
            return Err(SrsSetupError::Validation(format!(
                "Tau1 has {} powers but Tau2 has {}",
                self.tau1.len(),
                self.tau2.len()
            )));
        }
        check_size(self.tau1.len())?;
        if self.tau1[0] != G1Affine::generator() {
            return Err(SrsSetupError::Validation(
                "Tau1[0] is not the G1 generator (possible corruption or wrong curve)".into(),
            ));
        }
        if self.tau2[0] != G2Affine::generator() {
            return Err(SrsSetupError::Validation(
                "Tau2[0] is not the G2 generator (possible corruption or wrong curve)".into(),
            ));
        }
        // [s]₂ at infinity would mean s = 0.
        if self.tau2[1].is_zero() {
            return Err(SrsSetupError::Validation("Tau2[1] is the point at infinity".into()));
        }
        Ok(())
    }

    /// Pairing consistency of every power (2 pairings per index, expensive).
    ///
    /// Checks `e(Tau1[i], H) = e(G, Tau2[i])` so both sequences encode the
    /// same scalars, and `e(Tau1[i+1], H) = e(Tau1[i], [s]₂)` so consecutive
    /// entries differ by a factor of `s`.
    pub fn validate_pairing(&self) -> Result<(), SrsSetupError> {
        self.validate()?;
        let g1 = G1Affine::generator();
        let h = G2Affine::generator();
        let s2 = self.tau2[1];

        for (i, (p1, p2)) in self.tau1.iter().zip(&self.tau2).enumerate() {
            if Bn254::pairing(*p1, h) != Bn254::pairing(g1, *p2) {
                return Err(SrsSetupError::PairingCheck(format!(
                    "Tau1[{i}] and Tau2[{i}] encode different scalars"
                )));
            }
        }
        for (i, pair) in self.tau1.windows(2).enumerate() {
            if Bn254::pairing(pair[1], h) != Bn254::pairing(pair[0], s2) {
                return Err(SrsSetupError::PairingCheck(format!(
                    "Tau1[{}] is not s·Tau1[{i}]",
                    i + 1
                )));
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Digests
    // ------------------------------------------------------------------------

    /// BLAKE3 digest of the G1 powers (length-prefixed compressed points).
    pub fn g1_digest(&self) -> Result<[u8; 32], SrsSetupError> {
        hash_points(b"G1", &self.tau1)
    }

    /// BLAKE3 digest of the G2 powers.
    pub fn g2_digest(&self) -> Result<[u8; 32], SrsSetupError> {
        hash_points(b"G2", &self.tau2)
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Magic, version and both compressed point sequences.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SrsSetupError> {
        let mut bytes = Vec::with_capacity(10 + self.compressed_size());
        bytes.extend_from_slice(FILE_MAGIC);
        bytes.extend_from_slice(&FILE_VERSION.to_be_bytes());
        self.serialize_compressed(&mut bytes)
            .map_err(|e| SrsSetupError::Deserialize(format!("setup serialize: {e}")))?;
        Ok(bytes)
    }

    /// Parse and structurally validate a serialized setup.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SrsSetupError> {
        let body = bytes
            .strip_prefix(FILE_MAGIC.as_slice())
            .ok_or_else(|| SrsSetupError::Deserialize("missing setup magic header".into()))?;
        if body.len() < 2 {
            return Err(SrsSetupError::Deserialize("truncated setup header".into()));
        }
        let version = u16::from_be_bytes([body[0], body[1]]);
        if version != FILE_VERSION {
            return Err(SrsSetupError::Deserialize(format!(
                "unsupported setup version: got {version}, support {FILE_VERSION}"
            )));
        }
        let mut rest = &body[2..];
        // Point validity (on curve, in subgroup) is enforced by deserialization.
        let setup = Self::deserialize_compressed(&mut rest)
            .map_err(|e| SrsSetupError::Deserialize(format!("setup: {e}")))?;
        if !rest.is_empty() {
            return Err(SrsSetupError::Deserialize(format!(
                "{} trailing bytes after setup",
                rest.len()
            )));
        }
        setup.validate()?;
        Ok(setup)
    }

    /// Write the setup to `path` in the `KZGSRS1` format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SrsSetupError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        std::fs::write(path, &bytes)?;
        info!(path = %path.display(), size = self.size(), bytes = bytes.len(), "saved trusted setup");
        Ok(())
    }

    /// Read, parse and structurally validate a setup file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SrsSetupError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let setup = Self::from_bytes(&bytes)?;
        info!(path = %path.display(), size = setup.size(), "loaded trusted setup");
        Ok(setup)
    }
}

fn check_size(size: usize) -> Result<(), SrsSetupError> {
    if size < MIN_SETUP_SIZE {
        return Err(SrsSetupError::Validation(format!(
            "setup needs at least {MIN_SETUP_SIZE} powers, got {size}"
        )));
    }
    Ok(())
}

fn hash_points<P: CanonicalSerialize>(group: &[u8], points: &[P]) -> Result<[u8; 32], SrsSetupError> {
    let mut h = Hasher::new();
    h.update(b"TINYKZG.SRS.v1");
    h.update(group);
    h.update(&(points.len() as u64).to_be_bytes());
    let mut tmp = Vec::new();
    for (i, p) in points.iter().enumerate() {
        tmp.clear();
        p.serialize_compressed(&mut tmp)
            .map_err(|e| SrsSetupError::Deserialize(format!("digest point {i}: {e}")))?;
        h.update(&(tmp.len() as u64).to_be_bytes());
        h.update(&tmp);
    }
    Ok(*h.finalize().as_bytes())
}

// ============================================================================
// Tests
// ============================================================================
