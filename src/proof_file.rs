//! Proof bundle written by `prover` and read by `verifier`
//!
//! ```text
//! magic: b"KZGPRF1\0" (8 bytes) + u16 BE version (=1) + ark-compressed `ProofFile`
//! ```
//!
//! The bundle carries the claim (`zs`, `ys`), the commitment, the witness
//! point, and the BLAKE3 digests of the setup it was produced under. A
//! verifier holding a different setup can tell before running any pairing.

#![forbid(unsafe_code)]

use std::path::Path;

use ark_bn254::G1Affine;
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, Read, SerializationError, Valid, Validate,
    Write,
};

use crate::pcs::{BatchEvaluationProof, Commitment, EvaluationProof};
use crate::srs_setup::{SrsSetupError, TrustedSetup};
use crate::verifier::{verify, verify_batch};
use crate::F;

/// 8-byte magic: "KZGPRF1" + NUL terminator.
const FILE_MAGIC: &[u8; 8] = b"KZGPRF1\0";
const FILE_VERSION: u16 = 1;

/// Errors produced while building, writing or reading a proof file.
#[derive(Debug, thiserror::Error)]
pub enum ProofFileError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file does not start with `KZGPRF1\0`.
    #[error("bad proof file: missing magic header")]
    BadMagic,
    /// The header names a format version this build cannot read.
    #[error("unsupported proof version: got {got}, support {supported}")]
    Version {
        /// Version found in the file.
        got: u16,
        /// Version this build writes and reads.
        supported: u16,
    },
    /// The compressed payload is malformed, truncated or followed by extra bytes.
    #[error("malformed proof payload: {0}")]
    Payload(String),
    /// A `Single` bundle with other than one point.
    #[error("single-point proof must carry exactly one point, found {0}")]
    PointCount(usize),
    /// The setup digests could not be computed.
    #[error(transparent)]
    Setup(#[from] SrsSetupError),
}

/// Which opening the witness proves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofKind {
    /// One `(z, y)` pair, checked with `verify`.
    Single,
    /// Several pairs, checked with `verify_batch`.
    Batch,
}

// Manual canonical ser/de so the derive on `ProofFile` can include the kind.
impl CanonicalSerialize for ProofKind {
    fn serialize_with_mode<W: Write>(
        &self,
        mut w: W,
        _cm: Compress,
    ) -> Result<(), SerializationError> {
        let byte = match self {
            ProofKind::Single => 0u8,
            ProofKind::Batch => 1u8,
        };
        w.write_all(&[byte])?;
        Ok(())
    }
    fn serialized_size(&self, _cm: Compress) -> usize {
        1
    }
}
impl CanonicalDeserialize for ProofKind {
    fn deserialize_with_mode<R: Read>(
        mut r: R,
        _cm: Compress,
        _validate: Validate,
    ) -> Result<Self, SerializationError> {
        let mut b = [0u8; 1];
        r.read_exact(&mut b)?;
        match b[0] {
            0 => Ok(ProofKind::Single),
            1 => Ok(ProofKind::Batch),
            _ => Err(SerializationError::InvalidData),
        }
    }
}
impl Valid for ProofKind {
    fn check(&self) -> Result<(), SerializationError> {
        Ok(())
    }
}

/// Everything a verifier needs besides the setup itself.
#[derive(Debug, Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct ProofFile {
    /// `TrustedSetup::g1_digest` of the setup used by the prover.
    pub setup_g1_digest: [u8; 32],
    /// `TrustedSetup::g2_digest` of the setup used by the prover.
    pub setup_g2_digest: [u8; 32],
    /// Commitment to the polynomial being opened.
    pub commitment: Commitment,
    /// Evaluation points.
    pub zs: Vec<F>,
    /// Claimed values, aligned with `zs`.
    pub ys: Vec<F>,
    /// Which check `witness` is for.
    pub kind: ProofKind,
    /// The proof point `[q(s)]₁`.
    pub witness: G1Affine,
}

impl ProofFile {
    /// Bundle a single-point opening made under `setup`.
    pub fn single(
        setup: &TrustedSetup,
        commitment: Commitment,
        z: F,
        y: F,
        proof: EvaluationProof,
    ) -> Result<Self, ProofFileError> {
        Ok(Self {
            setup_g1_digest: setup.g1_digest()?,
            setup_g2_digest: setup.g2_digest()?,
            commitment,
            zs: vec![z],
            ys: vec![y],
            kind: ProofKind::Single,
            witness: proof.0,
        })
    }

    /// Bundle a multi-point opening made under `setup`.
    pub fn batch(
        setup: &TrustedSetup,
        commitment: Commitment,
        zs: Vec<F>,
        ys: Vec<F>,
        proof: BatchEvaluationProof,
    ) -> Result<Self, ProofFileError> {
        Ok(Self {
            setup_g1_digest: setup.g1_digest()?,
            setup_g2_digest: setup.g2_digest()?,
            commitment,
            zs,
            ys,
            kind: ProofKind::Batch,
            witness: proof.0,
        })
    }

    /// `true` when both digests match `setup`. A setup whose digest cannot
    /// be computed never matches.
    pub fn matches_setup(&self, setup: &TrustedSetup) -> bool {
        match (setup.g1_digest(), setup.g2_digest()) {
            (Ok(g1), Ok(g2)) => self.setup_g1_digest == g1 && self.setup_g2_digest == g2,
            _ => false,
        }
    }

    /// Run the pairing check for this bundle's kind.
    pub fn verify(&self, setup: &TrustedSetup) -> bool {
        match self.kind {
            ProofKind::Single => match (self.zs.as_slice(), self.ys.as_slice()) {
                ([z], [y]) => verify(setup, &self.commitment, &EvaluationProof(self.witness), *z, *y),
                _ => false,
            },
            ProofKind::Batch => verify_batch(
                setup,
                &self.commitment,
                &BatchEvaluationProof(self.witness),
                &self.zs,
                &self.ys,
            ),
        }
    }

    /// Magic, version and compressed payload.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProofFileError> {
        let mut out = Vec::with_capacity(10 + self.compressed_size());
        out.extend_from_slice(FILE_MAGIC);
        out.extend_from_slice(&FILE_VERSION.to_be_bytes());
        self.serialize_compressed(&mut out)
            .map_err(|e| ProofFileError::Payload(e.to_string()))?;
        Ok(out)
    }

    /// Parse the output of [`to_bytes`](Self::to_bytes), rejecting trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProofFileError> {
        let rest = bytes.strip_prefix(FILE_MAGIC.as_slice()).ok_or(ProofFileError::BadMagic)?;
        if rest.len() < 2 {
            return Err(ProofFileError::Payload("truncated version field".into()));
        }
        let got = u16::from_be_bytes([rest[0], rest[1]]);
        if got != FILE_VERSION {
            return Err(ProofFileError::Version { got, supported: FILE_VERSION });
        }
        let mut payload = &rest[2..];
        let file = ProofFile::deserialize_compressed(&mut payload)
            .map_err(|e| ProofFileError::Payload(e.to_string()))?;
        if !payload.is_empty() {
            return Err(ProofFileError::Payload(format!("{} trailing bytes", payload.len())));
        }
        if file.kind == ProofKind::Single && file.zs.len() != 1 {
            return Err(ProofFileError::PointCount(file.zs.len()));
        }
        Ok(file)
    }

    /// Write the bundle to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProofFileError> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Read and parse a bundle from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProofFileError> {
        Self::from_bytes(&std::fs::read(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcs::{commit, evaluation_batch_proof, open_at};
    use crate::poly::Polynomial;
    use ark_ff::One;
    use rand::{rngs::StdRng, SeedableRng};

    fn setup(seed: u64) -> TrustedSetup {
        TrustedSetup::generate_with_rng(6, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    fn single_bundle(ts: &TrustedSetup) -> ProofFile {
        let p = Polynomial::from_u64(&[5, 1, 0, 1]);
        let c = commit(ts, &p).unwrap();
        let z = F::from(3u64);
        let (y, proof) = open_at(ts, &p, z).unwrap();
        ProofFile::single(ts, c, z, y, proof).unwrap()
    }

    #[test]
    fn single_bundle_survives_disk() {
        let ts = setup(1);
        let bundle = single_bundle(&ts);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proof.bin");
        bundle.save(&path).unwrap();
        let back = ProofFile::load(&path).unwrap();
        assert_eq!(back, bundle);
        assert!(back.matches_setup(&ts));
        assert!(back.verify(&ts));
    }

    #[test]
    fn batch_bundle_verifies_and_detects_other_setup() {
        let ts = setup(2);
        let p = Polynomial::from_u64(&[5, 1, 0, 1, 10]);
        let c = commit(&ts, &p).unwrap();
        let zs = vec![F::from(3u64), F::from(10u64), F::from(256u64)];
        let ys: Vec<F> = zs.iter().map(|z| p.eval_at(*z)).collect();
        let proof = evaluation_batch_proof(&ts, &p, &zs, &ys).unwrap();
        let mut bundle = ProofFile::batch(&ts, c, zs, ys, proof).unwrap();
        assert!(bundle.verify(&ts));

        let other = setup(3);
        assert!(!bundle.matches_setup(&other));
        assert!(!bundle.verify(&other));

        bundle.ys[0] += F::one();
        assert!(!bundle.verify(&ts));
    }

    #[test]
    fn header_and_payload_are_checked() {
        let ts = setup(4);
        let bytes = single_bundle(&ts).to_bytes().unwrap();

        let mut bad_magic = bytes.clone();
        bad_magic[0] ^= 0xff;
        assert!(matches!(ProofFile::from_bytes(&bad_magic), Err(ProofFileError::BadMagic)));

        let mut bad_version = bytes.clone();
        bad_version[9] = 9;
        assert!(matches!(
            ProofFile::from_bytes(&bad_version),
            Err(ProofFileError::Version { got: 9, .. })
        ));

        let mut trailing = bytes.clone();
        trailing.push(0);
        assert!(matches!(ProofFile::from_bytes(&trailing), Err(ProofFileError::Payload(_))));

        assert!(matches!(
            ProofFile::from_bytes(&bytes[..bytes.len() - 1]),
            Err(ProofFileError::Payload(_))
        ));
    }

    #[test]
    fn single_kind_requires_one_point() {
        let ts = setup(5);
        let mut bundle = single_bundle(&ts);
        bundle.zs.push(F::one());
        bundle.ys.push(F::one());
        assert!(!bundle.verify(&ts));
        let bytes = bundle.to_bytes().unwrap();
        assert!(matches!(ProofFile::from_bytes(&bytes), Err(ProofFileError::PointCount(2))));
    }

    #[test]
    fn kind_is_one_tag_byte() {
        for (kind, tag) in [(ProofKind::Single, 0u8), (ProofKind::Batch, 1u8)] {
            let mut bytes = Vec::new();
            kind.serialize_compressed(&mut bytes).unwrap();
            assert_eq!(bytes, vec![tag]);
            assert_eq!(ProofKind::deserialize_compressed(&bytes[..]).unwrap(), kind);
        }
        assert!(ProofKind::deserialize_compressed(&[2u8][..]).is_err());
        assert!(ProofKind::deserialize_compressed(&[][..]).is_err());
    }
}
