//! Minimal CLI verifier
//!
//! Reads a proof file written by `prover`:
//!   magic: b"KZGPRF1\0" (8 bytes) + u16 version (=1) + ark-compressed `ProofFile`
//!
//! and checks it against a persisted setup. The process exits non-zero when
//! the proof is rejected.
//!
//! Usage:
//!   verifier --setup setup.bin --proof proof.bin

#![forbid(unsafe_code)]

use std::env;

use tinykzg::{field, proof_file::ProofFile, TrustedSetup};
use tracing::info;

fn parse_flag(args: &[String], key: &str) -> Option<String> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == key {
            return it.next().cloned();
        }
    }
    None
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "tinykzg=info".into()))
        .with_target(false)
        .compact()
        .init();

    let args: Vec<String> = env::args().collect();
    let setup_path =
        parse_flag(&args, "--setup").ok_or_else(|| anyhow::anyhow!("--setup PATH is required"))?;
    let proof_path = parse_flag(&args, "--proof").unwrap_or_else(|| "proof.bin".into());

    // ============================================================================
    // Setup + proof loading
    // ============================================================================

    eprintln!("Loading setup from {}...", setup_path);
    let setup = TrustedSetup::load(&setup_path)
        .map_err(|e| anyhow::anyhow!("failed to load/validate setup {setup_path}: {e}"))?;
    eprintln!("✓ Loaded and validated {} powers", setup.size());

    eprintln!("Reading proof from {}...", proof_path);
    let bundle = ProofFile::load(&proof_path)
        .map_err(|e| anyhow::anyhow!("read proof {proof_path}: {e}"))?;
    eprintln!("✓ Proof file parsed ({:?}, {} point(s))", bundle.kind, bundle.zs.len());

    // Digests are the only binding between the proof and the local setup.
    if !bundle.matches_setup(&setup) {
        eprintln!("ERROR: setup digest mismatch!");
        eprintln!("  Proof expects G1: {}", hex::encode(bundle.setup_g1_digest));
        if let Ok(local) = setup.g1_digest() {
            eprintln!("  Loaded setup G1:  {}", hex::encode(local));
        }
        return Err(anyhow::anyhow!("proof was generated under a different setup"));
    }

    // ============================================================================
    // Pairing check
    // ============================================================================

    for (z, y) in bundle.zs.iter().zip(&bundle.ys) {
        eprintln!("  claim: p({}) = {}", field::to_decimal(z), field::to_decimal(y));
    }
    if bundle.verify(&setup) {
        info!(points = bundle.zs.len(), "proof accepted");
        println!("✅ Verification succeeded");
        Ok(())
    } else {
        println!("❌ Verification failed");
        Err(anyhow::anyhow!("proof rejected"))
    }
}
