//! Minimal CLI prover
//!
//! Commits to a coefficient-form polynomial and proves its values at one or
//! more points. With one point a single-opening proof is written, with several
//! a batch proof.
//!
//! Writes a strict, versioned proof file:
//!   magic: b"KZGPRF1\0" (8 bytes) + u16 version (=1) + ark-compressed `ProofFile`
//!
//! Usage:
//!   prover --setup setup.bin --coeffs 5,1,0,1 --points 3 --out proof.bin
//!   prover --setup setup.bin --coeffs 5,1,0,1,10 --points 3,10,256
//!
//! Coefficients are low → high and may be negative (`-1` maps to `R − 1`).
//! With the `dev-srs` feature, `--setup` may be omitted and an insecure
//! deterministic setup of `--dev-size` powers is used.

#![forbid(unsafe_code)]

use std::{env, path::PathBuf};

use anyhow::Context;
use tinykzg::{
    commit, evaluation_batch_proof, field, open_at, proof_file::ProofFile, Polynomial,
    TrustedSetup, F,
};
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

/// Comma- or whitespace-separated integers; a leading `-` negates mod `R`.
fn parse_scalars(s: &str) -> anyhow::Result<Vec<F>> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tok| !tok.is_empty())
        .map(|tok| match tok.strip_prefix('-') {
            Some(mag) => field::from_decimal(mag).map(|v| -v),
            None => field::from_decimal(tok),
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("{e}"))
}

fn load_setup(args: &[String]) -> anyhow::Result<TrustedSetup> {
    if let Some(path) = parse_flag(args, "--setup") {
        eprintln!("Loading setup from {}...", path);
        let setup = TrustedSetup::load(&path)
            .map_err(|e| anyhow::anyhow!("failed to load/validate setup {path}: {e}"))?;
        eprintln!("✓ Loaded and validated {} powers", setup.size());
        return Ok(setup);
    }

    fallback_setup(args)
}

#[cfg(feature = "dev-srs")]
fn fallback_setup(args: &[String]) -> anyhow::Result<TrustedSetup> {
    let size: usize = parse_flag(args, "--dev-size")
        .map(|s| s.parse::<usize>())
        .transpose()
        .context("--dev-size must be an integer")?
        .unwrap_or(64);
    eprintln!("(dev-srs) Using deterministic in-crate setup.");
    eprintln!("⚠️  WARNING: Dev setup is NOT SECURE - for testing only!");
    TrustedSetup::dev(size).map_err(|e| anyhow::anyhow!("dev setup: {e}"))
}

#[cfg(not(feature = "dev-srs"))]
fn fallback_setup(_args: &[String]) -> anyhow::Result<TrustedSetup> {
    Err(anyhow::anyhow!(
        "--setup PATH is required.\n\
         Generate one with `generate_setup --size N --out PATH`,\n\
         or rebuild with --features dev-srs for an insecure test setup."
    ))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "tinykzg=info".into()))
        .with_target(false)
        .compact()
        .init();

    let args: Vec<String> = env::args().collect();
    let coeffs = parse_flag(&args, "--coeffs")
        .ok_or_else(|| anyhow::anyhow!("--coeffs c0,c1,... is required"))?;
    let points = parse_flag(&args, "--points")
        .ok_or_else(|| anyhow::anyhow!("--points z0[,z1,...] is required"))?;
    let out = PathBuf::from(parse_flag(&args, "--out").unwrap_or_else(|| "proof.bin".into()));

    let p = Polynomial::from_coeffs(parse_scalars(&coeffs).context("parse --coeffs")?);
    let zs = parse_scalars(&points).context("parse --points")?;
    if zs.is_empty() {
        return Err(anyhow::anyhow!("--points must name at least one point"));
    }

    let setup = load_setup(&args)?;
    let commitment = commit(&setup, &p).map_err(|e| anyhow::anyhow!("commit: {e}"))?;
    eprintln!("✓ Committed to p(x) = {}", p);

    let bundle = if zs.len() == 1 {
        let z = zs[0];
        let (y, proof) = open_at(&setup, &p, z).map_err(|e| anyhow::anyhow!("prove: {e}"))?;
        println!("p({}) = {}", field::to_decimal(&z), field::to_decimal(&y));
        ProofFile::single(&setup, commitment, z, y, proof)
            .map_err(|e| anyhow::anyhow!("bundle proof: {e}"))?
    } else {
        let ys: Vec<F> = zs.iter().map(|z| p.eval_at(*z)).collect();
        for (z, y) in zs.iter().zip(&ys) {
            println!("p({}) = {}", field::to_decimal(z), field::to_decimal(y));
        }
        let proof = evaluation_batch_proof(&setup, &p, &zs, &ys)
            .map_err(|e| anyhow::anyhow!("batch prove: {e}"))?;
        ProofFile::batch(&setup, commitment, zs, ys, proof)
            .map_err(|e| anyhow::anyhow!("bundle proof: {e}"))?
    };

    // --- Emit versioned proof file (magic + version + ark-compressed ProofFile) ---
    bundle
        .save(&out)
        .map_err(|e| anyhow::anyhow!("write {}: {e}", out.display()))?;
    info!(path = %out.display(), points = bundle.zs.len(), "proof written");
    eprintln!("✓ Wrote {}", out.display());

    Ok(())
}
