//! Generate a fresh trusted setup
//!
//! Draws the secret `s` from `OsRng`, expands it into `size` powers in both
//! groups, and writes them to `--out` in the `KZGSRS1` format.
//!
//! # Security Model
//!
//! This is a **single-party trusted setup**:
//! - `s` is drawn from OS entropy and lives only inside the library's
//!   setup routine, where it is zeroized before returning
//! - Nothing but the group elements is written to disk
//! - Anyone who learns `s` can forge openings, so only use a setup you
//!   generated yourself or obtained from a ceremony you trust
//!
//! Usage:
//!   generate_setup --size 4 --out setup.bin [--check-pairing]

#![forbid(unsafe_code)]

use std::{env, path::PathBuf};

use anyhow::Context;
use tinykzg::srs_setup::TrustedSetup;
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
    let size: usize = parse_flag(&args, "--size")
        .ok_or_else(|| anyhow::anyhow!("--size N is required"))?
        .parse()
        .context("--size must be a non-negative integer")?;
    let out = PathBuf::from(parse_flag(&args, "--out").unwrap_or_else(|| "setup.bin".into()));

    println!("⚙️  Configuration:");
    println!("   Powers: {} (max polynomial length)", size);
    println!("   Output: {}", out.display());
    println!();

    let setup = TrustedSetup::generate(size)
        .map_err(|e| anyhow::anyhow!("setup generation failed: {e}"))?;
    println!("✓ Generated {} powers in G1 and G2; secret destroyed", setup.size());

    if args.iter().any(|a| a == "--check-pairing") {
        setup
            .validate_pairing()
            .map_err(|e| anyhow::anyhow!("pairing self-check failed: {e}"))?;
        println!("✓ Pairing consistency verified");
    }

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    setup
        .save(&out)
        .map_err(|e| anyhow::anyhow!("write {}: {e}", out.display()))?;
    info!(path = %out.display(), "setup written");

    println!();
    println!("📊 Summary:");
    let g1_digest = setup.g1_digest().map_err(|e| anyhow::anyhow!("G1 digest: {e}"))?;
    let g2_digest = setup.g2_digest().map_err(|e| anyhow::anyhow!("G2 digest: {e}"))?;
    println!("   G1 digest: {}", hex::encode(g1_digest));
    println!("   G2 digest: {}", hex::encode(g2_digest));

    Ok(())
}
