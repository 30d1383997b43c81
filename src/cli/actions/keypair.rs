use crate::cli::actions::io::{read_input, write_secret};
use crate::crypto::keys::{KeyAlgorithm, KeyManager, KeyPairKind};
use crate::crypto::x509::X509FingerprintMode;
use anyhow::{Context, Result};
use secrecy::ExposeSecret;
use tracing::info;

#[derive(Debug)]
pub struct CreateArgs {
    pub kind: KeyPairKind,
    pub algorithm: KeyAlgorithm,
    pub bits: usize,
    pub out: Option<String>,
}

#[derive(Debug)]
pub struct FingerprintArgs {
    pub kind: KeyPairKind,
    pub x509_mode: X509FingerprintMode,
    pub input: String,
}

/// # Errors
/// Returns an error if the keypair cannot be generated or written.
pub async fn create(args: CreateArgs) -> Result<()> {
    let manager = KeyManager::for_kind(args.kind);
    let (algorithm, bits) = (args.algorithm, args.bits);
    let pair = tokio::task::spawn_blocking(move || manager.create_key_pair(algorithm, bits))
        .await
        .context("key generation task failed")??;
    let fingerprint = manager.fingerprint(&pair.public_key)?;

    match args.out {
        Some(path) => {
            write_secret(&path, &pair.private_key).await?;
            info!(path = %path, fingerprint = %fingerprint, "private key written");
        }
        None => print!("{}", pair.private_key.expose_secret()),
    }
    print!("{}", pair.public_key);
    eprintln!("fingerprint: {fingerprint}");
    Ok(())
}

/// # Errors
/// Returns an error if the input cannot be read or parsed.
pub async fn fingerprint(args: FingerprintArgs) -> Result<()> {
    let public_key = read_input(&args.input).await?;
    let manager = KeyManager::with_x509_mode(args.kind, args.x509_mode);
    println!("{}", manager.fingerprint(&public_key)?);
    Ok(())
}
