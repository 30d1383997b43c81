use crate::cli::actions::io::{read_password, trim_newline};
use crate::crypto::password::{check_password_async, hash_password_async};
use anyhow::{bail, Context, Result};
use base64ct::{Base64, Encoding};
use secrecy::ExposeSecret;
use tracing::{debug, info};

#[derive(Debug)]
pub struct HashArgs {
    pub password_file: Option<String>,
    pub base64: bool,
}

#[derive(Debug)]
pub struct CheckArgs {
    pub credential: String,
    pub password_file: Option<String>,
    pub base64: bool,
}

/// Decode a credential that may be base64 wrapped.
///
/// # Errors
/// Returns an error if `wrapped` is set and the value is not base64 text.
pub fn unwrap_credential(credential: &str, wrapped: bool) -> Result<String> {
    let credential = trim_newline(credential.trim_start());
    if !wrapped {
        return Ok(credential.to_string());
    }
    let bytes = Base64::decode_vec(credential)
        .map_err(|e| anyhow::anyhow!("invalid base64 credential: {e}"))?;
    String::from_utf8(bytes).context("credential is not UTF-8")
}

/// # Errors
/// Returns an error if the password cannot be read or hashed.
pub async fn hash(args: HashArgs) -> Result<()> {
    let password = read_password(args.password_file.as_deref(), true).await?;
    let credential = hash_password_async(password.expose_secret().to_string()).await?;
    debug!("password hashed");

    if args.base64 {
        println!("{}", Base64::encode_string(credential.as_bytes()));
    } else {
        println!("{credential}");
    }
    Ok(())
}

/// # Errors
/// Returns an error if the credential is malformed or the password does not match.
pub async fn check(args: CheckArgs) -> Result<()> {
    let credential = unwrap_credential(&args.credential, args.base64)?;
    let password = read_password(args.password_file.as_deref(), false).await?;

    if check_password_async(password.expose_secret().to_string(), credential).await? {
        info!("password matches");
        println!("OK");
        Ok(())
    } else {
        bail!("password does not match")
    }
}
