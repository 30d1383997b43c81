use crate::cli::actions::io::read_input;
use crate::config::TokenConfig;
use crate::token::{MemoryRevocationStore, Token, TokenManager, TokenScope, TokenSubject};
use anyhow::{Context, Result};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug)]
pub struct IssueArgs {
    pub keyring: String,
    pub lifetime: Duration,
    pub subject: TokenSubject,
    pub scope: TokenScope,
}

#[derive(Debug)]
pub struct ValidateArgs {
    pub keyring: String,
    pub revoked_file: Option<String>,
    pub revocation_timeout: Duration,
    pub enforce_expiry: bool,
    pub leeway: Duration,
    pub token: String,
}

/// Revoked token ids, one per line. Blank lines and `#` comments are skipped.
#[must_use]
pub fn parse_revoked(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect()
}

#[must_use]
pub fn token_json(token: &Token) -> serde_json::Value {
    json!({
        "id": token.id,
        "issued": token.issued.unix_timestamp(),
        "expiry": token.expiry.unix_timestamp(),
        "subject": {
            "domain": token.subject.domain_name,
            "user": token.subject.user_name,
        },
        "scope": {
            "domain": token.scope.domain_name,
            "project": token.scope.project_name,
        },
    })
}

async fn load_manager(
    keyring: &str,
    config: TokenConfig,
    revocations: MemoryRevocationStore,
) -> Result<TokenManager> {
    let pem = tokio::fs::read(keyring)
        .await
        .with_context(|| format!("failed to read keyring {keyring}"))?;
    TokenManager::from_pem(&pem, config, Arc::new(revocations))
        .with_context(|| format!("invalid keyring {keyring}"))
}

/// # Errors
/// Returns an error if the keyring cannot be loaded or the token cannot be signed.
pub async fn issue(args: IssueArgs) -> Result<()> {
    let config = TokenConfig::default().with_lifetime(args.lifetime);
    let manager = load_manager(&args.keyring, config, MemoryRevocationStore::new()).await?;

    let token = manager.new_token(args.subject, args.scope)?;
    let signed = manager.sign_token(&token)?;
    debug!(token_id = %token.id, "token issued");
    println!("{signed}");
    Ok(())
}

/// # Errors
/// Returns an error if the token does not validate.
pub async fn validate(args: ValidateArgs) -> Result<()> {
    let revoked = match &args.revoked_file {
        Some(path) => parse_revoked(
            &tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read revoked file {path}"))?,
        ),
        None => Vec::new(),
    };
    debug!(revoked = revoked.len(), "revocation list loaded");

    let config = TokenConfig::default()
        .with_revocation_timeout(args.revocation_timeout)
        .with_enforce_expiry(args.enforce_expiry)
        .with_leeway(args.leeway);
    let manager = load_manager(
        &args.keyring,
        config,
        MemoryRevocationStore::with_revoked(revoked),
    )
    .await?;

    let signed = read_input(&args.token).await?;
    let token = manager.validate_token(signed.trim()).await?;
    println!("{}", serde_json::to_string_pretty(&token_json(&token))?);
    Ok(())
}
