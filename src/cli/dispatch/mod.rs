//! Map validated CLI matches to an [`Action`].

use crate::cli::actions::{keygen, keypair, password, token, Action};
use crate::cli::commands::{
    keygen as keygen_cmd, keypair as keypair_cmd, password as password_cmd, token as token_cmd,
};
use crate::crypto::x509::X509FingerprintMode;
use crate::token::{TokenScope, TokenSubject};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use std::time::Duration;

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow!("missing required argument: --{id}"))
}

fn optional(matches: &ArgMatches, id: &str) -> Option<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .filter(|v| !v.trim().is_empty())
}

fn seconds(matches: &ArgMatches, id: &str) -> Duration {
    Duration::from_secs(matches.get_one::<u64>(id).copied().unwrap_or(0))
}

fn keypair_action(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((keypair_cmd::CMD_CREATE, sub)) => Ok(Action::KeypairCreate(keypair::CreateArgs {
            kind: required(sub, keypair_cmd::ARG_TYPE)?.parse()?,
            algorithm: required(sub, keypair_cmd::ARG_ALGORITHM)?.parse()?,
            bits: sub
                .get_one::<usize>(keypair_cmd::ARG_BITS)
                .copied()
                .context("missing required argument: --bits")?,
            out: optional(sub, keypair_cmd::ARG_OUT),
        })),
        Some((keypair_cmd::CMD_FINGERPRINT, sub)) => {
            let x509_mode = match required(sub, keypair_cmd::ARG_X509_MODE)?.as_str() {
                "legacy" => X509FingerprintMode::Legacy,
                _ => X509FingerprintMode::Sha1,
            };
            Ok(Action::KeypairFingerprint(keypair::FingerprintArgs {
                kind: required(sub, keypair_cmd::ARG_TYPE)?.parse()?,
                x509_mode,
                input: required(sub, keypair_cmd::ARG_INPUT)?,
            }))
        }
        Some((name, _)) => Err(anyhow!("unknown keypair command: {name}")),
        None => Err(anyhow!("missing keypair command")),
    }
}

fn token_action(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((token_cmd::CMD_ISSUE, sub)) => {
            let domain = required(sub, token_cmd::ARG_DOMAIN)?;
            let scope_domain =
                optional(sub, token_cmd::ARG_SCOPE_DOMAIN).unwrap_or_else(|| domain.clone());
            Ok(Action::TokenIssue(token::IssueArgs {
                keyring: required(sub, token_cmd::ARG_KEYRING)?,
                lifetime: seconds(sub, token_cmd::ARG_LIFETIME),
                subject: TokenSubject {
                    domain_name: domain,
                    user_name: required(sub, token_cmd::ARG_USER)?,
                },
                scope: TokenScope {
                    domain_name: scope_domain,
                    project_name: required(sub, token_cmd::ARG_PROJECT)?,
                },
            }))
        }
        Some((token_cmd::CMD_VALIDATE, sub)) => Ok(Action::TokenValidate(token::ValidateArgs {
            keyring: required(sub, token_cmd::ARG_KEYRING)?,
            revoked_file: optional(sub, token_cmd::ARG_REVOKED_FILE),
            revocation_timeout: seconds(sub, token_cmd::ARG_REVOCATION_TIMEOUT),
            enforce_expiry: !sub.get_flag(token_cmd::ARG_IGNORE_EXPIRY),
            leeway: seconds(sub, token_cmd::ARG_LEEWAY),
            token: required(sub, token_cmd::ARG_TOKEN)?,
        })),
        Some((name, _)) => Err(anyhow!("unknown token command: {name}")),
        None => Err(anyhow!("missing token command")),
    }
}

/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((password_cmd::CMD_PWHASH, sub)) => Ok(Action::PasswordHash(password::HashArgs {
            password_file: optional(sub, password_cmd::ARG_PASSWORD_FILE),
            base64: sub.get_flag(password_cmd::ARG_BASE64),
        })),
        Some((password_cmd::CMD_PWCHECK, sub)) => Ok(Action::PasswordCheck(password::CheckArgs {
            credential: required(sub, password_cmd::ARG_CREDENTIAL)?,
            password_file: optional(sub, password_cmd::ARG_PASSWORD_FILE),
            base64: sub.get_flag(password_cmd::ARG_BASE64),
        })),
        Some((keypair_cmd::CMD_KEYPAIR, sub)) => keypair_action(sub),
        Some((keygen_cmd::CMD_KEYGEN, sub)) => Ok(Action::Keygen(keygen::Args {
            kind: required(sub, keygen_cmd::ARG_KIND)?.parse()?,
            out: optional(sub, keygen_cmd::ARG_OUT),
            rotate: optional(sub, keygen_cmd::ARG_ROTATE),
        })),
        Some((token_cmd::CMD_TOKEN, sub)) => token_action(sub),
        Some((name, _)) => Err(anyhow!("unknown command: {name}")),
        None => Err(anyhow!("missing command")),
    }
}
