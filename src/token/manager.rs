use crate::config::TokenConfig;
use crate::error::{Error, Result};
use crate::token::jwt::{self, Compact};
use crate::token::keyring::Keyring;
use crate::token::revocation::RevocationStore;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

pub const ISSUER: &str = "github.com/dicot-project/api";
pub const CLAIM_SCOPE_DOMAIN: &str = "github.com/dicot-project/scope/domain";
pub const CLAIM_SCOPE_PROJECT: &str = "github.com/dicot-project/scope/project";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSubject {
    pub domain_name: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenScope {
    pub domain_name: String,
    pub project_name: String,
}

/// A bearer token. Its signed string is the only durable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: String,
    pub issued: OffsetDateTime,
    pub expiry: OffsetDateTime,
    pub subject: TokenSubject,
    pub scope: TokenScope,
}

// Field order is the claim order on the wire.
#[derive(Serialize)]
struct SignedClaims<'a> {
    jti: &'a str,
    iat: i64,
    exp: i64,
    iss: &'a str,
    sub: String,
    #[serde(rename = "github.com/dicot-project/scope/domain")]
    scope_domain: &'a str,
    #[serde(rename = "github.com/dicot-project/scope/project")]
    scope_project: &'a str,
}

impl<'a> From<&'a Token> for SignedClaims<'a> {
    fn from(token: &'a Token) -> Self {
        Self {
            jti: &token.id,
            iat: token.issued.unix_timestamp(),
            exp: token.expiry.unix_timestamp(),
            iss: ISSUER,
            sub: format!("{}/{}", token.subject.domain_name, token.subject.user_name),
            scope_domain: &token.scope.domain_name,
            scope_project: &token.scope.project_name,
        }
    }
}

fn string_claim(claims: &Map<String, Value>, name: &str) -> Result<String> {
    match claims.get(name) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(Error::Claims(format!("claim '{name}' must be a string"))),
        None => Err(Error::Claims(format!("missing claim '{name}'"))),
    }
}

fn time_claim(claims: &Map<String, Value>, name: &str) -> Result<OffsetDateTime> {
    let seconds = claims
        .get(name)
        .ok_or_else(|| Error::Claims(format!("missing claim '{name}'")))?
        .as_i64()
        .ok_or_else(|| Error::Claims(format!("claim '{name}' must be an integer")))?;
    OffsetDateTime::from_unix_timestamp(seconds)
        .map_err(|e| Error::Claims(format!("claim '{name}' out of range: {e}")))
}

fn token_from_claims(claims: &Map<String, Value>) -> Result<Token> {
    let id = string_claim(claims, "jti")?;
    let sub = string_claim(claims, "sub")?;
    let subject = match sub.split('/').collect::<Vec<_>>().as_slice() {
        [domain_name, user_name] => TokenSubject {
            domain_name: (*domain_name).to_string(),
            user_name: (*user_name).to_string(),
        },
        _ => {
            return Err(Error::Claims(format!(
                "subject '{sub}' must be '<domain>/<user>'"
            )))
        }
    };
    let scope = TokenScope {
        domain_name: string_claim(claims, CLAIM_SCOPE_DOMAIN)?,
        project_name: string_claim(claims, CLAIM_SCOPE_PROJECT)?,
    };

    Ok(Token {
        id,
        issued: time_claim(claims, "iat")?,
        expiry: time_claim(claims, "exp")?,
        subject,
        scope,
    })
}

/// `at + duration`, or `None` past the end of the supported date range.
fn checked_offset(at: OffsetDateTime, duration: Duration) -> Option<OffsetDateTime> {
    time::Duration::try_from(duration)
        .ok()
        .and_then(|duration| at.checked_add(duration))
}

// An `exp` so late that adding the leeway overflows has not passed.
fn is_expired(token: &Token, leeway: Duration) -> bool {
    checked_offset(token.expiry, leeway)
        .is_some_and(|deadline| OffsetDateTime::now_utc() > deadline)
}

/// Issues, signs and validates tokens against an ordered keyring.
pub struct TokenManager {
    keyring: Keyring,
    config: TokenConfig,
    revocations: Arc<dyn RevocationStore>,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("keyring", &self.keyring)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    #[must_use]
    pub fn new(
        keyring: Keyring,
        config: TokenConfig,
        revocations: Arc<dyn RevocationStore>,
    ) -> Self {
        Self {
            keyring,
            config,
            revocations,
        }
    }

    /// Build a manager from a PEM bundle, newest key first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the bundle is invalid or holds no keys.
    pub fn from_pem(
        pem: &[u8],
        config: TokenConfig,
        revocations: Arc<dyn RevocationStore>,
    ) -> Result<Self> {
        Ok(Self::new(Keyring::from_pem(pem)?, config, revocations))
    }

    #[must_use]
    pub fn keyring(&self) -> &Keyring {
        &self.keyring
    }

    #[must_use]
    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// A fresh unsigned token valid for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Claims`] if the lifetime puts `exp` beyond the
    /// representable date range.
    pub fn new_token(&self, subject: TokenSubject, scope: TokenScope) -> Result<Token> {
        let now = OffsetDateTime::now_utc();
        // tokens carry whole seconds
        let issued = now - time::Duration::nanoseconds(i64::from(now.nanosecond()));
        let expiry = checked_offset(issued, self.config.lifetime).ok_or_else(|| {
            Error::Claims(format!(
                "token lifetime {:?} is out of range",
                self.config.lifetime
            ))
        })?;
        Ok(Token {
            id: Uuid::new_v4().to_string(),
            issued,
            expiry,
            subject,
            scope,
        })
    }

    /// Sign `token` with the active key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedAlgorithm`] if the active key's curve has
    /// no signature algorithm and [`Error::Crypto`] if signing fails.
    #[instrument(skip_all, fields(token_id = %token.id))]
    pub fn sign_token(&self, token: &Token) -> Result<String> {
        let key = self.keyring.active();
        let signed = jwt::encode(key, &SignedClaims::from(token))?;
        debug!(key = ?key, "token signed");
        Ok(signed)
    }

    /// Verify `signed` against the keyring in order and return its token.
    ///
    /// The first key that verifies the signature decides the outcome. When
    /// none does, the first key's error is returned.
    ///
    /// # Errors
    ///
    /// * [`Error::Format`] if `signed` is not a compact token.
    /// * [`Error::Verification`] or [`Error::UnsupportedAlgorithm`] if no key verifies.
    /// * [`Error::Claims`] if required claims are missing or malformed.
    /// * [`Error::Expired`] if expiry is enforced and `exp` has passed.
    /// * [`Error::Revoked`] if the token id has a revocation record.
    /// * [`Error::RevocationStoreUnavailable`] if the lookup fails or times out.
    #[instrument(skip_all)]
    pub async fn validate_token(&self, signed: &str) -> Result<Token> {
        let compact = Compact::parse(signed)?;

        let mut first_error = None;
        for (index, key) in self.keyring.iter().enumerate() {
            match compact.verify(key) {
                Ok(()) => {
                    debug!(index, "token signature verified");
                    return self.accept(&compact).await;
                }
                Err(err) => {
                    debug!(index, error = %err, "key rejected token");
                    first_error.get_or_insert(err);
                }
            }
        }

        Err(first_error.unwrap_or_else(|| Error::Verification("keyring is empty".into())))
    }

    async fn accept(&self, compact: &Compact<'_>) -> Result<Token> {
        let claims: Map<String, Value> = compact.claims()?;
        let token = token_from_claims(&claims)?;

        if self.config.enforce_expiry && is_expired(&token, self.config.leeway) {
            debug!(token_id = %token.id, "token expired");
            return Err(Error::Expired(token.id));
        }

        let lookup = tokio::time::timeout(
            self.config.revocation_timeout,
            self.revocations.exists(&token.id),
        )
        .await;

        match lookup {
            Ok(Ok(false)) => Ok(token),
            Ok(Ok(true)) => {
                debug!(token_id = %token.id, "token is revoked");
                Err(Error::Revoked(token.id))
            }
            Ok(Err(err)) => {
                warn!(token_id = %token.id, error = %err, "revocation lookup failed");
                Err(Error::RevocationStoreUnavailable(err.to_string()))
            }
            Err(_) => {
                warn!(token_id = %token.id, "revocation lookup timed out");
                Err(Error::RevocationStoreUnavailable(format!(
                    "lookup timed out after {:?}",
                    self.config.revocation_timeout
                )))
            }
        }
    }
}
