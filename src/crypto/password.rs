//! Salted scrypt password digests.
//!
//! Credentials are stored as `scrypt,<base64 salt>,<base64 digest>`. The cost
//! parameters are compiled in and never written to the record, so changing
//! any of the constants below invalidates every stored credential.

use crate::error::{Error, Result};
use base64ct::{Base64, Encoding};
use rand::{rngs::OsRng, RngCore};
use std::fmt;
use subtle::ConstantTimeEq;
use tracing::instrument;

pub const SCHEME: &str = "scrypt";

/// log2 of the scrypt cost factor N = 16384.
pub const SCRYPT_LOG_COST: u8 = 14;
pub const SCRYPT_BLOCK_SIZE: u32 = 8;
pub const SCRYPT_PARALLELIZATION: u32 = 1;
pub const SCRYPT_OUTPUT_SIZE: usize = 32;
pub const SCRYPT_SALT_SIZE: usize = 32;

/// A decoded password hash record.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub salt: Vec<u8>,
    pub digest: Vec<u8>,
}

impl Credential {
    /// Parse the `scrypt,<salt>,<digest>` text form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the field count or scheme tag is wrong, or
    /// if either base64 field does not decode.
    pub fn parse(encoded: &str) -> Result<Self> {
        let fields: Vec<&str> = encoded.split(',').collect();
        if fields.len() != 3 {
            return Err(Error::Format(format!(
                "expected 3 fields in password hash, found {}",
                fields.len()
            )));
        }

        if fields[0] != SCHEME {
            return Err(Error::Format(format!(
                "expected '{SCHEME}' scheme not '{}'",
                fields[0]
            )));
        }

        let salt = Base64::decode_vec(fields[1])
            .map_err(|_| Error::Format("invalid base64 in salt field".into()))?;
        let digest = Base64::decode_vec(fields[2])
            .map_err(|_| Error::Format("invalid base64 in digest field".into()))?;

        Ok(Self { salt, digest })
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{SCHEME},{},{}",
            Base64::encode_string(&self.salt),
            Base64::encode_string(&self.digest)
        )
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("scheme", &SCHEME)
            .field("salt_len", &self.salt.len())
            .field("digest_len", &self.digest.len())
            .finish()
    }
}

fn derive(password: &str, salt: &[u8]) -> Result<[u8; SCRYPT_OUTPUT_SIZE]> {
    let params = scrypt::Params::new(
        SCRYPT_LOG_COST,
        SCRYPT_BLOCK_SIZE,
        SCRYPT_PARALLELIZATION,
        SCRYPT_OUTPUT_SIZE,
    )
    .map_err(|e| Error::Crypto(format!("invalid scrypt parameters: {e}")))?;

    let mut digest = [0u8; SCRYPT_OUTPUT_SIZE];
    scrypt::scrypt(password.as_bytes(), salt, &params, &mut digest)
        .map_err(|e| Error::Crypto(format!("scrypt derivation failed: {e}")))?;
    Ok(digest)
}

/// Hash a password with a fresh random salt.
///
/// # Errors
///
/// Returns [`Error::Crypto`] if the operating system random source fails.
#[instrument(skip_all)]
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt = vec![0u8; SCRYPT_SALT_SIZE];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| Error::Crypto(format!("random source failed: {e}")))?;

    let digest = derive(password, &salt)?;
    let credential = Credential {
        salt,
        digest: digest.to_vec(),
    };
    Ok(credential.to_string())
}

/// Check a password against an encoded credential.
///
/// The digest is always re-derived at the compiled-in output size and
/// compared in constant time. A stored digest of any other length never
/// matches, even when it is a prefix of the real one.
///
/// # Errors
///
/// Returns [`Error::Format`] if `encoded` cannot be parsed.
#[instrument(skip_all)]
pub fn check_password(password: &str, encoded: &str) -> Result<bool> {
    let credential = Credential::parse(encoded)?;
    let derived = derive(password, &credential.salt)?;
    Ok(derived.as_slice().ct_eq(credential.digest.as_slice()).into())
}

/// [`hash_password`] on the blocking thread pool.
///
/// # Errors
///
/// Same as [`hash_password`], plus [`Error::Crypto`] if the worker task is lost.
pub async fn hash_password_async(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| Error::Crypto(format!("hashing task failed: {e}")))?
}

/// [`check_password`] on the blocking thread pool.
///
/// # Errors
///
/// Same as [`check_password`], plus [`Error::Crypto`] if the worker task is lost.
pub async fn check_password_async(password: String, encoded: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || check_password(&password, &encoded))
        .await
        .map_err(|e| Error::Crypto(format!("verification task failed: {e}")))?
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PASSWORD: &str = "correct horse battery staple";

    // Salt 0x00..0x1f, derived with N=16384, r=8, p=1.
    const KNOWN_CREDENTIAL: &str = "scrypt,AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=,Ux0vqOqPVVfjuKr7dDS/IQFJRvhsi/rs4ogbdsGKDss=";

    #[test]
    fn hash_and_check_round_trip() {
        let hash = hash_password(PASSWORD).unwrap();
        assert!(hash.starts_with("scrypt,"));
        assert!(check_password(PASSWORD, &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hash = hash_password(PASSWORD).unwrap();
        assert!(!check_password(&format!("{PASSWORD}!"), &hash).unwrap());
    }

    #[test]
    fn known_credential_matches() {
        assert!(check_password(PASSWORD, KNOWN_CREDENTIAL).unwrap());
        assert!(!check_password("Tr0ub4dor&3", KNOWN_CREDENTIAL).unwrap());
    }

    #[test]
    fn salts_are_random() {
        let first = Credential::parse(&hash_password(PASSWORD).unwrap()).unwrap();
        let second = Credential::parse(&hash_password(PASSWORD).unwrap()).unwrap();
        assert_eq!(first.salt.len(), SCRYPT_SALT_SIZE);
        assert_eq!(first.digest.len(), SCRYPT_OUTPUT_SIZE);
        assert_ne!(first.salt, second.salt);
        assert_ne!(first.digest, second.digest);
    }

    #[test]
    fn bad_scheme_is_an_error() {
        let hash = hash_password(PASSWORD).unwrap();
        let corrupted = format!("a{}", &hash[1..]);
        assert!(matches!(
            check_password(PASSWORD, &corrupted),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn wrong_field_count_is_an_error() {
        assert!(matches!(
            check_password(PASSWORD, "scrypt,AAAA"),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            check_password(PASSWORD, "scrypt,4000,8,1,AAAA,AAAA"),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn corrupt_base64_is_an_error() {
        let hash = hash_password(PASSWORD).unwrap();
        let corrupted = &hash[..hash.len() - 1];
        assert!(matches!(
            check_password(PASSWORD, corrupted),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn truncated_digest_does_not_match() {
        // Dropping one base64 quad leaves a valid, shorter digest.
        let hash = hash_password(PASSWORD).unwrap();
        let truncated = &hash[..hash.len() - 4];
        assert!(!check_password(PASSWORD, truncated).unwrap());
    }

    #[test]
    fn credential_display_round_trips() {
        let credential = Credential::parse(KNOWN_CREDENTIAL).unwrap();
        assert_eq!(credential.salt, (0u8..32).collect::<Vec<_>>());
        assert_eq!(credential.to_string(), KNOWN_CREDENTIAL);
    }

    #[tokio::test]
    async fn async_variants_run_on_blocking_pool() {
        let hash = hash_password_async(PASSWORD.to_string()).await.unwrap();
        assert!(check_password_async(PASSWORD.to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!check_password_async("nope".to_string(), hash).await.unwrap());
    }
}
