//! PEM bundles of private signing keys.

use crate::error::{Error, Result};
use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::RsaPrivateKey;
use secrecy::SecretString;
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use x509_parser::pem::Pem;

pub const EC_PRIVATE_KEY: &str = "EC PRIVATE KEY";
pub const RSA_PRIVATE_KEY: &str = "RSA PRIVATE KEY";

pub const OID_P256: &str = "1.2.840.10045.3.1.7";
pub const OID_P384: &str = "1.3.132.0.34";
pub const OID_P521: &str = "1.3.132.0.35";

const DEFAULT_RSA_BITS: usize = 2048;

/// A private key loaded from PEM.
///
/// EC keys on curves other than P-256, P-384 and P-521 load successfully and
/// keep only their curve OID; they are rejected when used for signing.
pub enum PrivateKey {
    Rsa(Box<RsaPrivateKey>),
    P256(p256::SecretKey),
    P384(p384::SecretKey),
    P521(p521::SecretKey),
    UnsupportedEc { curve_oid: String },
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rsa(_) => f.write_str("PrivateKey::Rsa"),
            Self::P256(_) => f.write_str("PrivateKey::P256"),
            Self::P384(_) => f.write_str("PrivateKey::P384"),
            Self::P521(_) => f.write_str("PrivateKey::P521"),
            Self::UnsupportedEc { curve_oid } => {
                write!(f, "PrivateKey::UnsupportedEc({curve_oid})")
            }
        }
    }
}

/// Kinds of signing key the `keygen` command can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningKeyKind {
    Rsa,
    P256,
    P384,
    P521,
}

impl FromStr for SigningKeyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "rsa" => Ok(Self::Rsa),
            "p256" | "p-256" | "es256" => Ok(Self::P256),
            "p384" | "p-384" | "es384" => Ok(Self::P384),
            "p521" | "p-521" | "es512" => Ok(Self::P521),
            other => Err(Error::UnsupportedAlgorithm(format!(
                "unknown signing key kind '{other}'"
            ))),
        }
    }
}

impl PrivateKey {
    /// Generate a fresh signing key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Crypto`] if RSA key generation fails.
    pub fn generate(kind: SigningKeyKind) -> Result<Self> {
        let key = match kind {
            SigningKeyKind::Rsa => Self::Rsa(Box::new(
                RsaPrivateKey::new(&mut OsRng, DEFAULT_RSA_BITS)
                    .map_err(|e| Error::Crypto(format!("RSA key generation failed: {e}")))?,
            )),
            SigningKeyKind::P256 => Self::P256(p256::SecretKey::random(&mut OsRng)),
            SigningKeyKind::P384 => Self::P384(p384::SecretKey::random(&mut OsRng)),
            SigningKeyKind::P521 => Self::P521(p521::SecretKey::random(&mut OsRng)),
        };
        Ok(key)
    }

    /// Parse a SEC1 `EC PRIVATE KEY` body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the DER is malformed or carries no named curve.
    pub fn from_sec1_der(der: &[u8]) -> Result<Self> {
        let parsed = sec1::EcPrivateKey::try_from(der)
            .map_err(|e| Error::Format(format!("invalid EC private key: {e}")))?;
        let curve_oid = parsed
            .parameters
            .and_then(|p| p.named_curve())
            .ok_or_else(|| Error::Format("EC private key has no named curve".into()))?
            .to_string();

        let invalid = |e: p256::elliptic_curve::Error| {
            Error::Format(format!("invalid EC private key: {e}"))
        };
        let key = match curve_oid.as_str() {
            OID_P256 => Self::P256(p256::SecretKey::from_sec1_der(der).map_err(invalid)?),
            OID_P384 => Self::P384(p384::SecretKey::from_sec1_der(der).map_err(invalid)?),
            OID_P521 => Self::P521(p521::SecretKey::from_sec1_der(der).map_err(invalid)?),
            _ => Self::UnsupportedEc { curve_oid },
        };
        Ok(key)
    }

    /// Encode as `RSA PRIVATE KEY` or `EC PRIVATE KEY` PEM.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Crypto`] if encoding fails, or
    /// [`Error::UnsupportedAlgorithm`] for keys on unsupported curves.
    pub fn to_pem(&self) -> Result<SecretString> {
        let encoded = |e: &dyn fmt::Display| Error::Crypto(format!("PEM encoding failed: {e}"));
        let pem = match self {
            Self::Rsa(key) => key
                .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
                .map_err(|e| encoded(&e))?
                .to_string(),
            Self::P256(key) => key
                .to_sec1_pem(p256::pkcs8::LineEnding::LF)
                .map_err(|e| encoded(&e))?
                .to_string(),
            Self::P384(key) => key
                .to_sec1_pem(p384::pkcs8::LineEnding::LF)
                .map_err(|e| encoded(&e))?
                .to_string(),
            Self::P521(key) => key
                .to_sec1_pem(p521::pkcs8::LineEnding::LF)
                .map_err(|e| encoded(&e))?
                .to_string(),
            Self::UnsupportedEc { curve_oid } => {
                return Err(Error::UnsupportedAlgorithm(format!(
                    "cannot encode EC key on curve {curve_oid}"
                )))
            }
        };
        Ok(SecretString::from(pem))
    }
}

/// Load every private key in a PEM bundle, in order.
///
/// Either all blocks load or none are returned.
///
/// # Errors
///
/// Returns [`Error::Format`] for undecodable PEM, unknown block labels or
/// malformed key bodies.
pub fn load_pem_keys(pem: &[u8]) -> Result<Vec<PrivateKey>> {
    let mut keys = Vec::new();
    for block in Pem::iter_from_buffer(pem) {
        let block = block.map_err(|e| Error::Format(format!("unable to decode PEM: {e}")))?;
        let key = match block.label.as_str() {
            RSA_PRIVATE_KEY => PrivateKey::Rsa(Box::new(
                RsaPrivateKey::from_pkcs1_der(&block.contents)
                    .map_err(|e| Error::Format(format!("invalid RSA private key: {e}")))?,
            )),
            EC_PRIVATE_KEY => PrivateKey::from_sec1_der(&block.contents)?,
            other => return Err(Error::Format(format!("unknown PEM block '{other}'"))),
        };
        debug!(index = keys.len(), key = ?key, "loaded private key");
        keys.push(key);
    }
    Ok(keys)
}
