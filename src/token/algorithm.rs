//! Signature algorithm selection from signing key type.

use crate::crypto::pem::{OID_P256, OID_P384, OID_P521};
use crate::error::{Error, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    Rsa,
    Ec,
}

/// JWS `alg` values this crate signs and verifies with.
///
/// RSA keys sign with `RS256` and also verify `RS384` and `RS512`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    Rs256,
    Rs384,
    Rs512,
    Es256,
    Es384,
    Es512,
}

impl SignatureAlgorithm {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rs256 => "RS256",
            Self::Rs384 => "RS384",
            Self::Rs512 => "RS512",
            Self::Es256 => "ES256",
            Self::Es384 => "ES384",
            Self::Es512 => "ES512",
        }
    }

    #[must_use]
    pub fn family(&self) -> KeyFamily {
        match self {
            Self::Rs256 | Self::Rs384 | Self::Rs512 => KeyFamily::Rsa,
            Self::Es256 | Self::Es384 | Self::Es512 => KeyFamily::Ec,
        }
    }

    /// Parse a JWS header `alg` value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedAlgorithm`] for any other value, `none`
    /// and the HMAC algorithms included.
    pub fn from_header(alg: &str) -> Result<Self> {
        match alg {
            "RS256" => Ok(Self::Rs256),
            "RS384" => Ok(Self::Rs384),
            "RS512" => Ok(Self::Rs512),
            "ES256" => Ok(Self::Es256),
            "ES384" => Ok(Self::Es384),
            "ES512" => Ok(Self::Es512),
            other => Err(Error::UnsupportedAlgorithm(format!(
                "unsupported token algorithm '{other}'"
            ))),
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every supported `(family, curve OID)` pair and the algorithm it signs with.
/// RSA keys carry no curve.
pub const ALGORITHMS: &[(KeyFamily, Option<&str>, SignatureAlgorithm)] = &[
    (KeyFamily::Rsa, None, SignatureAlgorithm::Rs256),
    (KeyFamily::Ec, Some(OID_P256), SignatureAlgorithm::Es256),
    (KeyFamily::Ec, Some(OID_P384), SignatureAlgorithm::Es384),
    (KeyFamily::Ec, Some(OID_P521), SignatureAlgorithm::Es512),
];

/// Look up the signature algorithm for a key.
///
/// # Errors
///
/// Returns [`Error::UnsupportedAlgorithm`] when the pair is not in [`ALGORITHMS`].
pub fn lookup(family: KeyFamily, curve_oid: Option<&str>) -> Result<SignatureAlgorithm> {
    ALGORITHMS
        .iter()
        .find(|(f, c, _)| *f == family && *c == curve_oid)
        .map(|(_, _, algorithm)| *algorithm)
        .ok_or_else(|| match curve_oid {
            Some(oid) => Error::UnsupportedAlgorithm(format!("unsupported elliptic curve {oid}")),
            None => Error::UnsupportedAlgorithm(format!("unsupported key family {family:?}")),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn each_curve_maps_to_one_algorithm() {
        assert_eq!(lookup(KeyFamily::Rsa, None).unwrap(), SignatureAlgorithm::Rs256);
        assert_eq!(lookup(KeyFamily::Ec, Some(OID_P256)).unwrap(), SignatureAlgorithm::Es256);
        assert_eq!(lookup(KeyFamily::Ec, Some(OID_P384)).unwrap(), SignatureAlgorithm::Es384);
        assert_eq!(lookup(KeyFamily::Ec, Some(OID_P521)).unwrap(), SignatureAlgorithm::Es512);
    }

    #[test]
    fn unknown_curve_is_an_error() {
        let err = lookup(KeyFamily::Ec, Some("1.3.132.0.10")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedAlgorithm(msg) if msg.contains("1.3.132.0.10")));
        assert!(lookup(KeyFamily::Ec, None).is_err());
    }

    #[test]
    fn header_names() {
        assert_eq!(SignatureAlgorithm::from_header("ES512").unwrap(), SignatureAlgorithm::Es512);
        assert_eq!(SignatureAlgorithm::Es384.family(), KeyFamily::Ec);
        assert_eq!(SignatureAlgorithm::from_header("RS512").unwrap(), SignatureAlgorithm::Rs512);
        assert_eq!(SignatureAlgorithm::Rs384.family(), KeyFamily::Rsa);
        assert!(SignatureAlgorithm::from_header("none").is_err());
        assert!(SignatureAlgorithm::from_header("HS256").is_err());
    }
}
