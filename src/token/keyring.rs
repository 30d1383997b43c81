//! Ordered token signing keys.

use crate::crypto::pem::{load_pem_keys, PrivateKey, OID_P256, OID_P384, OID_P521};
use crate::error::{Error, Result};
use crate::token::algorithm::{lookup, KeyFamily, SignatureAlgorithm};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use sha2::{Sha256, Sha384, Sha512};
use std::fmt;
use tracing::debug;

/// A private key prepared for signing along with its verifying half.
pub enum SigningKey {
    Rsa {
        signing: rsa::pkcs1v15::SigningKey<Sha256>,
        public: rsa::RsaPublicKey,
    },
    P256 {
        signing: p256::ecdsa::SigningKey,
        verifying: p256::ecdsa::VerifyingKey,
    },
    P384 {
        signing: p384::ecdsa::SigningKey,
        verifying: p384::ecdsa::VerifyingKey,
    },
    P521 {
        signing: p521::ecdsa::SigningKey,
        verifying: p521::ecdsa::VerifyingKey,
    },
    UnsupportedEc {
        curve_oid: String,
    },
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.algorithm() {
            Ok(algorithm) => write!(f, "SigningKey({algorithm})"),
            Err(_) => f.write_str("SigningKey(unsupported)"),
        }
    }
}

impl TryFrom<PrivateKey> for SigningKey {
    type Error = Error;

    fn try_from(key: PrivateKey) -> Result<Self> {
        let key = match key {
            PrivateKey::Rsa(key) => Self::Rsa {
                public: key.to_public_key(),
                signing: rsa::pkcs1v15::SigningKey::<Sha256>::new(*key),
            },
            PrivateKey::P256(secret) => Self::P256 {
                signing: p256::ecdsa::SigningKey::from_bytes(&secret.to_bytes())
                    .map_err(|_| Error::Crypto("invalid P-256 signing key".into()))?,
                verifying: p256::ecdsa::VerifyingKey::from_affine(*secret.public_key().as_affine())
                    .map_err(|_| Error::Crypto("invalid P-256 public key".into()))?,
            },
            PrivateKey::P384(secret) => Self::P384 {
                signing: p384::ecdsa::SigningKey::from_bytes(&secret.to_bytes())
                    .map_err(|_| Error::Crypto("invalid P-384 signing key".into()))?,
                verifying: p384::ecdsa::VerifyingKey::from_affine(*secret.public_key().as_affine())
                    .map_err(|_| Error::Crypto("invalid P-384 public key".into()))?,
            },
            PrivateKey::P521(secret) => Self::P521 {
                signing: p521::ecdsa::SigningKey::from_bytes(&secret.to_bytes())
                    .map_err(|_| Error::Crypto("invalid P-521 signing key".into()))?,
                verifying: p521::ecdsa::VerifyingKey::from_affine(*secret.public_key().as_affine())
                    .map_err(|_| Error::Crypto("invalid P-521 public key".into()))?,
            },
            PrivateKey::UnsupportedEc { curve_oid } => Self::UnsupportedEc { curve_oid },
        };
        Ok(key)
    }
}

impl SigningKey {
    #[must_use]
    pub fn family(&self) -> KeyFamily {
        match self {
            Self::Rsa { .. } => KeyFamily::Rsa,
            _ => KeyFamily::Ec,
        }
    }

    #[must_use]
    pub fn curve_oid(&self) -> Option<&str> {
        match self {
            Self::Rsa { .. } => None,
            Self::P256 { .. } => Some(OID_P256),
            Self::P384 { .. } => Some(OID_P384),
            Self::P521 { .. } => Some(OID_P521),
            Self::UnsupportedEc { curve_oid } => Some(curve_oid.as_str()),
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::UnsupportedAlgorithm`] for keys on unsupported curves.
    pub fn algorithm(&self) -> Result<SignatureAlgorithm> {
        lookup(self.family(), self.curve_oid())
    }

    /// Sign `message`. EC signatures are the fixed-size `r || s` encoding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedAlgorithm`] for keys on unsupported curves
    /// and [`Error::Crypto`] if the signer fails.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let failed = |e: rsa::signature::Error| Error::Crypto(format!("signing failed: {e}"));
        let signature = match self {
            Self::Rsa { signing, .. } => signing.try_sign(message).map_err(failed)?.to_vec(),
            Self::P256 { signing, .. } => {
                let signature: p256::ecdsa::Signature = signing.try_sign(message).map_err(failed)?;
                signature.to_bytes().to_vec()
            }
            Self::P384 { signing, .. } => {
                let signature: p384::ecdsa::Signature = signing.try_sign(message).map_err(failed)?;
                signature.to_bytes().to_vec()
            }
            Self::P521 { signing, .. } => {
                let signature: p521::ecdsa::Signature = signing.try_sign(message).map_err(failed)?;
                signature.to_bytes().to_vec()
            }
            Self::UnsupportedEc { curve_oid } => {
                return Err(Error::UnsupportedAlgorithm(format!(
                    "unsupported elliptic curve {curve_oid}"
                )))
            }
        };
        Ok(signature)
    }

    /// Verify `signature` over `message`. RSA keys accept any RSA algorithm;
    /// EC keys only the one matching their curve.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Verification`] on an algorithm mismatch or a bad
    /// signature and [`Error::UnsupportedAlgorithm`] for unsupported curves.
    pub fn verify(
        &self,
        algorithm: SignatureAlgorithm,
        message: &[u8],
        signature: &[u8],
    ) -> Result<()> {
        let expected = self.algorithm()?;
        let accepted = match self {
            Self::Rsa { .. } => algorithm.family() == KeyFamily::Rsa,
            _ => algorithm == expected,
        };
        if !accepted {
            return Err(Error::Verification(format!(
                "token signed with {algorithm}, key uses {expected}"
            )));
        }

        let invalid = |_| Error::Verification("signature verification failed".into());
        match self {
            Self::Rsa { public, .. } => {
                let signature = rsa::pkcs1v15::Signature::try_from(signature).map_err(invalid)?;
                let verified = match algorithm {
                    SignatureAlgorithm::Rs384 => {
                        rsa::pkcs1v15::VerifyingKey::<Sha384>::new(public.clone())
                            .verify(message, &signature)
                    }
                    SignatureAlgorithm::Rs512 => {
                        rsa::pkcs1v15::VerifyingKey::<Sha512>::new(public.clone())
                            .verify(message, &signature)
                    }
                    _ => rsa::pkcs1v15::VerifyingKey::<Sha256>::new(public.clone())
                        .verify(message, &signature),
                };
                verified.map_err(invalid)
            }
            Self::P256 { verifying, .. } => {
                let signature = p256::ecdsa::Signature::from_slice(signature).map_err(invalid)?;
                verifying.verify(message, &signature).map_err(invalid)
            }
            Self::P384 { verifying, .. } => {
                let signature = p384::ecdsa::Signature::from_slice(signature).map_err(invalid)?;
                verifying.verify(message, &signature).map_err(invalid)
            }
            Self::P521 { verifying, .. } => {
                let signature = p521::ecdsa::Signature::from_slice(signature).map_err(invalid)?;
                verifying.verify(message, &signature).map_err(invalid)
            }
            Self::UnsupportedEc { .. } => {
                Err(Error::Verification("unsupported signing key".into()))
            }
        }
    }
}

/// Signing keys in rotation order. Index 0 signs; every key verifies.
#[derive(Debug)]
pub struct Keyring {
    keys: Vec<SigningKey>,
}

impl Keyring {
    /// # Errors
    ///
    /// Returns [`Error::Format`] if `keys` is empty and [`Error::Crypto`] if a
    /// key cannot be prepared for signing.
    pub fn new(keys: Vec<PrivateKey>) -> Result<Self> {
        if keys.is_empty() {
            return Err(Error::Format("keyring must contain at least one key".into()));
        }
        let keys = keys
            .into_iter()
            .map(SigningKey::try_from)
            .collect::<Result<Vec<_>>>()?;
        debug!(keys = keys.len(), active = ?keys[0], "keyring ready");
        Ok(Self { keys })
    }

    /// Build a keyring from a PEM bundle, newest key first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the bundle is invalid or holds no keys.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        let keys = load_pem_keys(pem)?;
        if keys.is_empty() {
            return Err(Error::Format("no keys found in PEM data".into()));
        }
        Self::new(keys)
    }

    /// The key new tokens are signed with.
    #[must_use]
    pub fn active(&self) -> &SigningKey {
        // non-empty by construction
        &self.keys[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &SigningKey> {
        self.keys.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
