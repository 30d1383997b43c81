//! Keypair issuance and public key fingerprints.
//!
//! [`KeyManager`] is a closed set of managers chosen by the caller through
//! [`KeyPairKind`]. Managers never keep the private half of a keypair they
//! create.

use crate::crypto::ssh::SshKeyManager;
use crate::crypto::x509::{X509FingerprintMode, X509KeyManager};
use crate::error::{Error, Result};
use secrecy::SecretString;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_KEY_BITS: usize = 2048;
pub const MIN_KEY_BITS: usize = 1024;
pub const MAX_KEY_BITS: usize = 16384;

/// Requested keypair algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Rsa,
    Dsa,
    Ecdsa,
    Ed25519,
}

impl KeyAlgorithm {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rsa => "rsa",
            Self::Dsa => "dsa",
            Self::Ecdsa => "ecdsa",
            Self::Ed25519 => "ed25519",
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "rsa" => Ok(Self::Rsa),
            "dsa" => Ok(Self::Dsa),
            "ecdsa" => Ok(Self::Ecdsa),
            "ed25519" => Ok(Self::Ed25519),
            other => Err(Error::UnsupportedAlgorithm(format!(
                "unknown key algorithm '{other}'"
            ))),
        }
    }
}

/// Public key wire form handled by a [`KeyManager`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum KeyPairKind {
    /// OpenSSH `authorized_keys` lines.
    #[default]
    Ssh,
    /// PEM X.509 certificates.
    X509,
}

impl FromStr for KeyPairKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "" | "ssh" => Ok(Self::Ssh),
            "x509" => Ok(Self::X509),
            other => Err(Error::UnsupportedAlgorithm(format!(
                "unknown keypair type '{other}'"
            ))),
        }
    }
}

/// A freshly created keypair. The caller owns the private half.
pub struct KeyPair {
    pub kind: KeyPairKind,
    pub algorithm: KeyAlgorithm,
    pub private_key: SecretString,
    pub public_key: String,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("kind", &self.kind)
            .field("algorithm", &self.algorithm)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy)]
pub enum KeyManager {
    Ssh(SshKeyManager),
    X509(X509KeyManager),
}

impl KeyManager {
    /// Manager for `kind`, with the default X.509 fingerprint mode.
    #[must_use]
    pub fn for_kind(kind: KeyPairKind) -> Self {
        Self::with_x509_mode(kind, X509FingerprintMode::default())
    }

    #[must_use]
    pub fn with_x509_mode(kind: KeyPairKind, mode: X509FingerprintMode) -> Self {
        match kind {
            KeyPairKind::Ssh => Self::Ssh(SshKeyManager::new()),
            KeyPairKind::X509 => Self::X509(X509KeyManager::new(mode)),
        }
    }

    #[must_use]
    pub fn kind(&self) -> KeyPairKind {
        match self {
            Self::Ssh(_) => KeyPairKind::Ssh,
            Self::X509(_) => KeyPairKind::X509,
        }
    }

    /// # Errors
    ///
    /// See [`SshKeyManager::create_key_pair`] and
    /// [`X509KeyManager::create_key_pair`].
    pub fn create_key_pair(&self, algorithm: KeyAlgorithm, bits: usize) -> Result<KeyPair> {
        match self {
            Self::Ssh(manager) => manager.create_key_pair(algorithm, bits),
            Self::X509(manager) => manager.create_key_pair(algorithm, bits),
        }
    }

    /// Deterministic fingerprint of the public material.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the public key cannot be parsed.
    pub fn fingerprint(&self, public_key: &str) -> Result<String> {
        match self {
            Self::Ssh(manager) => manager.fingerprint(public_key),
            Self::X509(manager) => manager.fingerprint(public_key),
        }
    }
}
