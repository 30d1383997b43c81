//! # Warden
//!
//! Credential hashing, keypair fingerprinting and bearer tokens for an
//! identity service.
//!
//! - [`crypto::password`] hashes passwords with scrypt into
//!   `scrypt,<salt>,<digest>` credentials.
//! - [`crypto::KeyManager`] issues SSH keypairs and fingerprints SSH keys and
//!   X.509 certificates.
//! - [`token::TokenManager`] signs and validates tokens against an ordered
//!   keyring and an external revocation store.
//!
//! The `warden` binary in `src/bin` exposes each of these on the command line.

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod token;

pub use config::TokenConfig;
pub use error::{Error, Result};
