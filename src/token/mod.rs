//! Bearer tokens signed with a rotating keyring.
//!
//! Tokens are compact JWS strings. The first key of the [`Keyring`] signs new
//! tokens and every key is tried, in order, when validating. Validation ends
//! with a [`RevocationStore`] lookup bounded by
//! [`TokenConfig::revocation_timeout`](crate::config::TokenConfig::revocation_timeout).

pub mod algorithm;
pub mod jwt;
pub mod keyring;
pub mod manager;
pub mod revocation;

pub use algorithm::{KeyFamily, SignatureAlgorithm};
pub use keyring::{Keyring, SigningKey};
pub use manager::{Token, TokenManager, TokenScope, TokenSubject};
pub use revocation::{MemoryRevocationStore, RevocationStore, StoreError};
