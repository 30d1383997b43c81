//! Compact JWS encoding.

use crate::error::{Error, Result};
use crate::token::algorithm::SignatureAlgorithm;
use crate::token::keyring::SigningKey;
use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{Deserialize, Serialize};

pub const TYP: &str = "JWT";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl Header {
    fn new(algorithm: SignatureAlgorithm) -> Self {
        Self {
            alg: algorithm.as_str().to_string(),
            typ: Some(TYP.to_string()),
        }
    }
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_vec(value)
        .map_err(|e| Error::Format(format!("unable to encode token JSON: {e}")))?;
    Ok(Base64UrlUnpadded::encode_string(&json))
}

fn b64d(segment: &str) -> Result<Vec<u8>> {
    Base64UrlUnpadded::decode_vec(segment)
        .map_err(|_| Error::Format("invalid base64url encoding in token".into()))
}

/// Sign `claims` with `key`, producing `header.claims.signature`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedAlgorithm`] if the key has no signature
/// algorithm and [`Error::Crypto`] if signing fails.
pub fn encode<T: Serialize>(key: &SigningKey, claims: &T) -> Result<String> {
    let algorithm = key.algorithm()?;
    let header_b64 = b64e_json(&Header::new(algorithm))?;
    let claims_b64 = b64e_json(claims)?;
    let signing_input = format!("{header_b64}.{claims_b64}");

    let signature = key.sign(signing_input.as_bytes())?;
    let signature_b64 = Base64UrlUnpadded::encode_string(&signature);

    Ok(format!("{signing_input}.{signature_b64}"))
}

/// A token split into its segments, not yet verified.
#[derive(Debug)]
pub struct Compact<'a> {
    pub header: Header,
    signing_input: &'a str,
    claims_b64: &'a str,
    signature: Vec<u8>,
}

impl<'a> Compact<'a> {
    /// # Errors
    ///
    /// Returns [`Error::Format`] unless `token` is three base64url segments
    /// with a JSON header.
    pub fn parse(token: &'a str) -> Result<Self> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::Format("token must have three segments".into()));
        };

        let header: Header = serde_json::from_slice(&b64d(header_b64)?)
            .map_err(|e| Error::Format(format!("invalid token header: {e}")))?;
        let signature = b64d(signature_b64)?;

        Ok(Self {
            header,
            signing_input: &token[..header_b64.len() + 1 + claims_b64.len()],
            claims_b64,
            signature,
        })
    }

    /// Verify the signature with `key`, honouring the header `alg`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedAlgorithm`] for an unknown `alg` and
    /// [`Error::Verification`] if `key` does not accept the signature.
    pub fn verify(&self, key: &SigningKey) -> Result<()> {
        let algorithm = SignatureAlgorithm::from_header(&self.header.alg)?;
        key.verify(algorithm, self.signing_input.as_bytes(), &self.signature)
    }

    /// Decode the claims segment. Only call after [`Self::verify`] succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Claims`] if the segment is not a JSON object.
    pub fn claims<T: for<'de> Deserialize<'de>>(&self) -> Result<T> {
        let bytes = Base64UrlUnpadded::decode_vec(self.claims_b64)
            .map_err(|_| Error::Claims("invalid base64url encoding in claims".into()))?;
        serde_json::from_slice(&bytes).map_err(|e| Error::Claims(format!("invalid claims: {e}")))
    }
}
