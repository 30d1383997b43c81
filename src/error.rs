use thiserror::Error;

/// Failures reported by the credential and token operations.
///
/// None of these are retried internally. Only
/// [`Error::RevocationStoreUnavailable`] describes a condition that may clear
/// up on its own; every other variant is definitive for the given input.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed encoding: wrong field count, bad base64, wrong PEM block type.
    #[error("invalid format: {0}")]
    Format(String),

    /// Requested key algorithm or curve is not implemented.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Random source exhaustion, key generation or signing failure.
    #[error("crypto failure: {0}")]
    Crypto(String),

    /// Signature does not verify against any keyring candidate.
    #[error("verification failed: {0}")]
    Verification(String),

    /// Decoded claims are missing or malformed.
    #[error("invalid claims: {0}")]
    Claims(String),

    /// Signature is valid but the token id has a revocation record.
    #[error("token {0} is revoked")]
    Revoked(String),

    /// Signature is valid but the `exp` claim lies in the past.
    #[error("token {0} expired")]
    Expired(String),

    /// The revocation lookup could not give a definitive answer.
    #[error("revocation store unavailable: {0}")]
    RevocationStoreUnavailable(String),

    /// X.509 certificate issuance is not implemented.
    #[error("unable to generate certificates")]
    CertificateGeneration,
}

/// Result type alias for credential and token operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Format("expected 3 fields".into());
        assert_eq!(err.to_string(), "invalid format: expected 3 fields");

        let err = Error::Revoked("abc".into());
        assert_eq!(err.to_string(), "token abc is revoked");

        let err = Error::CertificateGeneration;
        assert_eq!(err.to_string(), "unable to generate certificates");
    }
}
