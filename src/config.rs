use std::time::Duration;

pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);
pub const DEFAULT_REVOCATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Token issuance and validation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    /// Added to the issue time to produce `exp`.
    pub lifetime: Duration,
    /// Upper bound on a single revocation lookup.
    pub revocation_timeout: Duration,
    /// Reject tokens whose `exp` has passed.
    pub enforce_expiry: bool,
    /// Clock skew tolerated when checking `exp`.
    pub leeway: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            lifetime: DEFAULT_TOKEN_LIFETIME,
            revocation_timeout: DEFAULT_REVOCATION_TIMEOUT,
            enforce_expiry: true,
            leeway: Duration::ZERO,
        }
    }
}

impl TokenConfig {
    #[must_use]
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    #[must_use]
    pub fn with_revocation_timeout(mut self, timeout: Duration) -> Self {
        self.revocation_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_enforce_expiry(mut self, enforce: bool) -> Self {
        self.enforce_expiry = enforce;
        self
    }

    #[must_use]
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TokenConfig::default();
        assert_eq!(config.lifetime, Duration::from_secs(3600));
        assert_eq!(config.revocation_timeout, Duration::from_secs(5));
        assert!(config.enforce_expiry);
        assert_eq!(config.leeway, Duration::ZERO);
    }

    #[test]
    fn test_builders() {
        let config = TokenConfig::default()
            .with_lifetime(Duration::from_secs(60))
            .with_revocation_timeout(Duration::from_millis(250))
            .with_enforce_expiry(false)
            .with_leeway(Duration::from_secs(30));
        assert_eq!(config.lifetime, Duration::from_secs(60));
        assert_eq!(config.revocation_timeout, Duration::from_millis(250));
        assert!(!config.enforce_expiry);
        assert_eq!(config.leeway, Duration::from_secs(30));
    }
}
