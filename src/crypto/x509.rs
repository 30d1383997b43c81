use crate::crypto::keys::{KeyAlgorithm, KeyPair};
use crate::error::{Error, Result};
use sha1::{Digest, Sha1};
use x509_parser::pem::Pem;
use x509_parser::prelude::*;

pub const CERTIFICATE: &str = "CERTIFICATE";

/// How certificate fingerprints are computed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum X509FingerprintMode {
    /// Lowercase hex SHA-1 of the certificate DER.
    #[default]
    Sha1,
    /// Hex of the certificate DER followed by the SHA-1 of empty input.
    ///
    /// Matches fingerprints recorded by older deployments.
    Legacy,
}

/// Fingerprints X.509 certificates. Certificate issuance is not implemented.
#[derive(Debug, Default, Clone, Copy)]
pub struct X509KeyManager {
    mode: X509FingerprintMode,
}

impl X509KeyManager {
    #[must_use]
    pub fn new(mode: X509FingerprintMode) -> Self {
        Self { mode }
    }

    #[must_use]
    pub fn mode(&self) -> X509FingerprintMode {
        self.mode
    }

    /// Always fails with [`Error::CertificateGeneration`].
    ///
    /// # Errors
    ///
    /// Always.
    pub fn create_key_pair(&self, _algorithm: KeyAlgorithm, _bits: usize) -> Result<KeyPair> {
        Err(Error::CertificateGeneration)
    }

    /// Fingerprint a PEM `CERTIFICATE`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the PEM cannot be decoded, the block is not
    /// a certificate or the certificate DER does not parse.
    pub fn fingerprint(&self, certificate: &str) -> Result<String> {
        let (pem, _) = Pem::read(std::io::Cursor::new(certificate.as_bytes()))
            .map_err(|e| Error::Format(format!("unable to decode PEM file: {e}")))?;

        if pem.label != CERTIFICATE {
            return Err(Error::Format(format!(
                "unexpected PEM file type '{}'",
                pem.label
            )));
        }

        let (rest, _) = X509Certificate::from_der(&pem.contents)
            .map_err(|e| Error::Format(format!("invalid certificate: {e}")))?;
        let raw = &pem.contents[..pem.contents.len() - rest.len()];

        let fingerprint = match self.mode {
            X509FingerprintMode::Sha1 => hex(&Sha1::digest(raw)),
            X509FingerprintMode::Legacy => {
                let mut out = hex(raw);
                out.push_str(&hex(&Sha1::digest(b"")));
                out
            }
        };
        Ok(fingerprint)
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CERTIFICATE_PEM: &str = "-----BEGIN CERTIFICATE-----
MIIDlzCCAn+gAwIBAgIMWdSlWAJNWKeXgryHMA0GCSqGSIb3DQEBCwUAMBoxGDAW
BgNVBAMTD0RhbmllbCBCZXJyYW5nZTAeFw0xNzEwMDQwOTA5NDRaFw0xODEwMDQw
OTA5NDRaMDkxEjAQBgNVBAMTCWxvY2FsaG9zdDEjMCEGA1UEChMaTmFtZSAgb2Yg
eW91ciBvcmdhbml6YXRpb24wggEiMA0GCSqGSIb3DQEBAQUAA4IBDwAwggEKAoIB
AQDV1PNjgt1GRx/TDu80Jri82E4J/Ryd8LJjTXDWu73/kT7S6ixDEfn967PHvyUU
ejIuyMtz4vJjTOjn7rhNNlsiu7F50P2pMPyntHND4B47f9lwBnOH3MFXoqT1h3Qk
PthI2I5SmaGxaP63iXCnaoH9Ea1jWS+rOHLxRKdOOgSqWM5CZscEyDeUk/z/0UeA
96c30bVoDcGdsmXNnMYDTb63Dvqe1jH3g8C1+ndSTvqGYmQU3yQRPFMlF2+2Zpwr
qt4+5X1hKwZ4DF+sPLa/FZDRhJ8NgdjVKpzs3s98m/w5rPTYBkYigl5bU6dUcxDk
RTx1RpRmPgr1mtpXtKjU6uMLAgMBAAGjgb0wgbowDAYDVR0TAQH/BAIwADBEBgNV
HREEPTA7ggpsb2NhbGhvc3Q2ghVsb2NhbGhvc3QubG9jYWxkb21haW6HBH8AAAGH
EAAAAAAAAAAAAAAAAAAAAAEwEwYDVR0lBAwwCgYIKwYBBQUHAwEwDwYDVR0PAQH/
BAUDAwegADAdBgNVHQ4EFgQUor1GLDA08gjMpe2wG3DQJ8a9X/0wHwYDVR0jBBgw
FoAU8FHn9nygbm2i2RTS4JcDBNjsoYwwDQYJKoZIhvcNAQELBQADggEBAH0FVqhj
qjv756tlpVNNoJ1lpYDWiPLPCxSuYpHqh8GTh5iWlSDe5Ely46xX73M4NosV0vCV
w+EVYM7qmq7gmXK9BMiSuIM8ewc9sW8AhOzxy/pCAsU15GFPYlIQedFf1bnF4CBY
om7/axOF2eaUmzNmcHzkk8AqIl6z9X14RWEmX1d5wflawNfTC3yuyi0xRphZWdub
Ba98ZR2eqC72wwwJesoWjg9XmE8gXa6CvlRLuxbrDXYVDXaGDrnAk21tiyImIP/7
s1bL4DksmLiTydixSXU0CjMYm0N/6/ZTcHaAaWdeCUGnJDaPU7NqB07MDqUoORht
JhETrcxrlILRO6s=
-----END CERTIFICATE-----
";

    const LEGACY_FINGERPRINT: &str = concat!(
        "308203973082027fa003020102020c59d4a558024d58a79782bc87300d06092a864886",
        "f70d01010b0500301a311830160603550403130f44616e69656c2042657272616e6765",
        "301e170d3137313030343039303934345a170d3138313030343039303934345a303931",
        "123010060355040313096c6f63616c686f737431233021060355040a131a4e616d6520",
        "206f6620796f7572206f7267616e697a6174696f6e30820122300d06092a864886f70d",
        "01010105000382010f003082010a0282010100d5d4f36382dd46471fd30eef3426b8bc",
        "d84e09fd1c9df0b2634d70d6bbbdff913ed2ea2c4311f9fdebb3c7bf25147a322ec8cb",
        "73e2f2634ce8e7eeb84d365b22bbb179d0fda930fca7b47343e01e3b7fd970067387dc",
        "c157a2a4f58774243ed848d88e5299a1b168feb78970a76a81fd11ad63592fab3872f1",
        "44a74e3a04aa58ce4266c704c8379493fcffd14780f7a737d1b5680dc19db265cd9cc6",
        "034dbeb70efa9ed631f783c0b5fa77524efa86626414df24113c5325176fb6669c2baa",
        "de3ee57d612b06780c5fac3cb6bf1590d1849f0d81d8d52a9cecdecf7c9bfc39acf4d8",
        "064622825e5b53a7547310e4453c754694663e0af59ada57b4a8d4eae30b0203010001",
        "a381bd3081ba300c0603551d130101ff0402300030440603551d11043d303b820a6c6f",
        "63616c686f73743682156c6f63616c686f73742e6c6f63616c646f6d61696e87047f00",
        "000187100000000000000000000000000000000130130603551d25040c300a06082b06",
        "010505070301300f0603551d0f0101ff0405030307a000301d0603551d0e04160414a2",
        "bd462c3034f208cca5edb01b70d027c6bd5ffd301f0603551d23041830168014f051e7",
        "f67ca06e6da2d914d2e0970304d8eca18c300d06092a864886f70d01010b0500038201",
        "01007d0556a863aa3bfbe7ab65a5534da09d65a580d688f2cf0b14ae6291ea87c19387",
        "98969520dee44972e3ac57ef7338368b15d2f095c3e11560ceea9aaee09972bd04c892",
        "b8833c7b073db16f0084ecf1cbfa4202c535e4614f62521079d15fd5b9c5e02058a26e",
        "ff6b1385d9e6949b3366707ce493c02a225eb3f57d784561265f5779c1f95ac0d7d30b",
        "7caeca2d3146985959db9b05af7c651d9ea82ef6c30c097aca168e0f57984f205dae82",
        "be544bbb16eb0d76150d76860eb9c0936d6d8b222620fffbb356cbe0392c98b893c9d8",
        "b14975340a33189b437febf65370768069675e0941a724368f53b36a074ecc0ea52839",
        "186d261113adcc6b9482d13babda39a3ee5e6b4b0d3255bfef95601890afd80709"
    );

    #[test]
    fn sha1_fingerprint() {
        let manager = X509KeyManager::default();
        assert_eq!(
            manager.fingerprint(CERTIFICATE_PEM).unwrap(),
            "6f9212472df3698d6545ac534c872726afe6032b"
        );
    }

    #[test]
    fn legacy_fingerprint_matches_recorded_value() {
        let manager = X509KeyManager::new(X509FingerprintMode::Legacy);
        assert_eq!(manager.fingerprint(CERTIFICATE_PEM).unwrap(), LEGACY_FINGERPRINT);
    }

    #[test]
    fn rejects_non_certificate_blocks() {
        let manager = X509KeyManager::default();
        let pem = CERTIFICATE_PEM.replace("CERTIFICATE", "PUBLIC KEY");
        assert!(matches!(
            manager.fingerprint(&pem),
            Err(Error::Format(msg)) if msg.contains("PUBLIC KEY")
        ));
    }

    #[test]
    fn rejects_missing_pem() {
        let manager = X509KeyManager::default();
        assert!(matches!(
            manager.fingerprint("not a certificate"),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn key_generation_is_unavailable() {
        let manager = X509KeyManager::default();
        assert!(matches!(
            manager.create_key_pair(KeyAlgorithm::Rsa, 2048),
            Err(Error::CertificateGeneration)
        ));
    }
}
