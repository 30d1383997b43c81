pub mod keys;
pub mod password;
pub mod pem;
pub mod ssh;
pub mod x509;

pub use keys::{KeyAlgorithm, KeyManager, KeyPair, KeyPairKind};
pub use password::{check_password, hash_password, Credential};
pub use pem::{load_pem_keys, PrivateKey, SigningKeyKind};
pub use ssh::SshKeyManager;
pub use x509::{X509FingerprintMode, X509KeyManager};
