use warden::crypto::keys::{KeyAlgorithm, KeyManager, KeyPairKind, DEFAULT_KEY_BITS};
use warden::crypto::password::{check_password_async, hash_password_async, Credential};
use warden::Error;

#[tokio::test]
async fn concurrent_hashing_off_the_runtime() {
    let mut tasks = Vec::new();
    for i in 0..4 {
        tasks.push(tokio::spawn(async move {
            let password = format!("password-{i}");
            let encoded = hash_password_async(password.clone()).await.unwrap();
            let matches = check_password_async(password, encoded.clone()).await.unwrap();
            (encoded, matches)
        }));
    }

    let mut salts = Vec::new();
    for task in tasks {
        let (encoded, matches) = task.await.unwrap();
        assert!(matches);
        let credential = Credential::parse(&encoded).unwrap();
        assert_eq!(credential.salt.len(), 32);
        assert_eq!(credential.digest.len(), 32);
        salts.push(credential.salt);
    }
    salts.sort();
    salts.dedup();
    assert_eq!(salts.len(), 4);
}

#[test]
fn ssh_keypair_fingerprint_is_stable_across_managers() {
    let pair = KeyManager::for_kind(KeyPairKind::Ssh)
        .create_key_pair(KeyAlgorithm::Rsa, DEFAULT_KEY_BITS)
        .unwrap();
    let a = KeyManager::for_kind(KeyPairKind::Ssh).fingerprint(&pair.public_key).unwrap();
    let b = KeyManager::for_kind(KeyPairKind::Ssh).fingerprint(&pair.public_key).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.split(':').count(), 16);
}

#[test]
fn x509_manager_rejects_ssh_keys() {
    let pair = KeyManager::for_kind(KeyPairKind::Ssh)
        .create_key_pair(KeyAlgorithm::Rsa, DEFAULT_KEY_BITS)
        .unwrap();
    assert!(matches!(
        KeyManager::for_kind(KeyPairKind::X509).fingerprint(&pair.public_key),
        Err(Error::Format(_))
    ));
}
