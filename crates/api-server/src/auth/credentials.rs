//! Credential verification
//!
//! The server does not own user records. Logins are checked against a
//! [`CredentialProvider`]; the default provider carries the single admin
//! account from the environment, hashing the password at construction so
//! the plaintext is not kept around.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::config;

pub trait CredentialProvider: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Admin account from `TASKBOARD_ADMIN_USER` / `TASKBOARD_ADMIN_PASSWORD`.
pub struct EnvCredentials {
    username: String,
    password_hash: String,
}

impl EnvCredentials {
    pub fn new(username: impl Into<String>, password: &str) -> Self {
        Self {
            username: username.into(),
            password_hash: hash_password(password),
        }
    }

    pub fn from_env() -> Self {
        Self::new(config::admin_username(), &config::admin_password())
    }
}

impl CredentialProvider for EnvCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && verify_password(&self.password_hash, password)
    }
}

fn hash_password(password: &str) -> String {
    let mut salt = [0_u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();

    format!(
        "v1${}${}",
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(digest)
    )
}

fn verify_password(stored_hash: &str, password: &str) -> bool {
    let mut parts = stored_hash.split('$');
    let (Some("v1"), Some(encoded_salt), Some(encoded_digest)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    let Ok(salt) = URL_SAFE_NO_PAD.decode(encoded_salt) else {
        return false;
    };
    let Ok(expected_digest) = URL_SAFE_NO_PAD.decode(encoded_digest) else {
        return false;
    };

    let mut hasher = Sha256::new();
    hasher.update(&salt);
    hasher.update(password.as_bytes());
    let actual_digest = hasher.finalize();
    expected_digest == actual_digest.as_slice()
}
