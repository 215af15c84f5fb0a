//! Password hashing for registered users
//!
//! Passwords are stored as hex `SHA-256(salt || password)` next to a random
//! per-user salt, matching the `password_hash` / `password_salt` columns of
//! the `users` table.

use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// Stored form of a password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub hash: String,
    pub salt: String,
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> PasswordHash {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt = to_hex(&salt);

    PasswordHash {
        hash: digest(&salt, password),
        salt,
    }
}

/// Check a password against its stored hash and salt
pub fn verify_password(password: &str, hash: &str, salt: &str) -> bool {
    let calculated = digest(salt, password);
    // Compare every byte so timing does not reveal the mismatch position
    calculated.len() == hash.len()
        && calculated
            .bytes()
            .zip(hash.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
