//! Thin wrappers around the cryptographic primitives Hawk needs: keyed MACs,
//! streaming digests, constant-time comparison, and nonce generation.

use crate::credentials::Algorithm;
use crate::error::Error;
use ring::rand::SecureRandom;
use ring::{constant_time, digest, hmac, rand};

impl Algorithm {
    pub(crate) fn hmac_algorithm(self) -> hmac::Algorithm {
        match self {
            Algorithm::Sha1 => hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
            Algorithm::Sha256 => hmac::HMAC_SHA256,
        }
    }

    pub(crate) fn digest_algorithm(self) -> &'static digest::Algorithm {
        match self {
            Algorithm::Sha1 => &digest::SHA1_FOR_LEGACY_USE_ONLY,
            Algorithm::Sha256 => &digest::SHA256,
        }
    }
}

/// Sign `data` with an HMAC keyed by `key`.
pub(crate) fn hmac_sign(algorithm: Algorithm, key: &[u8], data: &[u8]) -> Vec<u8> {
    let key = hmac::Key::new(algorithm.hmac_algorithm(), key);
    hmac::sign(&key, data).as_ref().to_vec()
}

/// Create a streaming digest context for the given algorithm.
pub(crate) fn hasher(algorithm: Algorithm) -> digest::Context {
    digest::Context::new(algorithm.digest_algorithm())
}

/// Compare two byte strings without leaking the position of the first
/// difference.  Length is not secret.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    constant_time::verify_slices_are_equal(a, b).is_ok()
}

const NONCE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Create a random alphanumeric string of `len` characters.
pub(crate) fn random_string(len: usize) -> Result<String, Error> {
    let mut bytes = vec![0u8; len];
    rand::SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| Error::Crypto)?;
    Ok(bytes
        .iter()
        .map(|b| NONCE_CHARS[(*b as usize) % NONCE_CHARS.len()] as char)
        .collect())
}
