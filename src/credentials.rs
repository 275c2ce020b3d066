//! Credentials: a client id, a shared key, and the digest algorithm both
//! sides agreed on out of band.

use crate::error::Error;
use std::convert::TryFrom;
use std::fmt;

/// The digest algorithm backing a credential's MACs and payload hashes.
///
/// Hawk deployments name algorithms as strings; `TryFrom` normalizes the
/// equivalent spellings to this tag at the boundary, and anything else is
/// [`Error::UnknownAlgorithm`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Algorithm {
    Sha1,
    Sha256,
}

impl Algorithm {
    /// The canonical lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Algorithm {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self, Error> {
        if name.eq_ignore_ascii_case("sha1")
            || name.eq_ignore_ascii_case("sha-1")
            || name.eq_ignore_ascii_case("sha")
        {
            Ok(Algorithm::Sha1)
        } else if name.eq_ignore_ascii_case("sha256") || name.eq_ignore_ascii_case("sha-256") {
            Ok(Algorithm::Sha256)
        } else {
            Err(Error::UnknownAlgorithm)
        }
    }
}

impl TryFrom<&[u8]> for Algorithm {
    type Error = Error;

    fn try_from(name: &[u8]) -> Result<Self, Error> {
        std::str::from_utf8(name)
            .map_err(|_| Error::UnknownAlgorithm)
            .and_then(Algorithm::try_from)
    }
}

/// Hawk credentials: an id, the key associated with that id, and the digest
/// algorithm.  The key length should suit the algorithm; passwords should
/// *not* be used as keys.
#[derive(Clone)]
pub struct Credentials {
    pub id: String,
    pub key: Vec<u8>,
    pub algorithm: Algorithm,
}

impl Credentials {
    pub fn new<S, B>(id: S, key: B, algorithm: Algorithm) -> Credentials
    where
        S: Into<String>,
        B: Into<Vec<u8>>,
    {
        Credentials {
            id: id.into(),
            key: key.into(),
            algorithm,
        }
    }

    /// Check the shape a credentials record must have before it can verify
    /// anything: a non-empty id and a non-empty key.
    pub(crate) fn check(&self) -> Result<(), Error> {
        if self.id.is_empty() || self.key.is_empty() {
            return Err(Error::InvalidCredentials);
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    // keys stay out of logs
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("id", &self.id)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}
