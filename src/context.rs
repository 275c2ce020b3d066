//! Collaborator seams.  The library never stores credentials and never
//! remembers nonces; both concerns are injected through these traits and
//! called at fixed points in the verification pipeline (resolver first, then
//! the nonce check, after the MAC has already been verified).

use crate::credentials::Credentials;

/// Looks up the credentials for an id presented by a client.
///
/// Returning `None` means the id is unknown or the lookup failed; the
/// pipeline reports both as `Unknown credentials`.  Implementations must be
/// safe for concurrent calls.
pub trait CredentialsResolver: Sync {
    fn resolve(&self, id: &str) -> Option<Credentials>;
}

impl<F> CredentialsResolver for F
where
    F: Fn(&str) -> Option<Credentials> + Sync,
{
    fn resolve(&self, id: &str) -> Option<Credentials> {
        self(id)
    }
}

/// Records nonces and rejects ones it has seen before.
///
/// The pipeline treats any `Err` as a replay.  The store behind this trait
/// is the only shared resource in the protocol; it must be safe for
/// concurrent access.
pub trait NonceValidator: Sync {
    fn validate(&self, key: &[u8], nonce: &str, ts: u64) -> Result<(), ()>;
}

impl<F> NonceValidator for F
where
    F: Fn(&[u8], &str, u64) -> Result<(), ()> + Sync,
{
    fn validate(&self, key: &[u8], nonce: &str, ts: u64) -> Result<(), ()> {
        self(key, nonce, ts)
    }
}
