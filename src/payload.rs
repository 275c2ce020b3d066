//! Payload hashing.  The hash is an unkeyed digest over a framed body, kept
//! distinct from the MAC; it ties the entity body to the signed header.

use crate::b64;
use crate::credentials::Algorithm;
use crate::crypto;
use base64::Engine;
use ring::digest;

/// A utility for hashing payloads.  Feed the entity body in as many chunks
/// as convenient, then pass the `finish` result to a request or response.
pub struct PayloadHasher {
    context: digest::Context,
}

impl PayloadHasher {
    /// Create a new hasher for the given content type.  The `content_type`
    /// should already be stripped of parameters (everything from the first
    /// `;`).  The algorithm must match the credentials the message will be
    /// signed with.
    pub fn new(content_type: &str, algorithm: Algorithm) -> Self {
        let mut hasher = PayloadHasher {
            context: crypto::hasher(algorithm),
        };
        hasher.update(b"hawk.1.payload\n");
        hasher.update(content_type.as_bytes());
        hasher.update(b"\n");
        hasher
    }

    /// Hash a complete payload in one call.
    pub fn hash<B: AsRef<[u8]>>(content_type: &str, algorithm: Algorithm, payload: B) -> String {
        let mut hasher = PayloadHasher::new(content_type, algorithm);
        hasher.update(payload.as_ref());
        hasher.finish()
    }

    /// Update the hash with more of the body.
    pub fn update<B: AsRef<[u8]>>(&mut self, data: B) {
        self.context.update(data.as_ref());
    }

    /// Finish hashing and return the base64 digest.
    ///
    /// A trailing newline is appended to the payload, as the wire format
    /// requires.
    pub fn finish(mut self) -> String {
        self.update(b"\n");
        b64::STANDARD.encode(self.context.finish().as_ref())
    }
}
