//! Canonicalization and MAC computation.  The normalized string produced
//! here is the exclusive input to every MAC either side computes, so its
//! byte layout is what interoperability hangs on.

use crate::artifacts::Artifacts;
use crate::b64;
use crate::credentials::Credentials;
use crate::crypto;
use base64::Engine;
use std::fmt::Write;

/// The protocol generation, as it appears in the `hawk.1.` prefix.
const HAWK_VERSION: &str = "1";

/// The message kind a MAC covers, selecting the first line of the
/// normalized string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MacType {
    /// A request `Authorization` header.
    Header,
    /// A `Server-Authorization` response header.
    Response,
    /// A URL-embedded bewit.
    Bewit,
    /// An out-of-band message.
    Message,
}

impl MacType {
    fn as_str(self) -> &'static str {
        match self {
            MacType::Header => "header",
            MacType::Response => "response",
            MacType::Bewit => "bewit",
            MacType::Message => "message",
        }
    }
}

/// Produce the normalized string for one message.  Absent optional fields
/// become empty lines; the string always ends with a newline.
pub(crate) fn normalized_string(mac_type: MacType, artifacts: &Artifacts) -> String {
    let mut buf = String::new();
    let _ = write!(
        buf,
        "hawk.{}.{}\n{}\n{}\n{}\n{}\n{}\n{}\n",
        HAWK_VERSION,
        mac_type.as_str(),
        artifacts.ts,
        artifacts.nonce,
        artifacts.method.to_uppercase(),
        artifacts.resource,
        artifacts.host.to_lowercase(),
        artifacts.port,
    );
    buf.push_str(artifacts.hash.as_deref().unwrap_or(""));
    buf.push('\n');
    if let Some(ref ext) = artifacts.ext {
        buf.push_str(&escape_ext(ext));
    }
    buf.push('\n');
    if let Some(ref app) = artifacts.app {
        buf.push_str(app);
        buf.push('\n');
        buf.push_str(artifacts.dlg.as_deref().unwrap_or(""));
        buf.push('\n');
    }
    buf
}

// Backslashes must be doubled before newlines are rewritten, or the escape
// character itself would be re-escaped.
fn escape_ext(ext: &str) -> String {
    ext.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Compute the base64 MAC for one message under the given credentials.
pub fn mac(mac_type: MacType, credentials: &Credentials, artifacts: &Artifacts) -> String {
    let normalized = normalized_string(mac_type, artifacts);
    let digest = crypto::hmac_sign(
        credentials.algorithm,
        &credentials.key,
        normalized.as_bytes(),
    );
    b64::STANDARD.encode(digest)
}

/// Compute the timestamp MAC carried in stale-timestamp challenges.  The
/// timestamp is taken as a string so the client verifies the exact bytes the
/// server sent.
pub fn ts_mac(credentials: &Credentials, ts: &str) -> String {
    let normalized = format!("hawk.{HAWK_VERSION}.ts\n{ts}\n");
    let digest = crypto::hmac_sign(
        credentials.algorithm,
        &credentials.key,
        normalized.as_bytes(),
    );
    b64::STANDARD.encode(digest)
}
