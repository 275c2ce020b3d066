//! The artifacts record: every field that feeds the MAC for one message.
//! Whatever is present when a MAC is computed must be present, and equal,
//! when it is verified.

/// The fields a MAC covers for a single request, response, bewit, or
/// message.  `mac` and `hash` are carried in their base64 wire form so that
/// verification compares the exact bytes that traveled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Artifacts {
    /// Timestamp, integer seconds since the epoch.
    pub ts: u64,
    /// Per-request nonce; empty for bewits.
    pub nonce: String,
    /// Uppercased request method.
    pub method: String,
    /// Request target: path plus `?query` when a query is present.
    pub resource: String,
    /// Lowercase host (lowercasing happens at canonicalization).
    pub host: String,
    /// Port, 1..65535.
    pub port: u16,
    /// Payload hash, base64.
    pub hash: Option<String>,
    /// Opaque application data.
    pub ext: Option<String>,
    /// Application id; `dlg` is only meaningful when this is set.
    pub app: Option<String>,
    /// Delegated-by id.
    pub dlg: Option<String>,
    /// Credential id the message was authenticated with.
    pub id: String,
    /// The MAC received on the wire, base64.
    pub mac: Option<String>,
}
