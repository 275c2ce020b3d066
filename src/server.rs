//! The server side of the protocol: request, bewit, message, and payload
//! verification, plus `Server-Authorization` generation.
//!
//! Every pipeline short-circuits on its first failure and classifies it with
//! a distinct error kind; MACs and hashes are always compared in constant
//! time.

use crate::artifacts::Artifacts;
use crate::bewit::{self, Bewit};
use crate::client::{MessageAuthorization, ResponseOptions};
use crate::clock::{offset_now_ms, Clock};
use crate::context::{CredentialsResolver, NonceValidator};
use crate::credentials::Credentials;
use crate::crypto;
use crate::error::Error;
use crate::header::{self, AUTHORIZATION_KEYS};
use crate::mac::{self, MacType};
use crate::payload::PayloadHasher;
use crate::request::{RawRequest, RequestOptions};
use log::debug;
use std::fmt::Write;

/// Maximum accepted request-target length for bewit requests, in bytes.
const MAX_RESOURCE_LENGTH: usize = 4096;

/// Options for the server-side verification pipelines.
pub struct VerifyOptions<'a> {
    /// Request payload; when set, the header must carry a matching hash.
    pub payload: Option<&'a [u8]>,
    /// Accepted clock skew, seconds, symmetric about now.
    pub timestamp_skew_sec: u64,
    /// Signed adjustment applied to the clock.
    pub localtime_offset_ms: i64,
    /// Replay protection; nonces are only checked when this is set.
    pub nonce_validator: Option<&'a dyn NonceValidator>,
    /// Time source; defaults to the system clock.
    pub clock: Option<&'a dyn Clock>,
    /// Use this host regardless of what the request says.
    pub host: Option<&'a str>,
    /// Use this port regardless of what the request says.
    pub port: Option<u16>,
    /// Read the host from this header instead of `Host`.
    pub host_header_name: Option<&'a str>,
}

/// Seconds of clock skew accepted by default.
pub const DEFAULT_TIMESTAMP_SKEW_SEC: u64 = 60;

impl Default for VerifyOptions<'_> {
    fn default() -> Self {
        VerifyOptions {
            payload: None,
            timestamp_skew_sec: DEFAULT_TIMESTAMP_SKEW_SEC,
            localtime_offset_ms: 0,
            nonce_validator: None,
            clock: None,
            host: None,
            port: None,
            host_header_name: None,
        }
    }
}

impl<'a> VerifyOptions<'a> {
    /// Options with the protocol defaults: 60 seconds of skew, no offset, no
    /// payload or nonce checking.
    pub fn new() -> Self {
        Default::default()
    }

    fn request_options(&self) -> RequestOptions<'a> {
        RequestOptions {
            host_header_name: self.host_header_name,
            host: self.host,
            port: self.port,
        }
    }

    fn now_ms(&self) -> u64 {
        offset_now_ms(self.clock, self.localtime_offset_ms)
    }
}

/// A successfully authenticated request or message.
#[derive(Clone, Debug)]
pub struct Authenticated {
    pub credentials: Credentials,
    pub artifacts: Artifacts,
}

/// A successfully authenticated bewit request.
#[derive(Clone, Debug)]
pub struct BewitAuthenticated {
    pub credentials: Credentials,
    /// The decoded bewit attributes (id, expiry, ext).
    pub bewit: Bewit,
}

fn resolve(resolver: &dyn CredentialsResolver, id: &str) -> Result<Credentials, Error> {
    let credentials = resolver.resolve(id).ok_or(Error::UnknownCredentials)?;
    credentials.check()?;
    Ok(credentials)
}

fn stale_timestamp(now_ms: u64, credentials: &Credentials) -> Error {
    let now_sec = now_ms / 1000;
    Error::StaleTimestamp {
        ts: now_sec,
        tsm: mac::ts_mac(credentials, &now_sec.to_string()),
    }
}

fn check_timestamp(
    ts: u64,
    options: &VerifyOptions,
    credentials: &Credentials,
) -> Result<(), Error> {
    let now_ms = options.now_ms();
    let ts_ms = ts as u128 * 1000;
    let skew_ms = options.timestamp_skew_sec as u128 * 1000;
    if ts_ms.abs_diff(now_ms as u128) > skew_ms {
        debug!("timestamp {ts} outside skew window around {now_ms}ms");
        return Err(stale_timestamp(now_ms, credentials));
    }
    Ok(())
}

fn check_nonce(
    options: &VerifyOptions,
    credentials: &Credentials,
    nonce: &str,
    ts: u64,
) -> Result<(), Error> {
    if let Some(validator) = options.nonce_validator {
        validator
            .validate(&credentials.key, nonce, ts)
            .map_err(|_| {
                debug!("nonce {nonce} rejected as replayed");
                Error::InvalidNonce
            })?;
    }
    Ok(())
}

/// Authenticate a request carrying a Hawk `Authorization` header.
///
/// The pipeline: normalize the request, parse the header, require
/// `id`/`ts`/`nonce`/`mac`, resolve credentials, verify the MAC, verify the
/// payload hash when a payload is supplied, check the nonce when a validator
/// is supplied, and enforce the timestamp skew window.
pub fn authenticate(
    request: &RawRequest,
    resolver: &dyn CredentialsResolver,
    options: &VerifyOptions,
) -> Result<Authenticated, Error> {
    let view = request.view(&options.request_options())?;
    let parsed = header::parse(
        view.authorization.as_deref().unwrap_or(""),
        &AUTHORIZATION_KEYS,
    )?;

    let (id, ts, nonce, received_mac) =
        match (&parsed.id, &parsed.ts, &parsed.nonce, &parsed.mac) {
            (Some(id), Some(ts), Some(nonce), Some(mac)) => (id, ts, nonce, mac),
            _ => return Err(Error::MissingAttributes),
        };
    let ts: u64 = ts.parse().map_err(|_| Error::BadHeaderFormat)?;

    let credentials = resolve(resolver, id)?;

    let artifacts = Artifacts {
        ts,
        nonce: nonce.clone(),
        method: view.method,
        resource: view.resource,
        host: view.host,
        port: view.port,
        hash: parsed.hash.clone(),
        ext: parsed.ext.clone(),
        app: parsed.app.clone(),
        dlg: parsed.dlg.clone(),
        id: id.clone(),
        mac: Some(received_mac.clone()),
    };

    let expected = mac::mac(MacType::Header, &credentials, &artifacts);
    if !crypto::constant_time_eq(expected.as_bytes(), received_mac.as_bytes()) {
        debug!("request MAC mismatch for id {id}");
        return Err(Error::BadMac);
    }

    if let Some(payload) = options.payload {
        let received_hash = artifacts
            .hash
            .as_deref()
            .ok_or(Error::MissingRequiredPayloadHash)?;
        let expected_hash = PayloadHasher::hash("", credentials.algorithm, payload);
        if !crypto::constant_time_eq(expected_hash.as_bytes(), received_hash.as_bytes()) {
            return Err(Error::BadPayloadHash);
        }
    }

    check_nonce(options, &credentials, &artifacts.nonce, ts)?;
    check_timestamp(ts, options, &credentials)?;

    Ok(Authenticated {
        credentials,
        artifacts,
    })
}

/// Authenticate a GET or HEAD request carrying a bewit in its query string.
pub fn authenticate_bewit(
    request: &RawRequest,
    resolver: &dyn CredentialsResolver,
    options: &VerifyOptions,
) -> Result<BewitAuthenticated, Error> {
    let resource_len = request.path.len()
        + request.query.map(|q| q.len() + 1).unwrap_or(0);
    if resource_len > MAX_RESOURCE_LENGTH {
        return Err(Error::ResourcePathExceedsMaxLength);
    }
    if !request.method.eq_ignore_ascii_case("GET") && !request.method.eq_ignore_ascii_case("HEAD")
    {
        return Err(Error::InvalidMethod);
    }

    let view = request.view(&options.request_options())?;
    if view.authorization.is_some() {
        return Err(Error::MultipleAuthentications);
    }

    let found = bewit::extract(&view.resource).ok_or(Error::Unauthorized)?;
    if found.token.is_empty() {
        return Err(Error::EmptyBewit);
    }
    let bewit: Bewit = found.token.parse()?;

    if bewit.exp as u128 * 1000 <= options.now_ms() as u128 {
        debug!("bewit for id {} expired at {}", bewit.id, bewit.exp);
        return Err(Error::AccessExpired);
    }

    let credentials = resolve(resolver, &bewit.id)?;

    let artifacts = Artifacts {
        ts: bewit.exp,
        nonce: String::new(),
        method: "GET".to_string(),
        resource: found.url,
        host: view.host,
        port: view.port,
        ext: (!bewit.ext.is_empty()).then(|| bewit.ext.clone()),
        id: bewit.id.clone(),
        ..Default::default()
    };
    let expected = mac::mac(MacType::Bewit, &credentials, &artifacts);
    if !crypto::constant_time_eq(expected.as_bytes(), bewit.mac.as_bytes()) {
        debug!("bewit MAC mismatch for id {}", bewit.id);
        return Err(Error::BadMac);
    }

    Ok(BewitAuthenticated { credentials, bewit })
}

/// Authenticate an out-of-band message addressed to `host:port`.
pub fn authenticate_message(
    host: &str,
    port: u16,
    message: &[u8],
    authorization: &MessageAuthorization,
    resolver: &dyn CredentialsResolver,
    options: &VerifyOptions,
) -> Result<Authenticated, Error> {
    if authorization.id.is_empty()
        || authorization.nonce.is_empty()
        || authorization.hash.is_empty()
        || authorization.mac.is_empty()
    {
        return Err(Error::InvalidAuthorization);
    }

    let credentials = resolve(resolver, &authorization.id)?;

    let artifacts = Artifacts {
        ts: authorization.ts,
        nonce: authorization.nonce.clone(),
        host: host.to_string(),
        port,
        hash: Some(authorization.hash.clone()),
        id: authorization.id.clone(),
        mac: Some(authorization.mac.clone()),
        ..Default::default()
    };

    let expected = mac::mac(MacType::Message, &credentials, &artifacts);
    if !crypto::constant_time_eq(expected.as_bytes(), authorization.mac.as_bytes()) {
        debug!("message MAC mismatch for id {}", authorization.id);
        return Err(Error::BadMac);
    }

    let expected_hash = PayloadHasher::hash("", credentials.algorithm, message);
    let received_hash = artifacts.hash.as_deref().unwrap_or("");
    if !crypto::constant_time_eq(expected_hash.as_bytes(), received_hash.as_bytes()) {
        return Err(Error::BadMessageHash);
    }

    check_nonce(options, &credentials, &artifacts.nonce, artifacts.ts)?;
    check_timestamp(artifacts.ts, options, &credentials)?;

    Ok(Authenticated {
        credentials,
        artifacts,
    })
}

/// Verify a request payload after the fact, for hosts that stream the body
/// and can only hash it once authentication has already succeeded.
pub fn authenticate_payload(
    payload: &[u8],
    auth: &Authenticated,
    content_type: &str,
) -> Result<(), Error> {
    let expected = PayloadHasher::hash(content_type, auth.credentials.algorithm, payload);
    let received = auth.artifacts.hash.as_deref().unwrap_or("");
    if !crypto::constant_time_eq(expected.as_bytes(), received.as_bytes()) {
        return Err(Error::BadPayloadHash);
    }
    Ok(())
}

/// Compare an already-computed payload hash against the authenticated
/// artifacts.
pub fn authenticate_payload_hash(computed_hash: &str, artifacts: &Artifacts) -> Result<(), Error> {
    let received = artifacts.hash.as_deref().unwrap_or("");
    if !crypto::constant_time_eq(computed_hash.as_bytes(), received.as_bytes()) {
        return Err(Error::BadPayloadHash);
    }
    Ok(())
}

/// Build the `Server-Authorization` header for a previously authenticated
/// request.
///
/// The response MAC covers the request artifacts with the response's own
/// `hash` and `ext` substituted; the hash comes from `options.hash`, or is
/// derived from `options.payload` and `options.content_type`.
pub fn header(auth: &Authenticated, options: &ResponseOptions) -> Result<String, Error> {
    let mut artifacts = auth.artifacts.clone();
    artifacts.mac = None;
    artifacts.ext = options.ext.map(str::to_string);
    artifacts.hash = match (options.hash, options.payload) {
        (Some(hash), _) => Some(hash.to_string()),
        (None, Some(payload)) => Some(PayloadHasher::hash(
            options.content_type.unwrap_or(""),
            auth.credentials.algorithm,
            payload,
        )),
        (None, None) => None,
    };

    let mac = mac::mac(MacType::Response, &auth.credentials, &artifacts);
    let mut header = format!("Hawk mac=\"{mac}\"");
    if let Some(ref hash) = artifacts.hash {
        let _ = write!(header, ", hash=\"{hash}\"");
    }
    if let Some(ref ext) = artifacts.ext {
        let _ = write!(header, ", ext=\"{}\"", header::escape_attribute(ext));
    }
    Ok(header)
}
