//! The client side of the protocol: building `Authorization` headers,
//! validating server responses, issuing bewits, and signing out-of-band
//! messages.

use crate::artifacts::Artifacts;
use crate::bewit::Bewit;
use crate::clock::{offset_now_ms, Clock};
use crate::credentials::Credentials;
use crate::crypto;
use crate::error::Error;
use crate::header::{
    self, ParsedHeader, SERVER_AUTHORIZATION_KEYS, WWW_AUTHENTICATE_KEYS,
};
use crate::mac::{self, MacType};
use crate::payload::PayloadHasher;
use std::fmt::Write;
use url::Url;

/// Generated nonces are this many alphanumeric characters.
const NONCE_LENGTH: usize = 6;

/// Options for [`header`].
#[derive(Default)]
pub struct HeaderOptions<'a> {
    /// Timestamp to sign with; defaults to the current time.
    pub ts: Option<u64>,
    /// Nonce to sign with; defaults to a fresh random one.
    pub nonce: Option<&'a str>,
    /// Payload hash, used verbatim.  Takes precedence over `payload`.
    pub hash: Option<&'a str>,
    /// Request payload to hash.
    pub payload: Option<&'a [u8]>,
    /// Content type the payload is sent with.
    pub content_type: Option<&'a str>,
    /// Opaque application data to cover with the MAC.
    pub ext: Option<&'a str>,
    /// Application id.
    pub app: Option<&'a str>,
    /// Delegated-by id; only sent when `app` is set.
    pub dlg: Option<&'a str>,
    /// Signed adjustment applied to the clock.
    pub localtime_offset_ms: i64,
    /// Time source; defaults to the system clock.
    pub clock: Option<&'a dyn Clock>,
}

/// Options for [`get_bewit`].
#[derive(Default)]
pub struct BewitOptions<'a> {
    /// Opaque application data to cover with the MAC.
    pub ext: Option<&'a str>,
    /// Signed adjustment applied to the clock.
    pub localtime_offset_ms: i64,
    /// Time source; defaults to the system clock.
    pub clock: Option<&'a dyn Clock>,
}

/// Options for [`message`].
#[derive(Default)]
pub struct MessageOptions<'a> {
    /// Timestamp to sign with; defaults to the current time.
    pub ts: Option<u64>,
    /// Nonce to sign with; defaults to a fresh random one.
    pub nonce: Option<&'a str>,
    /// Signed adjustment applied to the clock.
    pub localtime_offset_ms: i64,
    /// Time source; defaults to the system clock.
    pub clock: Option<&'a dyn Clock>,
}

/// Options shared by [`authenticate`] and [`crate::server::header`]: the
/// response payload and its description.  `authenticate` reads only
/// `payload`; the other fields drive response-header generation.
#[derive(Clone, Debug, Default)]
pub struct ResponseOptions<'a> {
    /// Response payload to verify or hash.
    pub payload: Option<&'a [u8]>,
    /// Content type the response payload is sent with.
    pub content_type: Option<&'a str>,
    /// Payload hash, used verbatim instead of hashing `payload`.
    pub hash: Option<&'a str>,
    /// Opaque application data for the response header.
    pub ext: Option<&'a str>,
}

/// A generated `Authorization` value together with the artifacts it covers,
/// kept for validating the response.
#[derive(Clone, Debug)]
pub struct ClientAuthorization {
    /// The full header value, beginning with `Hawk `.
    pub header: String,
    pub artifacts: Artifacts,
}

/// A generated bewit token and the artifacts it covers.
#[derive(Clone, Debug)]
pub struct ClientBewit {
    /// The encoded token, ready for a `bewit=` query parameter.
    pub bewit: String,
    pub artifacts: Artifacts,
}

/// The authorization record for an out-of-band message, to be transported
/// alongside the message by whatever channel the host uses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageAuthorization {
    pub id: String,
    pub ts: u64,
    pub nonce: String,
    /// Hash of the message, base64.
    pub hash: String,
    /// MAC over the message artifacts, base64.
    pub mac: String,
}

/// The parsed authentication headers of a validated response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServerResponse {
    pub www_authenticate: Option<ParsedHeader>,
    pub server_authorization: Option<ParsedHeader>,
}

fn url_parts(url: &Url) -> Result<(String, u16, String), Error> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::InvalidUrl(format!("{url} has no host")))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| Error::InvalidUrl(format!("{url} has no port")))?;
    let resource = match url.query() {
        Some(query) if !query.is_empty() => format!("{}?{}", url.path(), query),
        _ => url.path().to_string(),
    };
    Ok((host.to_string(), port, resource))
}

fn check_components(values: &[Option<&str>]) -> Result<(), Error> {
    for value in values.iter().flatten() {
        header::check_attribute_value(value)?;
    }
    Ok(())
}

/// Build the `Authorization` header for a request.
///
/// A timestamp and nonce are generated unless supplied.  The payload hash is
/// taken verbatim from `options.hash`, computed from `options.payload` when
/// only that is given, and omitted entirely otherwise.
pub fn header(
    url: &Url,
    method: &str,
    credentials: &Credentials,
    options: &HeaderOptions,
) -> Result<ClientAuthorization, Error> {
    check_components(&[
        Some(credentials.id.as_str()),
        options.nonce,
        options.ext,
        options.app,
        options.dlg,
    ])?;
    let (host, port, resource) = url_parts(url)?;

    let ts = match options.ts {
        Some(ts) => ts,
        None => offset_now_ms(options.clock, options.localtime_offset_ms) / 1000,
    };
    let nonce = match options.nonce {
        Some(nonce) => nonce.to_string(),
        None => crypto::random_string(NONCE_LENGTH)?,
    };
    let hash = match (options.hash, options.payload) {
        (Some(hash), _) => Some(hash.to_string()),
        (None, Some(payload)) => Some(PayloadHasher::hash(
            options.content_type.unwrap_or(""),
            credentials.algorithm,
            payload,
        )),
        (None, None) => None,
    };

    let mut artifacts = Artifacts {
        ts,
        nonce,
        method: method.to_uppercase(),
        resource,
        host,
        port,
        hash,
        ext: options.ext.map(str::to_string),
        app: options.app.map(str::to_string),
        dlg: options.dlg.map(str::to_string),
        id: credentials.id.clone(),
        mac: None,
    };
    let mac = mac::mac(MacType::Header, credentials, &artifacts);

    let mut header = format!(
        "Hawk id=\"{}\", ts=\"{}\", nonce=\"{}\"",
        credentials.id, artifacts.ts, artifacts.nonce
    );
    if let Some(ref hash) = artifacts.hash {
        let _ = write!(header, ", hash=\"{hash}\"");
    }
    if let Some(ref ext) = artifacts.ext {
        let _ = write!(header, ", ext=\"{ext}\"");
    }
    let _ = write!(header, ", mac=\"{mac}\"");
    if let Some(ref app) = artifacts.app {
        let _ = write!(header, ", app=\"{app}\"");
        if let Some(ref dlg) = artifacts.dlg {
            let _ = write!(header, ", dlg=\"{dlg}\"");
        }
    }

    artifacts.mac = Some(mac);
    Ok(ClientAuthorization { header, artifacts })
}

/// Validate a server response against the artifacts of the request it
/// answers.
///
/// Checks, in order: the `WWW-Authenticate` timestamp MAC (when present),
/// the `Server-Authorization` MAC (when present), and the response payload
/// hash (when a non-empty payload is supplied).
pub fn authenticate(
    response_headers: &[(&str, &str)],
    credentials: &Credentials,
    artifacts: &Artifacts,
    options: &ResponseOptions,
) -> Result<ServerResponse, Error> {
    let find = |name: &str| {
        response_headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    };

    let mut response = ServerResponse::default();

    if let Some(value) = find("www-authenticate") {
        let parsed = header::parse(value, &WWW_AUTHENTICATE_KEYS)
            .map_err(|_| Error::InvalidWwwAuthenticateHeader)?;
        if let (Some(ts), Some(tsm)) = (&parsed.ts, &parsed.tsm) {
            let expected = mac::ts_mac(credentials, ts);
            if !crypto::constant_time_eq(expected.as_bytes(), tsm.as_bytes()) {
                return Err(Error::InvalidServerTimestampHash);
            }
        }
        response.www_authenticate = Some(parsed);
    }

    if let Some(value) = find("server-authorization") {
        let parsed = header::parse(value, &SERVER_AUTHORIZATION_KEYS)
            .map_err(|_| Error::InvalidServerAuthorizationHeader)?;
        let mut expected_artifacts = artifacts.clone();
        expected_artifacts.ext = parsed.ext.clone();
        expected_artifacts.hash = parsed.hash.clone();
        let expected = mac::mac(MacType::Response, credentials, &expected_artifacts);
        let received = parsed.mac.as_deref().unwrap_or("");
        if !crypto::constant_time_eq(expected.as_bytes(), received.as_bytes()) {
            return Err(Error::BadResponseMac);
        }
        response.server_authorization = Some(parsed);
    }

    match options.payload {
        Some(payload) if !payload.is_empty() => {
            let received = response
                .server_authorization
                .as_ref()
                .and_then(|parsed| parsed.hash.as_deref())
                .ok_or(Error::MissingResponseHashAttribute)?;
            let content_type = find("content-type")
                .map(|ct| ct.split(';').next().unwrap_or("").trim())
                .unwrap_or("");
            let expected =
                PayloadHasher::hash(content_type, credentials.algorithm, payload);
            if !crypto::constant_time_eq(expected.as_bytes(), received.as_bytes()) {
                return Err(Error::BadResponsePayloadMac);
            }
        }
        _ => {}
    }

    Ok(response)
}

/// Issue a bewit granting GET/HEAD access to `url` for `ttl_sec` seconds
/// from now.
pub fn get_bewit(
    url: &Url,
    credentials: &Credentials,
    ttl_sec: u64,
    options: &BewitOptions,
) -> Result<ClientBewit, Error> {
    check_components(&[Some(credentials.id.as_str()), options.ext])?;
    let (host, port, resource) = url_parts(url)?;
    let exp = offset_now_ms(options.clock, options.localtime_offset_ms) / 1000 + ttl_sec;

    let mut artifacts = Artifacts {
        ts: exp,
        nonce: String::new(),
        method: "GET".to_string(),
        resource,
        host,
        port,
        ext: options.ext.map(str::to_string),
        id: credentials.id.clone(),
        ..Default::default()
    };
    let mac = mac::mac(MacType::Bewit, credentials, &artifacts);
    artifacts.mac = Some(mac.clone());

    let bewit = Bewit::new(
        credentials.id.clone(),
        exp,
        mac,
        options.ext.map(str::to_string),
    );
    Ok(ClientBewit {
        bewit: bewit.to_string(),
        artifacts,
    })
}

/// Sign an out-of-band message addressed to `host:port`.
pub fn message(
    host: &str,
    port: u16,
    message: &[u8],
    credentials: &Credentials,
    options: &MessageOptions,
) -> Result<MessageAuthorization, Error> {
    let ts = match options.ts {
        Some(ts) => ts,
        None => offset_now_ms(options.clock, options.localtime_offset_ms) / 1000,
    };
    let nonce = match options.nonce {
        Some(nonce) => nonce.to_string(),
        None => crypto::random_string(NONCE_LENGTH)?,
    };
    let hash = PayloadHasher::hash("", credentials.algorithm, message);

    let artifacts = Artifacts {
        ts,
        nonce: nonce.clone(),
        host: host.to_string(),
        port,
        hash: Some(hash.clone()),
        id: credentials.id.clone(),
        ..Default::default()
    };
    let mac = mac::mac(MacType::Message, credentials, &artifacts);

    Ok(MessageAuthorization {
        id: credentials.id.clone(),
        ts,
        nonce,
        hash,
        mac,
    })
}
