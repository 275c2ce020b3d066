//! Parsing of `Hawk` attribute-list headers.
//!
//! The grammar is deliberately narrow: `Hawk` (case-insensitive), one space,
//! then `key="value"` pairs separated by a comma and optional spaces.  Values
//! carry any printable ASCII except `"` and `\`, so no unescaping is ever
//! needed.  The parser classifies each way an input can be malformed; it
//! does not judge semantic completeness, which is the caller's job.

use crate::error::Error;

/// Headers may not exceed this many bytes.
pub(crate) const MAX_HEADER_LENGTH: usize = 4096;

/// The closed attribute set.  Parsers are additionally restricted to the
/// subset that makes sense for the header being read.
const ALL_KEYS: [&str; 10] = [
    "app", "dlg", "error", "ext", "hash", "id", "mac", "nonce", "ts", "tsm",
];

/// Keys allowed in a request `Authorization` header.
pub(crate) const AUTHORIZATION_KEYS: [&str; 8] =
    ["app", "dlg", "ext", "hash", "id", "mac", "nonce", "ts"];

/// Keys allowed in a `Server-Authorization` header.
pub(crate) const SERVER_AUTHORIZATION_KEYS: [&str; 3] = ["ext", "hash", "mac"];

/// Keys allowed in a `WWW-Authenticate` challenge.
pub(crate) const WWW_AUTHENTICATE_KEYS: [&str; 3] = ["error", "ts", "tsm"];

/// The attributes of one parsed header.  Every field is optional at this
/// level; presence requirements differ per header kind and are enforced by
/// the client and server pipelines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedHeader {
    pub id: Option<String>,
    pub ts: Option<String>,
    pub nonce: Option<String>,
    pub mac: Option<String>,
    pub hash: Option<String>,
    pub ext: Option<String>,
    pub app: Option<String>,
    pub dlg: Option<String>,
    pub tsm: Option<String>,
    pub error: Option<String>,
}

impl ParsedHeader {
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        let slot = match key {
            "id" => &mut self.id,
            "ts" => &mut self.ts,
            "nonce" => &mut self.nonce,
            "mac" => &mut self.mac,
            "hash" => &mut self.hash,
            "ext" => &mut self.ext,
            "app" => &mut self.app,
            "dlg" => &mut self.dlg,
            "tsm" => &mut self.tsm,
            "error" => &mut self.error,
            _ => return Err(Error::UnknownAttribute(key.to_string())),
        };
        if slot.is_some() {
            return Err(Error::DuplicateAttribute(key.to_string()));
        }
        *slot = Some(value.to_string());
        Ok(())
    }
}

fn is_value_char(c: char) -> bool {
    ('\x20'..='\x7e').contains(&c) && c != '"' && c != '\\'
}

// RFC 7230 token characters; used only to tell a foreign scheme from noise.
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

/// Parse a `Hawk` header value, restricted to the `allowed` attribute keys.
pub(crate) fn parse(header: &str, allowed: &[&str]) -> Result<ParsedHeader, Error> {
    if header.len() > MAX_HEADER_LENGTH {
        return Err(Error::HeaderTooLong);
    }
    if header.is_empty() {
        return Err(Error::Unauthorized);
    }

    let (scheme, mut rest) = match header.find(' ') {
        Some(i) => (&header[..i], &header[i + 1..]),
        None => (header, ""),
    };
    if !scheme.eq_ignore_ascii_case("hawk") {
        if !scheme.is_empty() && scheme.chars().all(is_token_char) {
            // some other authentication scheme
            return Err(Error::Unauthorized);
        }
        return Err(Error::InvalidHeaderSyntax);
    }
    if rest.is_empty() {
        // a bare scheme carries no authentication
        return Err(Error::InvalidHeaderSyntax);
    }

    let mut parsed = ParsedHeader::default();
    loop {
        let key_len = rest
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .count();
        if key_len == 0 {
            return Err(Error::BadHeaderFormat);
        }
        let key = &rest[..key_len];
        if !ALL_KEYS.contains(&key) || !allowed.contains(&key) {
            return Err(Error::UnknownAttribute(key.to_string()));
        }
        rest = &rest[key_len..];

        let mut delim = rest.chars();
        if delim.next() != Some('=') || delim.next() != Some('"') {
            return Err(Error::BadHeaderFormat);
        }
        rest = &rest[2..];

        let mut value_end = None;
        for (i, c) in rest.char_indices() {
            if !is_value_char(c) {
                value_end = Some((i, c));
                break;
            }
        }
        let (value_len, terminator) = value_end.ok_or(Error::BadHeaderFormat)?;
        if terminator != '"' {
            return Err(Error::BadAttributeValue(terminator));
        }
        if value_len == 0 {
            return Err(Error::BadAttributeValue('"'));
        }
        parsed.set(key, &rest[..value_len])?;
        rest = &rest[value_len + 1..];

        if rest.is_empty() {
            break;
        }
        if !rest.starts_with(',') {
            return Err(Error::BadHeaderFormat);
        }
        rest = rest[1..].trim_start_matches(' ');
        if rest.is_empty() {
            return Err(Error::BadHeaderFormat);
        }
    }

    Ok(parsed)
}

/// Escape a value for inclusion in a `Server-Authorization` header: `\` and
/// `"` are backslash-escaped.
pub(crate) fn escape_attribute(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Reject values that cannot travel inside a quoted attribute, reporting the
/// first offending character.
pub(crate) fn check_attribute_value(value: &str) -> Result<(), Error> {
    match value.chars().find(|c| !is_value_char(*c)) {
        Some(c) => Err(Error::BadAttributeValue(c)),
        None => Ok(()),
    }
}
