//! The bewit: a URL-embedded, time-bounded authenticator for a single GET or
//! HEAD request.  Four backslash-joined fields, carried as unpadded url-safe
//! base64 in a `bewit=` query parameter.

use crate::b64;
use crate::error::Error;
use base64::Engine;
use std::fmt;
use std::str;
use std::str::FromStr;

/// A decoded bewit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bewit {
    /// The client id the bewit was issued for.
    pub id: String,
    /// Expiration, seconds since the epoch.
    pub exp: u64,
    /// The MAC over the bewit artifacts, base64.
    pub mac: String,
    /// Opaque application data; empty when none was attached.
    pub ext: String,
}

impl Bewit {
    pub fn new<S: Into<String>>(id: S, exp: u64, mac: S, ext: Option<S>) -> Bewit {
        Bewit {
            id: id.into(),
            exp,
            mac: mac.into(),
            ext: ext.map(S::into).unwrap_or_default(),
        }
    }
}

impl fmt::Display for Bewit {
    /// The fully-encoded token, as it appears in a URL.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let raw = format!("{}\\{}\\{}\\{}", self.id, self.exp, self.mac, self.ext);
        f.write_str(&b64::BEWIT.encode(raw))
    }
}

const BACKSLASH: u8 = b'\\';

impl FromStr for Bewit {
    type Err = Error;

    fn from_str(token: &str) -> Result<Bewit, Error> {
        let raw = b64::BEWIT
            .decode(token)
            .map_err(|_| Error::InvalidBewitEncoding)?;

        let parts: Vec<&[u8]> = raw.split(|c| *c == BACKSLASH).collect();
        if parts.len() != 4 {
            return Err(Error::InvalidBewitStructure);
        }
        if parts[0].is_empty() || parts[1].is_empty() || parts[2].is_empty() {
            return Err(Error::MissingBewitAttributes);
        }

        let id = str::from_utf8(parts[0]).map_err(|_| Error::InvalidBewitStructure)?;
        let exp = str::from_utf8(parts[1])
            .ok()
            .and_then(|exp| u64::from_str(exp).ok())
            .ok_or(Error::InvalidBewitStructure)?;
        let mac = str::from_utf8(parts[2]).map_err(|_| Error::InvalidBewitStructure)?;
        let ext = str::from_utf8(parts[3]).map_err(|_| Error::InvalidBewitStructure)?;

        Ok(Bewit {
            id: id.to_string(),
            exp,
            mac: mac.to_string(),
            ext: ext.to_string(),
        })
    }
}

/// The result of scanning a request target for a `bewit=` parameter: the
/// still-encoded token and the URL with the parameter removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ExtractedBewit<'a> {
    pub token: &'a str,
    pub url: String,
}

/// Find a `bewit=` query parameter, preceded by `?` or `&`, and strip it
/// from the URL.  Returns `None` when the URL carries no bewit.
pub(crate) fn extract(url: &str) -> Option<ExtractedBewit<'_>> {
    const NEEDLE: &str = "bewit=";

    let bytes = url.as_bytes();
    let mut search = 0;
    let start = loop {
        let found = search + url[search..].find(NEEDLE)?;
        if found > 0 && (bytes[found - 1] == b'?' || bytes[found - 1] == b'&') {
            break found;
        }
        search = found + NEEDLE.len();
    };

    let value_start = start + NEEDLE.len();
    let value_end = url[value_start..]
        .find(['?', '&'])
        .map(|i| value_start + i)
        .unwrap_or(url.len());

    let prefix = &url[..start - 1];
    let sep = bytes[start - 1] as char;
    let rest = url.get(value_end + 1..).unwrap_or("");
    let reconstructed = if rest.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}{sep}{rest}")
    };

    Some(ExtractedBewit {
        token: &url[value_start..value_end],
        url: reconstructed,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    const TOKEN: &str =
        "MTIzNDU2XDEzNTY0MjA3MDdca3NjeHdOUjJ0SnBQMVQxekRMTlBiQjVVaUtJVTl0T1NKWFRVZEc3WDloOD1ceGFuZHlhbmR6";

    #[test]
    fn test_roundtrip() {
        let bewit = Bewit::new(
            "123456",
            1356420707,
            "kscxwNR2tJpP1T1zDLNPbB5UiKIU9tOSJXTUdG7X9h8=",
            Some("xandyandz"),
        );
        assert_eq!(bewit.to_string(), TOKEN);
        assert_eq!(Bewit::from_str(TOKEN).unwrap(), bewit);
    }

    #[test]
    fn test_empty_ext_keeps_trailing_backslash() {
        let bewit = Bewit::new("me", 1353832834, "bWFj", None);
        let decoded = b64::BEWIT.decode(bewit.to_string()).unwrap();
        assert!(decoded.ends_with(b"\\"));
        assert_eq!(Bewit::from_str(&bewit.to_string()).unwrap().ext, "");
    }

    #[test]
    fn test_invalid_base64() {
        assert_eq!(
            Bewit::from_str("!/==").unwrap_err(),
            Error::InvalidBewitEncoding
        );
    }

    #[test]
    fn test_wrong_part_count() {
        for raw in ["a\\123\\abc", "a\\123\\abc\\ext\\more"] {
            let token = b64::BEWIT.encode(raw);
            assert_eq!(
                Bewit::from_str(&token).unwrap_err(),
                Error::InvalidBewitStructure
            );
        }
    }

    #[test]
    fn test_empty_required_fields() {
        for raw in ["\\123\\abc\\", "a\\\\abc\\", "a\\123\\\\"] {
            let token = b64::BEWIT.encode(raw);
            assert_eq!(
                Bewit::from_str(&token).unwrap_err(),
                Error::MissingBewitAttributes
            );
        }
    }

    #[test]
    fn test_non_numeric_exp() {
        let token = b64::BEWIT.encode("a\\soon\\abc\\");
        assert_eq!(
            Bewit::from_str(&token).unwrap_err(),
            Error::InvalidBewitStructure
        );
    }

    #[test]
    fn test_extract_none() {
        assert_eq!(extract("/abc"), None);
        assert_eq!(extract("/abc?x=1"), None);
        // a bewit= not introduced by a separator is not a parameter
        assert_eq!(extract("/abcbewit=x"), None);
    }

    #[test]
    fn test_extract_alone() {
        let found = extract("/abc?bewit=TOK").unwrap();
        assert_eq!(found.token, "TOK");
        assert_eq!(found.url, "/abc");
    }

    #[test]
    fn test_extract_first_param() {
        let found = extract("/abc?bewit=TOK&y=2").unwrap();
        assert_eq!(found.token, "TOK");
        assert_eq!(found.url, "/abc?y=2");
    }

    #[test]
    fn test_extract_middle_param() {
        let found = extract("/abc?x=1&bewit=TOK&y=2").unwrap();
        assert_eq!(found.token, "TOK");
        assert_eq!(found.url, "/abc?x=1&y=2");
    }

    #[test]
    fn test_extract_last_param() {
        let found = extract("/abc?x=1&bewit=TOK").unwrap();
        assert_eq!(found.token, "TOK");
        assert_eq!(found.url, "/abc?x=1");
    }

    #[test]
    fn test_extract_empty_value() {
        let found = extract("/abc?bewit=").unwrap();
        assert_eq!(found.token, "");
        assert_eq!(found.url, "/abc");
    }
}
