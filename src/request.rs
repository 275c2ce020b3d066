//! The request view: a neutral description of an incoming HTTP request,
//! normalized into the fields the verification pipeline consumes.
//!
//! Host and port resolve in precedence order: explicit overrides in
//! [`RequestOptions`], then the `Host` header, then the transport hints on
//! the raw request.  The `Host` header is parsed with a small
//! character-class scanner rather than a URI parser.

use crate::error::Error;

/// Maximum accepted `Host` header length, in bytes.
const MAX_HOST_HEADER_LENGTH: usize = 4096;

/// A neutral description of an incoming request, as the host framework saw
/// it.  Header names are matched case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct RawRequest<'a> {
    /// Request method, any case.
    pub method: &'a str,
    /// Path component of the request target.
    pub path: &'a str,
    /// Raw query string, without the `?`.
    pub query: Option<&'a str>,
    /// Transport-level host, used when no `Host` header is present.
    pub host: Option<&'a str>,
    /// Transport-level port, used when the `Host` header names none.
    pub port: Option<u16>,
    /// Request headers as `(name, value)` pairs.
    pub headers: &'a [(&'a str, &'a str)],
}

/// Options controlling how a raw request is normalized.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions<'a> {
    /// Read the host from this header instead of `Host`.
    pub host_header_name: Option<&'a str>,
    /// Use this host regardless of what the request says.
    pub host: Option<&'a str>,
    /// Use this port regardless of what the request says.
    pub port: Option<u16>,
}

/// The normalized view the server pipelines operate on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestView {
    /// Uppercased method.
    pub method: String,
    /// Path plus `?query` when the query is non-empty.
    pub resource: String,
    pub host: String,
    pub port: u16,
    /// The `Authorization` header, verbatim.
    pub authorization: Option<String>,
    /// The `Content-Type` header, truncated at the first `;` and trimmed.
    pub content_type: Option<String>,
}

impl<'a> RawRequest<'a> {
    fn header(&self, name: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }

    /// Normalize the request.  Fails with [`Error::InvalidHostHeader`] when
    /// no combination of options, `Host` header, and transport hints yields
    /// a host and port.
    pub fn view(&self, options: &RequestOptions) -> Result<RequestView, Error> {
        let header_name = options.host_header_name.unwrap_or("host");
        let parsed = match self.header(header_name) {
            Some(value) if !value.is_empty() => Some(parse_host_header(value)?),
            _ => None,
        };

        let host = options
            .host
            .map(str::to_string)
            .or_else(|| parsed.as_ref().map(|(h, _)| h.clone()))
            .or_else(|| self.host.map(str::to_string))
            .ok_or(Error::InvalidHostHeader)?;
        let port = options
            .port
            .or_else(|| parsed.as_ref().and_then(|(_, p)| *p))
            .or(self.port)
            .ok_or(Error::InvalidHostHeader)?;

        let resource = match self.query {
            Some(query) if !query.is_empty() => format!("{}?{}", self.path, query),
            _ => self.path.to_string(),
        };

        Ok(RequestView {
            method: self.method.to_uppercase(),
            resource,
            host,
            port,
            authorization: self.header("authorization").map(str::to_string),
            content_type: self.header("content-type").map(|ct| {
                ct.split(';').next().unwrap_or("").trim().to_string()
            }),
        })
    }
}

fn is_host_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-'
}

/// Parse a `Host` header into a host and an optional port.  Accepts
/// hostnames, IPv4 literals, and bracketed IPv6 literals, each with an
/// optional `:port`.
fn parse_host_header(value: &str) -> Result<(String, Option<u16>), Error> {
    if value.len() > MAX_HOST_HEADER_LENGTH {
        return Err(Error::InvalidHostHeader);
    }
    let value = value.trim_matches(|c: char| c.is_ascii_whitespace());

    let (host, port) = if let Some(inner) = value.strip_prefix('[') {
        // bracketed IPv6 literal: any colon is part of the address until `]`
        let close = inner.find(']').ok_or(Error::InvalidHostHeader)?;
        if close == 0 || !inner[..close].chars().all(|c| is_host_char(c) || c == ':') {
            return Err(Error::InvalidHostHeader);
        }
        let rest = &inner[close + 1..];
        let port = match rest.strip_prefix(':') {
            Some(port) => Some(port),
            None if rest.is_empty() => None,
            None => return Err(Error::InvalidHostHeader),
        };
        (&value[..close + 2], port)
    } else {
        let (host, port) = match value.find(':') {
            Some(0) => return Err(Error::InvalidHostHeader),
            Some(i) => (&value[..i], Some(&value[i + 1..])),
            None => (value, None),
        };
        if host.is_empty() || !host.chars().all(is_host_char) {
            return Err(Error::InvalidHostHeader);
        }
        (host, port)
    };

    let port = match port {
        None => None,
        Some(p) => {
            if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::InvalidHostHeader);
            }
            let n: u32 = p.parse().map_err(|_| Error::InvalidHostHeader)?;
            if n > 65535 {
                return Err(Error::InvalidHostHeader);
            }
            Some(n as u16)
        }
    };

    Ok((host.to_string(), port))
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_host() {
        assert_eq!(
            parse_host_header("example.com").unwrap(),
            ("example.com".to_string(), None)
        );
    }

    #[test]
    fn test_host_with_port() {
        assert_eq!(
            parse_host_header("example.com:8080").unwrap(),
            ("example.com".to_string(), Some(8080))
        );
    }

    #[test]
    fn test_hyphenated_host() {
        assert_eq!(
            parse_host_header("my-site.example.com:443").unwrap(),
            ("my-site.example.com".to_string(), Some(443))
        );
    }

    #[test]
    fn test_ipv4() {
        assert_eq!(
            parse_host_header("192.168.0.1:80").unwrap(),
            ("192.168.0.1".to_string(), Some(80))
        );
    }

    #[test]
    fn test_ipv6() {
        assert_eq!(
            parse_host_header("[2001:db8::1]").unwrap(),
            ("[2001:db8::1]".to_string(), None)
        );
        assert_eq!(
            parse_host_header("[2001:db8::1]:8000").unwrap(),
            ("[2001:db8::1]".to_string(), Some(8000))
        );
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(
            parse_host_header("  example.com:80  ").unwrap(),
            ("example.com".to_string(), Some(80))
        );
    }

    #[test]
    fn test_invalid_hosts() {
        for bad in [
            ":8080",
            "example.com:",
            "example.com:abc",
            "example.com:-1",
            "example.com:65536",
            "exam ple.com",
            "under_score.com",
            "[2001:db8::1",
            "[2001:db8::1]8000",
            "host/path",
        ] {
            assert_eq!(
                parse_host_header(bad).unwrap_err(),
                Error::InvalidHostHeader,
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn test_over_length() {
        let value = format!("{}.com", "a".repeat(4200));
        assert_eq!(
            parse_host_header(&value).unwrap_err(),
            Error::InvalidHostHeader
        );
    }

    #[test]
    fn test_view_from_host_header() {
        let req = RawRequest {
            method: "get",
            path: "/resource/4",
            query: Some("filter=a"),
            headers: &[("Host", "example.com:8080"), ("Content-Type", "text/plain; charset=utf-8")],
            ..Default::default()
        };
        let view = req.view(&RequestOptions::default()).unwrap();
        assert_eq!(view.method, "GET");
        assert_eq!(view.resource, "/resource/4?filter=a");
        assert_eq!(view.host, "example.com");
        assert_eq!(view.port, 8080);
        assert_eq!(view.content_type.as_deref(), Some("text/plain"));
        assert_eq!(view.authorization, None);
    }

    #[test]
    fn test_view_port_fallback() {
        // Host header without a port falls back to the transport port
        let req = RawRequest {
            method: "GET",
            path: "/",
            port: Some(443),
            headers: &[("host", "example.com")],
            ..Default::default()
        };
        let view = req.view(&RequestOptions::default()).unwrap();
        assert_eq!(view.host, "example.com");
        assert_eq!(view.port, 443);
    }

    #[test]
    fn test_view_overrides_win() {
        let req = RawRequest {
            method: "GET",
            path: "/",
            headers: &[("host", "example.com:8080")],
            ..Default::default()
        };
        let options = RequestOptions {
            host: Some("internal.example.com"),
            port: Some(9000),
            ..Default::default()
        };
        let view = req.view(&options).unwrap();
        assert_eq!(view.host, "internal.example.com");
        assert_eq!(view.port, 9000);
    }

    #[test]
    fn test_view_custom_header_name() {
        let req = RawRequest {
            method: "GET",
            path: "/",
            headers: &[
                ("host", "proxy.example.com:80"),
                ("x-forwarded-host", "origin.example.com:8000"),
            ],
            ..Default::default()
        };
        let options = RequestOptions {
            host_header_name: Some("x-forwarded-host"),
            ..Default::default()
        };
        let view = req.view(&options).unwrap();
        assert_eq!(view.host, "origin.example.com");
        assert_eq!(view.port, 8000);
    }

    #[test]
    fn test_view_no_host_anywhere() {
        let req = RawRequest {
            method: "GET",
            path: "/",
            ..Default::default()
        };
        assert_eq!(
            req.view(&RequestOptions::default()).unwrap_err(),
            Error::InvalidHostHeader
        );
    }

    #[test]
    fn test_view_bad_host_header() {
        let req = RawRequest {
            method: "GET",
            path: "/",
            host: Some("fallback.example.com"),
            port: Some(80),
            headers: &[("host", "exa mple.com")],
            ..Default::default()
        };
        // a malformed Host header is an error even when hints could cover it
        assert_eq!(
            req.view(&RequestOptions::default()).unwrap_err(),
            Error::InvalidHostHeader
        );
    }
}
