//! Fixtures shared across Hawk implementations.  Every byte string below was
//! produced by an independent implementation of the protocol; generating or
//! accepting them proves the canonicalization and codecs match.

use hawkling::{client, server};
use hawkling::{
    Algorithm, BewitOptions, Credentials, Error, FixedClock, HeaderOptions, RawRequest,
    VerifyOptions,
};
use pretty_assertions::assert_eq;
use url::Url;

fn sha1_credentials() -> Credentials {
    Credentials::new("123456", "2983d45yun89q", Algorithm::Sha1)
}

fn sha256_credentials() -> Credentials {
    Credentials::new("123456", "2983d45yun89q", Algorithm::Sha256)
}

fn resolver_sha256(id: &str) -> Option<Credentials> {
    (id == "123456").then(sha256_credentials)
}

#[test]
fn sha1_header_with_payload() {
    let url = Url::parse("http://example.net/somewhere/over/the/rainbow").unwrap();
    let auth = client::header(
        &url,
        "POST",
        &sha1_credentials(),
        &HeaderOptions {
            ts: Some(1353809207),
            nonce: Some("Ygvqdz"),
            ext: Some("Bazinga!"),
            payload: Some(b"something to write about"),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(
        auth.header,
        "Hawk id=\"123456\", ts=\"1353809207\", nonce=\"Ygvqdz\", \
         hash=\"bsvY3IfUllw6V5rvk4tStEvpBhE=\", ext=\"Bazinga!\", \
         mac=\"qbf1ZPG/r/e06F4ht+T77LXi5vw=\""
    );
}

#[test]
fn sha256_header_with_content_type() {
    let url = Url::parse("https://example.net/somewhere/over/the/rainbow").unwrap();
    let auth = client::header(
        &url,
        "POST",
        &sha256_credentials(),
        &HeaderOptions {
            ts: Some(1353809207),
            nonce: Some("Ygvqdz"),
            ext: Some("Bazinga!"),
            payload: Some(b"something to write about"),
            content_type: Some("text/plain"),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(
        auth.header,
        "Hawk id=\"123456\", ts=\"1353809207\", nonce=\"Ygvqdz\", \
         hash=\"2QfCt3GuY9HQnHWyWD3wX68ZOKbynqlfYmuO2ZBRqtY=\", ext=\"Bazinga!\", \
         mac=\"q1CwFoSHzPZSkbIvl0oYlD+91rBUEvFk763nMjMndj8=\""
    );
}

#[test]
fn foreign_header_is_accepted_by_the_server() {
    // the header of sha1_header_with_payload, as another implementation
    // would have sent it
    let header = "Hawk id=\"123456\", ts=\"1353809207\", nonce=\"Ygvqdz\", \
                  hash=\"bsvY3IfUllw6V5rvk4tStEvpBhE=\", ext=\"Bazinga!\", \
                  mac=\"qbf1ZPG/r/e06F4ht+T77LXi5vw=\"";
    let clock = FixedClock(1353809207000);
    let headers = [("host", "example.net"), ("authorization", header)];
    let request = RawRequest {
        method: "POST",
        path: "/somewhere/over/the/rainbow",
        port: Some(80),
        headers: &headers,
        ..Default::default()
    };
    let resolver =
        |id: &str| -> Option<Credentials> { (id == "123456").then(sha1_credentials) };
    let result = server::authenticate(
        &request,
        &resolver,
        &VerifyOptions {
            payload: Some(b"something to write about"),
            clock: Some(&clock),
            ..VerifyOptions::new()
        },
    )
    .unwrap();
    assert_eq!(result.artifacts.ext.as_deref(), Some("Bazinga!"));
}

#[test]
fn bewit_token_fixture() {
    let url = Url::parse("https://example.com/somewhere/over/the/rainbow").unwrap();
    let clock = FixedClock(1356420407000);
    let bewit = client::get_bewit(
        &url,
        &sha256_credentials(),
        300,
        &BewitOptions {
            ext: Some("xandyandz"),
            clock: Some(&clock),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(
        bewit.bewit,
        "MTIzNDU2XDEzNTY0MjA3MDdca3NjeHdOUjJ0SnBQMVQxekRMTlBiQjVVaUtJVTl0T1NKWFRVZEc3WDloOD1ceGFuZHlhbmR6"
    );
}

#[test]
fn bewit_round_trip_and_expiry() {
    let url = Url::parse("https://example.com/somewhere/over/the/rainbow").unwrap();
    let clock = FixedClock(1356420407000);
    let bewit = client::get_bewit(
        &url,
        &sha256_credentials(),
        300,
        &BewitOptions {
            ext: Some("xandyandz"),
            clock: Some(&clock),
            ..Default::default()
        },
    )
    .unwrap();
    let query = format!("bewit={}", bewit.bewit);
    let request = RawRequest {
        method: "GET",
        path: "/somewhere/over/the/rainbow",
        query: Some(&query),
        host: Some("example.com"),
        port: Some(443),
        ..Default::default()
    };

    // before expiry
    let result = server::authenticate_bewit(
        &request,
        &resolver_sha256,
        &VerifyOptions {
            clock: Some(&clock),
            ..VerifyOptions::new()
        },
    )
    .unwrap();
    assert_eq!(result.bewit.id, "123456");
    assert_eq!(result.bewit.ext, "xandyandz");

    // at and after expiry
    let late = FixedClock(1356420707000);
    let err = server::authenticate_bewit(
        &request,
        &resolver_sha256,
        &VerifyOptions {
            clock: Some(&late),
            ..VerifyOptions::new()
        },
    )
    .unwrap_err();
    assert_eq!(err, Error::AccessExpired);
    assert_eq!(err.status(), 401);
}

#[test]
fn bewit_rejects_non_get_methods() {
    let query = "bewit=MTIzNDU2XDEzNTY0MjA3MDdca3NjeHdOUjJ0SnBQMVQxekRMTlBiQjVVaUtJVTl0T1NKWFRVZEc3WDloOD1ceGFuZHlhbmR6";
    let request = RawRequest {
        method: "POST",
        path: "/somewhere/over/the/rainbow",
        query: Some(query),
        host: Some("example.com"),
        port: Some(443),
        ..Default::default()
    };
    let err = server::authenticate_bewit(&request, &resolver_sha256, &VerifyOptions::new())
        .unwrap_err();
    assert_eq!(err, Error::InvalidMethod);
    assert_eq!(err.challenge().unwrap(), "Hawk error=\"Invalid method\"");
}

#[test]
fn bewit_head_is_allowed_but_macs_as_get() {
    let url = Url::parse("https://example.com/somewhere/over/the/rainbow").unwrap();
    let clock = FixedClock(1356420407000);
    let bewit = client::get_bewit(
        &url,
        &sha256_credentials(),
        300,
        &BewitOptions {
            clock: Some(&clock),
            ..Default::default()
        },
    )
    .unwrap();
    let query = format!("bewit={}", bewit.bewit);
    let request = RawRequest {
        method: "HEAD",
        path: "/somewhere/over/the/rainbow",
        query: Some(&query),
        host: Some("example.com"),
        port: Some(443),
        ..Default::default()
    };
    server::authenticate_bewit(
        &request,
        &resolver_sha256,
        &VerifyOptions {
            clock: Some(&clock),
            ..VerifyOptions::new()
        },
    )
    .unwrap();
}

#[test]
fn bewit_with_other_query_parameters() {
    let url = Url::parse("https://example.com/somewhere/over/the/rainbow?a=1&b=2").unwrap();
    let clock = FixedClock(1356420407000);
    let bewit = client::get_bewit(
        &url,
        &sha256_credentials(),
        300,
        &BewitOptions {
            clock: Some(&clock),
            ..Default::default()
        },
    )
    .unwrap();
    // the bewit lands in the middle of the query string
    let query = format!("a=1&bewit={}&b=2", bewit.bewit);
    let request = RawRequest {
        method: "GET",
        path: "/somewhere/over/the/rainbow",
        query: Some(&query),
        host: Some("example.com"),
        port: Some(443),
        ..Default::default()
    };
    server::authenticate_bewit(
        &request,
        &resolver_sha256,
        &VerifyOptions {
            clock: Some(&clock),
            ..VerifyOptions::new()
        },
    )
    .unwrap();
}

#[test]
fn bewit_structural_rejections() {
    let cases: [(&str, Error); 3] = [
        ("bewit=", Error::EmptyBewit),
        ("bewit=*", Error::InvalidBewitEncoding),
        // base64 of "a\\123" (two fields only)
        ("bewit=YVwxMjM", Error::InvalidBewitStructure),
    ];
    for (query, expected) in cases {
        let request = RawRequest {
            method: "GET",
            path: "/x",
            query: Some(query),
            host: Some("example.com"),
            port: Some(443),
            ..Default::default()
        };
        assert_eq!(
            server::authenticate_bewit(&request, &resolver_sha256, &VerifyOptions::new())
                .unwrap_err(),
            expected,
            "query {query:?}"
        );
    }
}

#[test]
fn bewit_alongside_authorization_header() {
    let headers = [("authorization", "Hawk id=\"1\", ts=\"2\", nonce=\"n\", mac=\"m\"")];
    let request = RawRequest {
        method: "GET",
        path: "/x",
        query: Some("bewit=YQ"),
        host: Some("example.com"),
        port: Some(443),
        headers: &headers,
        ..Default::default()
    };
    assert_eq!(
        server::authenticate_bewit(&request, &resolver_sha256, &VerifyOptions::new())
            .unwrap_err(),
        Error::MultipleAuthentications
    );
}

#[test]
fn bewit_resource_length_limit() {
    let path = format!("/{}", "a".repeat(4200));
    let request = RawRequest {
        method: "GET",
        path: &path,
        query: Some("bewit=YQ"),
        host: Some("example.com"),
        port: Some(443),
        ..Default::default()
    };
    assert_eq!(
        server::authenticate_bewit(&request, &resolver_sha256, &VerifyOptions::new())
            .unwrap_err(),
        Error::ResourcePathExceedsMaxLength
    );
}

#[test]
fn stale_timestamp_challenge_shape() {
    let clock = FixedClock(1365741469000);
    let url = Url::parse("http://example.net/somewhere/over/the/rainbow").unwrap();
    let auth = client::header(
        &url,
        "POST",
        &sha256_credentials(),
        &HeaderOptions {
            ts: Some(1362337299),
            nonce: Some("Ygvqdz"),
            ..Default::default()
        },
    )
    .unwrap();
    let headers = [("host", "example.net"), ("authorization", auth.header.as_str())];
    let request = RawRequest {
        method: "POST",
        path: "/somewhere/over/the/rainbow",
        port: Some(80),
        headers: &headers,
        ..Default::default()
    };
    let err = server::authenticate(
        &request,
        &resolver_sha256,
        &VerifyOptions {
            clock: Some(&clock),
            ..VerifyOptions::new()
        },
    )
    .unwrap_err();
    assert_eq!(err.status(), 401);

    // challenge matches: Hawk ts="<digits>", tsm="<non-empty>", error="Stale timestamp"
    let challenge = err.challenge().unwrap();
    let rest = challenge.strip_prefix("Hawk ts=\"").unwrap();
    let (ts, rest) = rest.split_once('"').unwrap();
    assert!(!ts.is_empty() && ts.bytes().all(|b| b.is_ascii_digit()));
    let rest = rest.strip_prefix(", tsm=\"").unwrap();
    let (tsm, rest) = rest.split_once('"').unwrap();
    assert!(!tsm.is_empty() && !tsm.contains('"'));
    assert_eq!(rest, ", error=\"Stale timestamp\"");
    assert_eq!(ts, "1365741469");
}
