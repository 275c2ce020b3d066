//! The `hawkling` crate implements both ends of the
//! [Hawk](https://github.com/mozilla/hawk) holder-of-key authentication
//! scheme: clients that sign requests and validate responses, and servers
//! that verify requests, bewits, and out-of-band messages.  It is a
//! low-level crate; HTTP framework integration, credential storage, and
//! nonce storage belong to the host and are reached through small
//! collaborator traits.
//!
//! # Examples
//!
//! ## Client
//!
//! ```
//! use hawkling::{client, Algorithm, Credentials};
//! use url::Url;
//!
//! let credentials = Credentials::new("test-client", "no-secret", Algorithm::Sha256);
//! let url = Url::parse("http://localhost:8000/resource?a=b").unwrap();
//!
//! // sign the request; a fresh timestamp and nonce are generated
//! let auth = client::header(&url, "GET", &credentials, &Default::default()).unwrap();
//! assert!(auth.header.starts_with("Hawk id=\"test-client\", ts=\""));
//! assert!(auth.header.contains("mac=\""));
//! ```
//!
//! ## Server
//!
//! ```
//! use hawkling::{client, server, Algorithm, Credentials, RawRequest, VerifyOptions};
//! use url::Url;
//!
//! let credentials = Credentials::new("test-client", "no-secret", Algorithm::Sha256);
//!
//! // a request signed by the client above
//! let url = Url::parse("http://localhost:8000/resource?a=b").unwrap();
//! let auth = client::header(&url, "GET", &credentials, &Default::default()).unwrap();
//!
//! // the server sees the wire form and resolves credentials by id
//! let headers = [
//!     ("host", "localhost:8000"),
//!     ("authorization", auth.header.as_str()),
//! ];
//! let request = RawRequest {
//!     method: "GET",
//!     path: "/resource",
//!     query: Some("a=b"),
//!     headers: &headers,
//!     ..Default::default()
//! };
//! let resolver = |id: &str| -> Option<Credentials> {
//!     (id == "test-client").then(|| Credentials::new("test-client", "no-secret", Algorithm::Sha256))
//! };
//! let result = server::authenticate(&request, &resolver, &VerifyOptions::new()).unwrap();
//! assert_eq!(result.artifacts.resource, "/resource?a=b");
//! ```
//!
//! ## Bewits
//!
//! ```
//! use hawkling::{client, server, Algorithm, Credentials, RawRequest, VerifyOptions};
//! use url::Url;
//!
//! let credentials = Credentials::new("me", "tok", Algorithm::Sha256);
//! let url = Url::parse("https://example.com/resource").unwrap();
//! let bewit = client::get_bewit(&url, &credentials, 60, &Default::default()).unwrap();
//! let signed_path = format!("/resource?bewit={}", bewit.bewit);
//! // .. the server authenticates the GET for the next 60 seconds
//! # let query = signed_path.strip_prefix("/resource?").unwrap().to_string();
//! # let request = RawRequest {
//! #     method: "GET",
//! #     path: "/resource",
//! #     query: Some(&query),
//! #     host: Some("example.com"),
//! #     port: Some(443),
//! #     ..Default::default()
//! # };
//! # let resolver = |id: &str| -> Option<Credentials> {
//! #     (id == "me").then(|| Credentials::new("me", "tok", Algorithm::Sha256))
//! # };
//! # server::authenticate_bewit(&request, &resolver, &VerifyOptions::new()).unwrap();
//! ```
//!
//! # Errors
//!
//! Every failure maps to one [`Error`] kind; [`Error::status`] gives the
//! HTTP status to answer with and [`Error::challenge`] the
//! `WWW-Authenticate` value to attach to 401s, including the `ts`/`tsm`
//! pair that lets clients recover from clock skew.

mod artifacts;
pub use crate::artifacts::Artifacts;

mod b64;

mod bewit;
pub use crate::bewit::Bewit;

pub mod client;
pub use crate::client::{
    BewitOptions, ClientAuthorization, ClientBewit, HeaderOptions, MessageAuthorization,
    MessageOptions, ResponseOptions, ServerResponse,
};

mod clock;
pub use crate::clock::{Clock, FixedClock, SystemClock};

mod context;
pub use crate::context::{CredentialsResolver, NonceValidator};

mod credentials;
pub use crate::credentials::{Algorithm, Credentials};

mod crypto;

mod error;
pub use crate::error::Error;

mod header;
pub use crate::header::ParsedHeader;

pub mod mac;
pub use crate::mac::MacType;

mod payload;
pub use crate::payload::PayloadHasher;

mod request;
pub use crate::request::{RawRequest, RequestOptions, RequestView};

pub mod server;
pub use crate::server::{
    Authenticated, BewitAuthenticated, VerifyOptions, DEFAULT_TIMESTAMP_SKEW_SEC,
};
