//! The Hawk error taxonomy.  Every fallible operation in this crate returns
//! one of these kinds; the kind alone determines the HTTP status a host
//! should answer with and whether a `WWW-Authenticate` challenge is emitted.

/// Errors raised while generating or authenticating Hawk artifacts.
///
/// The `Display` text is the human message the protocol sends inside 401
/// challenges, so variants render as e.g. `Bad mac`, not as debug strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    // 400 — malformed input
    /// The header does not follow the `key="value"` attribute grammar.
    #[error("Bad header format")]
    BadHeaderFormat,

    /// The header exceeds the 4096-byte limit.
    #[error("Header length too long")]
    HeaderTooLong,

    /// No recognizable authentication scheme, or a bare scheme with no
    /// attributes.
    #[error("Invalid header syntax")]
    InvalidHeaderSyntax,

    /// One of `id`, `ts`, `nonce`, `mac` is absent from an authorization
    /// header.
    #[error("Missing attributes")]
    MissingAttributes,

    /// An attribute appeared more than once.
    #[error("Duplicate attribute: {0}")]
    DuplicateAttribute(String),

    /// An attribute key outside the allowed set.
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// A character outside the attribute value grammar (an empty value
    /// reports the closing quote).
    #[error("Bad attribute value: {0}")]
    BadAttributeValue(char),

    /// The bewit is not url-safe base64.
    #[error("Invalid bewit encoding")]
    InvalidBewitEncoding,

    /// The decoded bewit does not have exactly four fields.
    #[error("Invalid bewit structure")]
    InvalidBewitStructure,

    /// One of the bewit's id, expiry, or MAC fields is empty.
    #[error("Missing bewit attributes")]
    MissingBewitAttributes,

    /// A bewit and an Authorization header arrived on the same request.
    #[error("Multiple authentications")]
    MultipleAuthentications,

    /// The request target exceeds the 4096-byte limit.
    #[error("Resource path exceeds max length")]
    ResourcePathExceedsMaxLength,

    /// A message authorization record is incomplete.
    #[error("Invalid authorization")]
    InvalidAuthorization,

    // 401 — authentication failed
    /// No usable authentication was presented.
    #[error("Unauthorized")]
    Unauthorized,

    /// The credentials resolver had nothing for this id.
    #[error("Unknown credentials")]
    UnknownCredentials,

    /// The request MAC did not match.
    #[error("Bad mac")]
    BadMac,

    /// The payload hash did not match.
    #[error("Bad payload hash")]
    BadPayloadHash,

    /// The message hash did not match.
    #[error("Bad message hash")]
    BadMessageHash,

    /// Payload verification was requested but the header carried no hash.
    #[error("Missing required payload hash")]
    MissingRequiredPayloadHash,

    /// A bewit was presented on a method other than GET or HEAD.
    #[error("Invalid method")]
    InvalidMethod,

    /// The nonce validator rejected the nonce as already seen.
    #[error("Invalid nonce")]
    InvalidNonce,

    /// The timestamp fell outside the skew window.  Carries the server time
    /// and its MAC so the client can resynchronize.
    #[error("Stale timestamp")]
    StaleTimestamp {
        /// Server time, in seconds.
        ts: u64,
        /// MAC of the server time under the request's credentials.
        tsm: String,
    },

    /// The bewit expiry has passed.
    #[error("Access expired")]
    AccessExpired,

    /// The `bewit=` parameter was present but empty.
    #[error("Empty bewit")]
    EmptyBewit,

    // 500 — server-side or peer-side defects
    /// The `Host` header (or its substitutes) could not produce a host and
    /// port.
    #[error("Invalid host header")]
    InvalidHostHeader,

    /// Resolved credentials are missing their id or key.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// An algorithm name outside the supported set.
    #[error("Unknown algorithm")]
    UnknownAlgorithm,

    /// The `tsm` in a `WWW-Authenticate` challenge did not verify.
    #[error("Invalid server timestamp hash")]
    InvalidServerTimestampHash,

    /// The `Server-Authorization` MAC did not verify.
    #[error("Bad response mac")]
    BadResponseMac,

    /// The `Server-Authorization` payload hash did not verify.
    #[error("Bad response payload mac")]
    BadResponsePayloadMac,

    /// A response payload was supplied but the server sent no hash.
    #[error("Missing response hash attribute")]
    MissingResponseHashAttribute,

    /// The `WWW-Authenticate` header failed to parse.
    #[error("Invalid WWW-Authenticate header")]
    InvalidWwwAuthenticateHeader,

    /// The `Server-Authorization` header failed to parse.
    #[error("Invalid Server-Authorization header")]
    InvalidServerAuthorizationHeader,

    /// A client-supplied URL has no usable host or port.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The system random generator failed.
    #[error("Cryptographic operation failed")]
    Crypto,
}

impl Error {
    /// The HTTP status a host should answer with for this kind.
    pub fn status(&self) -> u16 {
        match self {
            Error::BadHeaderFormat
            | Error::HeaderTooLong
            | Error::InvalidHeaderSyntax
            | Error::MissingAttributes
            | Error::DuplicateAttribute(_)
            | Error::UnknownAttribute(_)
            | Error::BadAttributeValue(_)
            | Error::InvalidBewitEncoding
            | Error::InvalidBewitStructure
            | Error::MissingBewitAttributes
            | Error::MultipleAuthentications
            | Error::ResourcePathExceedsMaxLength
            | Error::InvalidAuthorization => 400,

            Error::Unauthorized
            | Error::UnknownCredentials
            | Error::BadMac
            | Error::BadPayloadHash
            | Error::BadMessageHash
            | Error::MissingRequiredPayloadHash
            | Error::InvalidMethod
            | Error::InvalidNonce
            | Error::StaleTimestamp { .. }
            | Error::AccessExpired
            | Error::EmptyBewit => 401,

            Error::InvalidHostHeader
            | Error::InvalidCredentials
            | Error::UnknownAlgorithm
            | Error::InvalidServerTimestampHash
            | Error::BadResponseMac
            | Error::BadResponsePayloadMac
            | Error::MissingResponseHashAttribute
            | Error::InvalidWwwAuthenticateHeader
            | Error::InvalidServerAuthorizationHeader
            | Error::InvalidUrl(_)
            | Error::Crypto => 500,
        }
    }

    /// The `WWW-Authenticate` value a host should return alongside a 401,
    /// or `None` for every other status.
    pub fn challenge(&self) -> Option<String> {
        if self.status() != 401 {
            return None;
        }
        Some(match self {
            Error::Unauthorized => "Hawk".to_string(),
            Error::StaleTimestamp { ts, tsm } => {
                format!("Hawk ts=\"{ts}\", tsm=\"{tsm}\", error=\"Stale timestamp\"")
            }
            other => format!("Hawk error=\"{other}\""),
        })
    }
}
