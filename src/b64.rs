//! This module pins the base64 configurations used in Hawk.

use base64::alphabet;
use base64::engine::general_purpose::GeneralPurpose;
use base64::engine::{DecodePaddingMode, GeneralPurposeConfig};

/// BEWIT encodes to a url-safe value with no padding; decoding rejects
/// padded input.
pub(crate) const BEWIT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone),
);

/// STANDARD encodes with the standard alphabet and includes padding.  MACs
/// and payload hashes travel in this form.
pub(crate) const STANDARD: GeneralPurpose = base64::engine::general_purpose::STANDARD;
