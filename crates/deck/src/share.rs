//! URL-safe share tokens.
//!
//! A token is the UTF-8 bytes of the text, base64-encoded with the URL-safe
//! alphabet (`-` and `_` instead of `+` and `/`) and without `=` padding.
//! Decoding is lenient: it accepts either alphabet, with or without padding.

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;

use crate::error::DeckError;

/// Standard-alphabet decoder that ignores stray trailing bits.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    PAD.with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encodes text as a share token.
pub fn encode_share_token(text: &str) -> String {
    URL_SAFE_NO_PAD.encode(text.as_bytes())
}

/// Decodes a share token back to text.
pub fn decode_share_token(token: &str) -> Result<String, DeckError> {
    let mut base64 = token.replace('-', "+").replace('_', "/");
    let rem = base64.len() % 4;
    if rem != 0 {
        base64.extend(std::iter::repeat_n('=', 4 - rem));
    }
    let bytes = LENIENT_STANDARD.decode(base64.as_bytes())?;
    Ok(String::from_utf8(bytes)?)
}
