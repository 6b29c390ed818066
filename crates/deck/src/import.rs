//! Import resolver and share-URL helpers.
//!
//! An import payload is one of, tried in order:
//! 1. an `http(s)://` URL whose query or fragment carries `share=<token>`
//! 2. raw deck JSON (text starting with `{` or `[`)
//! 3. a bare share token

use percent_encoding::percent_decode_str;
use tracing::debug;

use crate::codec::parse_deck;
use crate::error::DeckError;
use crate::model::Deck;
use crate::share::decode_share_token;

/// Query/fragment parameter carrying a share token.
pub const SHARE_PARAM: &str = "share";

/// The single message shown for any rejected import.
pub const IMPORT_FAILED_MESSAGE: &str = "Import failed. Use JSON or a share string.";

/// Resolves a pasted import payload into a deck.
///
/// Every failure collapses to [`DeckError::Import`]; the cause is logged.
pub fn resolve_import(input: &str) -> Result<Deck, DeckError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DeckError::Import);
    }

    if (trimmed.starts_with("http://") || trimmed.starts_with("https://"))
        && let Some(token) = share_param(trimmed)
    {
        return deck_from_token(&token).map_err(import_failed);
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return parse_deck(trimmed).map_err(import_failed);
    }

    deck_from_token(trimmed).map_err(import_failed)
}

/// Decodes a share token and parses the deck it carries.
pub fn deck_from_token(token: &str) -> Result<Deck, DeckError> {
    parse_deck(&decode_share_token(token)?)
}

fn import_failed(cause: DeckError) -> DeckError {
    debug!(error = %cause, "import rejected");
    DeckError::Import
}

/// Extracts the `share` parameter from a URL's query, else its fragment.
///
/// Empty values count as absent.
pub fn share_param(url: &str) -> Option<String> {
    let parts = UrlParts::split(url);
    parts
        .query
        .and_then(|q| query_value(q, SHARE_PARAM))
        .or_else(|| parts.fragment.and_then(|f| query_value(f, SHARE_PARAM)))
}

/// Builds a share URL: `base` with its `share` query parameter set to
/// `token` and any fragment cleared. Other query parameters are kept.
pub fn build_share_url(base: &str, token: &str) -> String {
    let parts = UrlParts::split(base);
    let mut pairs: Vec<String> = Vec::new();
    let mut replaced = false;
    for pair in parts.query.into_iter().flat_map(|q| q.split('&')) {
        if pair.is_empty() {
            continue;
        }
        if pair_key(pair) == SHARE_PARAM {
            if !replaced {
                pairs.push(format!("{SHARE_PARAM}={token}"));
                replaced = true;
            }
            continue;
        }
        pairs.push(pair.to_string());
    }
    if !replaced {
        pairs.push(format!("{SHARE_PARAM}={token}"));
    }
    format!("{}?{}", parts.base_with_path(), pairs.join("&"))
}

/// Removes every `share` query parameter from a URL, keeping the fragment.
pub fn strip_share_param(url: &str) -> String {
    let parts = UrlParts::split(url);
    let kept: Vec<&str> = parts
        .query
        .into_iter()
        .flat_map(|q| q.split('&'))
        .filter(|pair| !pair.is_empty() && pair_key(pair) != SHARE_PARAM)
        .collect();

    let mut out = parts.base_with_path();
    if !kept.is_empty() {
        out.push('?');
        out.push_str(&kept.join("&"));
    }
    if let Some(fragment) = parts.fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// A URL split into the part before `?`, the query and the fragment.
struct UrlParts<'a> {
    base: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

impl<'a> UrlParts<'a> {
    fn split(url: &'a str) -> Self {
        let (rest, fragment) = match url.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (url, None),
        };
        let (base, query) = match rest.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (rest, None),
        };
        Self {
            base,
            query,
            fragment,
        }
    }

    /// Base with a `/` path appended when the URL has only an authority.
    fn base_with_path(&self) -> String {
        let after_scheme = self.base.split_once("://").map_or(self.base, |(_, rest)| rest);
        if after_scheme.contains('/') {
            self.base.to_string()
        } else {
            format!("{}/", self.base)
        }
    }
}

/// Finds the first non-empty value for `name` in a form-encoded string.
fn query_value(query: &str, name: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .find(|pair| pair_key(pair) == name)
        .map(|pair| form_decode(pair.split_once('=').map_or("", |(_, v)| v)))
        .filter(|value| !value.is_empty())
}

fn pair_key(pair: &str) -> String {
    form_decode(pair.split_once('=').map_or(pair, |(k, _)| k))
}

fn form_decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
