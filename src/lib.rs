//! # jukebox-html
//!
//! HTML entity encoding and decoding for movie catalog text: titles, plot
//! summaries, people names. Every free-text field goes through
//! [`encode_html`] before it is embedded in a generated page, and text
//! scraped from fetched or stored HTML goes through [`decode_html`] before it
//! is used as plain text.
//!
//! ```
//! use jukebox_html::{decode_html, encode_html};
//!
//! assert_eq!(encode_html("<b>A & B</b>"), "&lt;b&gt;A &amp; B&lt;/b&gt;");
//! assert_eq!(encode_html("Amélie"), "Am&eacute;lie");
//! assert_eq!(decode_html("&#233;clair &amp; &#xE9;clair"), "éclair & éclair");
//! ```
//!
//! # Pipeline
//!
//! ```text
//! encode:  text → needs_encoding? ─no─→ text (borrowed)
//!                        │yes
//!                        └→ scan: aggressive → defensive → fallback → markup
//!
//! decode:  markup → scan &...; spans → numeric | named | passthrough → text
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`entities`] | Aggressive, defensive and decode tables; [`EntityRegistry`] |
//! | [`fallback`] | [`FallbackPolicy`] and the decimal / hex / no-op policies |
//! | [`encode`] | Pre-scan guard and the single-pass encoder |
//! | [`decode`] | Tolerant single-pass decoder |
//! | [`codec`] | [`HtmlCodec`]: registry + fallback + settings |
//! | [`batch`] | Parallel encode/decode over many fields (rayon) |
//! | [`config`] | `config.toml` loading, merging, validation |
//! | [`output`] | CLI report formatting |
//!
//! # Design Decisions
//!
//! ## Borrow When Nothing Changes
//!
//! Both directions return `Cow<str>`. Plain ASCII titles are the common case
//! and come back borrowed, with no allocation. The output buffer is created
//! on the first substitution, so even a string that passes the guard but
//! turns out to need nothing is never copied.
//!
//! ## First Table Wins
//!
//! The encoder consults the aggressive table, then the defensive table, then
//! the fallback, and stops at the first that claims a character. A character
//! is never encoded twice.
//!
//! ## Decoding Never Fails
//!
//! Unknown names, malformed or out-of-range numbers, and unterminated
//! references are copied through exactly as written. A scraped title with one
//! broken reference still decodes everything else.
//!
//! ## Tables Built Once
//!
//! [`EntityRegistry`] is immutable after construction and validated while it
//! is built: two entries sharing an entity name is a construction error, not
//! a silent overwrite. The free functions here use the process-wide
//! [`EntityRegistry::standard`]; callers that want explicit wiring build one
//! and hand it to [`HtmlCodec`].

pub mod batch;
pub mod codec;
pub mod config;
pub mod decode;
pub mod encode;
pub mod entities;
pub mod fallback;
pub mod output;

pub use codec::HtmlCodec;
pub use encode::needs_encoding;
pub use entities::{EntityRegistry, TableError};
pub use fallback::{DecimalReference, FallbackPolicy, FallbackStyle, HexReference, NoFallback};

use std::borrow::Cow;

/// Encode `source` for embedding in HTML.
///
/// `&`, `<`, `>` and `"` become `&amp;`, `&lt;`, `&gt;`, `&quot;`; characters
/// with an HTML 4.0 name use it (`é` → `&eacute;`); anything else at or above
/// U+00A0 becomes a decimal reference (`Ō` → `&#332;`).
pub fn encode_html(source: &str) -> Cow<'_, str> {
    encode::encode_with(EntityRegistry::standard(), &DecimalReference, true, source)
}

/// Decode named and numeric character references in `source`.
pub fn decode_html(source: &str) -> Cow<'_, str> {
    decode::decode_with(EntityRegistry::standard(), source)
}

/// [`encode_html`] for a field that may be absent.
pub fn encode_optional(source: Option<&str>) -> Option<Cow<'_, str>> {
    source.map(encode_html)
}

/// [`decode_html`] for a field that may be absent.
pub fn decode_optional(source: Option<&str>) -> Option<Cow<'_, str>> {
    source.map(decode_html)
}

#[cfg(test)]
pub(crate) mod test_helpers;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{TITLES, assert_round_trip};

    #[test]
    fn encode_decode_examples() {
        assert_eq!(encode_html("<b>A & B</b>"), "&lt;b&gt;A &amp; B&lt;/b&gt;");
        assert_eq!(decode_html("&lt;b&gt;A &amp; B&lt;/b&gt;"), "<b>A & B</b>");
    }

    #[test]
    fn absent_and_empty() {
        assert_eq!(encode_optional(None), None);
        assert_eq!(decode_optional(None), None);
        assert_eq!(encode_html(""), "");
        assert_eq!(decode_html(""), "");
    }

    #[test]
    fn titles_round_trip() {
        for title in TITLES {
            assert_round_trip(title);
        }
    }
}
