//! HTML decoding of named and numeric character references.
//!
//! The decoder is deliberately forgiving. Text scraped from third-party pages
//! is full of stray ampersands and half-written references, and a title must
//! never be lost because one reference in it is broken. Anything that does
//! not resolve is copied through exactly as written:
//!
//! | Input | Output |
//! |-------|--------|
//! | `&eacute;` | `é` |
//! | `&#233;` / `&#xE9;` | `é` |
//! | `&bogus;` | `&bogus;` |
//! | `&#12ab;`, `&#xD800;`, `&#99999999999;` | unchanged |
//! | `Fish & Chips` (no `;` after `&`) | unchanged |
//! | `Tom & Jerry &amp; Co` (`& Jerry &amp;` is not a name) | unchanged |
//!
//! A reference always runs from an `&` to the first `;` after it.

use crate::entities::EntityRegistry;
use std::borrow::Cow;

/// Decode every character reference in `source` using `registry`.
///
/// Returns the input borrowed when it contains no complete `&...;` span.
pub fn decode_with<'a>(registry: &EntityRegistry, source: &'a str) -> Cow<'a, str> {
    let mut decoded: Option<String> = None;
    let mut cursor = 0;

    while let Some(amp) = source[cursor..].find('&') {
        let candidate = cursor + amp;
        let Some(semi) = source[candidate + 1..].find(';') else {
            break;
        };
        let end = candidate + 1 + semi;
        let entity = &source[candidate..=end];

        let out = decoded.get_or_insert_with(|| String::with_capacity(source.len()));
        out.push_str(&source[cursor..candidate]);
        match resolve(registry, entity) {
            Some(ch) => out.push(ch),
            None => {
                log::trace!("passing through unresolved reference {entity}");
                out.push_str(entity);
            }
        }
        cursor = end + 1;
    }

    match decoded {
        None => Cow::Borrowed(source),
        Some(mut out) => {
            out.push_str(&source[cursor..]);
            Cow::Owned(out)
        }
    }
}

/// Resolve one complete reference (`&...;`, delimiters included).
fn resolve(registry: &EntityRegistry, entity: &str) -> Option<char> {
    match entity.strip_prefix("&#") {
        Some(numeric) => parse_numeric(numeric.strip_suffix(';')?),
        None => registry.decode_named(entity),
    }
}

/// Parse the body of a numeric reference: `233`, `xE9` or `XE9`.
///
/// Only bare digits are accepted (no sign, no whitespace). Values that are
/// not Unicode scalar values (surrogates, above U+10FFFF) fail.
pub fn parse_numeric(body: &str) -> Option<char> {
    let (digits, radix) = match body.strip_prefix(['x', 'X']) {
        Some(hex) => (hex, 16),
        None => (body, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let value = u32::from_str_radix(digits, radix).ok()?;
    char::from_u32(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(source: &str) -> Cow<'_, str> {
        decode_with(EntityRegistry::standard(), source)
    }

    // =========================================================================
    // Named references
    // =========================================================================

    #[test]
    fn decodes_markup_entities() {
        assert_eq!(decode("&lt;b&gt;A &amp; B&lt;/b&gt;"), "<b>A & B</b>");
        assert_eq!(decode("&quot;Heat&quot;"), "\"Heat\"");
    }

    #[test]
    fn unknown_named_entity_passes_through() {
        assert_eq!(
            decode("Price: &euro;5 &notanentity; end"),
            "Price: €5 &notanentity; end"
        );
    }

    #[test]
    fn named_lookup_is_case_sensitive() {
        assert_eq!(decode("&Eacute;&eacute;&EACUTE;"), "Éé&EACUTE;");
    }

    #[test]
    fn apos_is_not_an_html4_entity() {
        assert_eq!(decode("&apos;"), "&apos;");
    }

    // =========================================================================
    // Numeric references
    // =========================================================================

    #[test]
    fn decimal_and_hex_agree() {
        assert_eq!(decode("&#233;clair"), "éclair");
        assert_eq!(decode("&#xE9;clair"), "éclair");
        assert_eq!(decode("&#XE9;clair"), "éclair");
        assert_eq!(decode("&#xe9;clair"), "éclair");
    }

    #[test]
    fn leading_zeros_are_fine() {
        assert_eq!(decode("&#0065;&#x0042;"), "AB");
    }

    #[test]
    fn supplementary_plane_reference() {
        assert_eq!(decode("&#128512;"), "😀");
        assert_eq!(decode("&#x1F600;"), "😀");
    }

    #[test]
    fn malformed_numeric_passes_through() {
        for entity in ["&#;", "&#x;", "&#12ab;", "&#xZZ;", "&#-5;", "&#+5;", "&# 5;", "&#5.0;"] {
            assert_eq!(decode(entity), entity);
        }
    }

    #[test]
    fn out_of_range_numeric_passes_through() {
        assert_eq!(decode("&#xD800;"), "&#xD800;");
        assert_eq!(decode("&#x110000;"), "&#x110000;");
        assert_eq!(decode("&#99999999999;"), "&#99999999999;");
    }

    #[test]
    fn bad_reference_does_not_affect_neighbours() {
        assert_eq!(decode("&amp;&#zz;&amp;"), "&&#zz;&");
    }

    #[test]
    fn parse_numeric_radix_marker() {
        assert_eq!(parse_numeric("65"), Some('A'));
        assert_eq!(parse_numeric("x41"), Some('A'));
        assert_eq!(parse_numeric("X41"), Some('A'));
        assert_eq!(parse_numeric("x"), None);
        assert_eq!(parse_numeric("41x"), None);
    }

    // =========================================================================
    // Delimiter handling
    // =========================================================================

    #[test]
    fn unterminated_reference_is_unchanged() {
        let source = "Unterminated & reference";
        assert!(matches!(decode(source), Cow::Borrowed(s) if s == source));
    }

    #[test]
    fn trailing_ampersand_after_decoded_entity() {
        assert_eq!(decode("&eacute; & more"), "é & more");
    }

    #[test]
    fn stray_ampersand_swallows_following_entity() {
        // The span runs from the first '&' and is not a valid name
        assert_eq!(decode("Tom & Jerry &amp; Co"), "Tom & Jerry &amp; Co");
        assert_eq!(decode("a&&lt;"), "a&&lt;");
        assert_eq!(decode("a&&lt; &gt;"), "a&&lt; >");
    }

    #[test]
    fn semicolon_without_ampersand_is_text() {
        assert_eq!(decode("a; b; c"), "a; b; c");
    }

    #[test]
    fn bare_delimiters() {
        assert_eq!(decode("&;"), "&;");
        assert_eq!(decode("&"), "&");
        assert_eq!(decode(";"), ";");
    }

    #[test]
    fn empty_input() {
        assert_eq!(decode(""), "");
    }

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(decode("No entities here"), Cow::Borrowed(_)));
    }

    #[test]
    fn multibyte_text_around_entities() {
        assert_eq!(decode("日本&amp;中国"), "日本&中国");
    }
}
