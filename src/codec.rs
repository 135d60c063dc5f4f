//! [`HtmlCodec`]: a registry, a fallback policy and the defensive switch,
//! bound together.
//!
//! The free functions in the crate root cover the common case (standard
//! tables, decimal fallback, defensive encoding). A codec is what callers
//! build when they want explicit wiring: a registry they constructed at
//! startup, a different fallback, or settings read from `config.toml`.
//!
//! ```
//! use jukebox_html::{EntityRegistry, HtmlCodec, HexReference};
//!
//! let registry = EntityRegistry::new().unwrap();
//! let codec = HtmlCodec::new(&registry).with_fallback(HexReference);
//! assert_eq!(codec.encode("Ōkami & Amélie"), "&#x14C;kami &amp; Am&eacute;lie");
//! assert_eq!(codec.decode("&#x14C;kami"), "Ōkami");
//! ```

use crate::config::EncodeConfig;
use crate::decode::decode_with;
use crate::encode::{Substitution, encode_with, needs_encoding, substitutions};
use crate::entities::EntityRegistry;
use crate::fallback::{DecimalReference, FallbackPolicy, FallbackStyle};
use std::borrow::Cow;

#[derive(Debug, Clone)]
pub struct HtmlCodec<'r, F = DecimalReference> {
    registry: &'r EntityRegistry,
    fallback: F,
    defensive: bool,
}

impl<'r> HtmlCodec<'r> {
    /// Decimal fallback, defensive table enabled.
    pub fn new(registry: &'r EntityRegistry) -> Self {
        Self {
            registry,
            fallback: DecimalReference,
            defensive: true,
        }
    }
}

impl<'r> HtmlCodec<'r, FallbackStyle> {
    /// Build a codec from the `[encode]` config section.
    pub fn from_config(registry: &'r EntityRegistry, config: &EncodeConfig) -> Self {
        Self {
            registry,
            fallback: config.fallback,
            defensive: config.defensive,
        }
    }
}

impl<'r, F: FallbackPolicy> HtmlCodec<'r, F> {
    /// Swap the fallback policy, keeping everything else.
    pub fn with_fallback<G: FallbackPolicy>(self, fallback: G) -> HtmlCodec<'r, G> {
        HtmlCodec {
            registry: self.registry,
            fallback,
            defensive: self.defensive,
        }
    }

    /// Enable or disable named entities for non-syntax characters.
    pub fn defensive(mut self, defensive: bool) -> Self {
        self.defensive = defensive;
        self
    }

    pub fn registry(&self) -> &'r EntityRegistry {
        self.registry
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }

    pub fn is_defensive(&self) -> bool {
        self.defensive
    }

    pub fn encode<'a>(&self, source: &'a str) -> Cow<'a, str> {
        encode_with(self.registry, &self.fallback, self.defensive, source)
    }

    pub fn decode<'a>(&self, source: &'a str) -> Cow<'a, str> {
        decode_with(self.registry, source)
    }

    /// Absent input stays absent.
    pub fn encode_optional<'a>(&self, source: Option<&'a str>) -> Option<Cow<'a, str>> {
        source.map(|s| self.encode(s))
    }

    pub fn decode_optional<'a>(&self, source: Option<&'a str>) -> Option<Cow<'a, str>> {
        source.map(|s| self.decode(s))
    }

    /// Same check the encoder runs before scanning.
    pub fn needs_encoding(&self, source: &str) -> bool {
        needs_encoding(source, false)
    }

    /// Every substitution [`encode`](Self::encode) would make.
    pub fn inspect(&self, source: &str) -> Vec<Substitution> {
        substitutions(self.registry, &self.fallback, self.defensive, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::SubstitutionSource;
    use crate::entities::TableKind;
    use crate::fallback::{HexReference, NoFallback};

    fn codec() -> HtmlCodec<'static> {
        HtmlCodec::new(EntityRegistry::standard())
    }

    #[test]
    fn defaults() {
        let c = codec();
        assert!(c.is_defensive());
        assert_eq!(*c.fallback(), DecimalReference);
        assert_eq!(c.encode("Amélie & Ōkami"), "Am&eacute;lie &amp; &#332;kami");
    }

    #[test]
    fn builder_switches() {
        let c = codec().defensive(false).with_fallback(HexReference);
        assert!(!c.is_defensive());
        assert_eq!(c.encode("Amélie"), "Am&#xE9;lie");
        // Decoding is independent of encode settings
        assert_eq!(c.decode("Am&#xE9;lie &eacute;"), "Amélie é");
    }

    #[test]
    fn no_fallback_keeps_unmapped_chars_literal() {
        let c = codec().with_fallback(NoFallback);
        assert_eq!(c.encode("日本 & é"), "日本 &amp; &eacute;");
    }

    #[test]
    fn from_config_reads_encode_section() {
        let config = EncodeConfig {
            defensive: false,
            fallback: FallbackStyle::Hexadecimal,
        };
        let c = HtmlCodec::from_config(EntityRegistry::standard(), &config);
        assert_eq!(c.encode("€"), "&#x20AC;");
    }

    #[test]
    fn optional_input() {
        let c = codec();
        assert_eq!(c.encode_optional(None), None);
        assert_eq!(c.decode_optional(None), None);
        assert_eq!(c.encode_optional(Some("<")).as_deref(), Some("&lt;"));
        assert_eq!(c.decode_optional(Some("")).as_deref(), Some(""));
    }

    #[test]
    fn round_trip_every_table_entry() {
        let c = codec();
        let registry = c.registry();
        let all: String = registry
            .aggressive_table()
            .iter()
            .chain(registry.defensive_table().iter())
            .map(|(ch, _)| ch)
            .collect();
        let encoded = c.encode(&all);
        assert!(encoded.is_ascii());
        assert_eq!(c.decode(&encoded), all);
    }

    #[test]
    fn round_trip_with_each_fallback() {
        let text = "Crème brûlée — 日本 \"<&>\" 😀";
        assert_eq!(codec().decode(&codec().encode(text)), text);
        let hex = codec().with_fallback(HexReference);
        assert_eq!(hex.decode(&hex.encode(text)), text);
        let lax = codec().with_fallback(NoFallback).defensive(false);
        assert_eq!(lax.decode(&lax.encode(text)), text);
    }

    #[test]
    fn inspect_matches_encode() {
        let c = codec();
        let subs = c.inspect("a<é");
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[1].source, SubstitutionSource::Table(TableKind::Defensive));
        assert!(c.needs_encoding("a<é"));
        assert!(!c.needs_encoding("plain"));
    }
}
