//! Shared test utilities: sample catalog text and round-trip assertions.

use crate::{decode_html, encode_html};

/// Titles and names of the kind the codec sees in practice.
pub const TITLES: &[&str] = &[
    "The Matrix",
    "Amélie",
    "Léon: The Professional",
    "Tom & Jerry",
    "Crouching Tiger, Hidden Dragon (臥虎藏龍)",
    "Das Boot — Director's Cut",
    "8½",
    "Æon Flux",
    "Ōkami",
    "“Quoted” <Title>",
    "Σ & Δ: ≈ ∞",
    "WALL·E",
    "Michael Caine™ ©1966",
    "",
];

/// Assert `decode_html(encode_html(s)) == s`, and that the encoded form only
/// contains ASCII.
pub fn assert_round_trip(source: &str) {
    let encoded = encode_html(source);
    assert!(encoded.is_ascii(), "non-ASCII in {encoded:?}");
    let decoded = decode_html(&encoded);
    assert_eq!(decoded, source, "round trip through {encoded:?}");
}
