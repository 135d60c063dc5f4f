//! HTML encoding: the pre-scan guard and the single-pass encoder.
//!
//! ## Fast path
//!
//! Most catalog text (titles, names) is plain ASCII with nothing to escape.
//! [`needs_encoding`] answers "is there anything to do?" in one pass without
//! allocating, and the encoder returns the input as `Cow::Borrowed` when the
//! answer is no.
//!
//! ## Scan
//!
//! The encoder walks the input once. For each character it asks the
//! registry (aggressive table, then defensive) and then the fallback policy.
//! On a hit it flushes the unmatched run since the last hit, appends the
//! replacement and moves the boundary past the character. The output buffer
//! is created on the first hit, so a string whose only candidates turn out to
//! need nothing is still returned borrowed.
//!
//! ```text
//! "Amélie & Nino"
//!    ^^  flush "Am", push "&eacute;"
//!         ^ flush "lie ", push "&amp;"
//!            trailing " Nino" copied at the end
//! ```
//!
//! Each position produces at most one replacement: the first table that
//! knows the character wins and the remaining sources are not consulted.

use crate::entities::{EntityRegistry, TableKind};
use crate::fallback::{FALLBACK_THRESHOLD, FallbackPolicy};
use std::borrow::Cow;

/// Does `source` contain anything the encoder would have to look at?
///
/// True for any character at or above U+00A0. The markup-syntax characters
/// `&`, `<`, `>` and `"` count only when `defensive` is false.
pub fn needs_encoding(source: &str, defensive: bool) -> bool {
    source.chars().any(|ch| {
        ch >= FALLBACK_THRESHOLD || (!defensive && matches!(ch, '&' | '<' | '>' | '"'))
    })
}

/// Where a substitution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstitutionSource {
    Table(TableKind),
    Fallback,
}

impl SubstitutionSource {
    pub fn label(self) -> &'static str {
        match self {
            SubstitutionSource::Table(kind) => kind.label(),
            SubstitutionSource::Fallback => "fallback",
        }
    }
}

/// One character the encoder replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Byte offset of the character in the source.
    pub offset: usize,
    pub ch: char,
    pub replacement: String,
    pub source: SubstitutionSource,
}

/// Encode `source` against `registry`, falling back to `fallback`.
///
/// `defensive` controls whether the defensive table is consulted; the
/// aggressive table always is.
pub fn encode_with<'a, F: FallbackPolicy>(
    registry: &EntityRegistry,
    fallback: &F,
    defensive: bool,
    source: &'a str,
) -> Cow<'a, str> {
    if !needs_encoding(source, false) {
        return Cow::Borrowed(source);
    }

    let mut encoded: Option<String> = None;
    // Byte index of the first character not yet copied to `encoded`
    let mut boundary = 0;

    for (i, ch) in source.char_indices() {
        if let Some((_, entity)) = registry.lookup(ch, defensive) {
            let out = flush(&mut encoded, source, boundary, i);
            out.push_str(entity);
            boundary = i + ch.len_utf8();
        } else if fallback.needs_fallback(ch) {
            let out = flush(&mut encoded, source, boundary, i);
            fallback.render_fallback(ch, out);
            boundary = i + ch.len_utf8();
        }
    }

    match encoded {
        None => Cow::Borrowed(source),
        Some(mut out) => {
            out.push_str(&source[boundary..]);
            Cow::Owned(out)
        }
    }
}

/// Copy the pending run `source[boundary..at]` into the output, creating it
/// on first use.
fn flush<'o>(
    encoded: &'o mut Option<String>,
    source: &str,
    boundary: usize,
    at: usize,
) -> &'o mut String {
    let out = encoded.get_or_insert_with(|| String::with_capacity(source.len() + 16));
    out.push_str(&source[boundary..at]);
    out
}

/// List every substitution [`encode_with`] would make, in source order.
pub fn substitutions<F: FallbackPolicy>(
    registry: &EntityRegistry,
    fallback: &F,
    defensive: bool,
    source: &str,
) -> Vec<Substitution> {
    let mut found = Vec::new();
    for (offset, ch) in source.char_indices() {
        if let Some((kind, entity)) = registry.lookup(ch, defensive) {
            found.push(Substitution {
                offset,
                ch,
                replacement: entity.to_string(),
                source: SubstitutionSource::Table(kind),
            });
        } else if fallback.needs_fallback(ch) {
            let mut replacement = String::new();
            fallback.render_fallback(ch, &mut replacement);
            found.push(Substitution {
                offset,
                ch,
                replacement,
                source: SubstitutionSource::Fallback,
            });
        }
    }
    found
}
