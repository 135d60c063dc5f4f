//! Fallback policies for characters no entity table covers.
//!
//! When the encoder meets a character that is in neither the aggressive nor
//! the defensive table, it asks the active [`FallbackPolicy`] whether the
//! character still needs escaping and, if so, how to render it. The standard
//! policy is [`DecimalReference`]: everything from U+00A0 upward becomes
//! `&#<decimal>;`, which keeps generated pages pure ASCII regardless of the
//! charset a browser guesses.
//!
//! [`FallbackStyle`] is the config-facing enum. It implements the trait by
//! dispatching to the concrete policies so the CLI can choose one at runtime.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// First code point the numeric policies claim.
pub const FALLBACK_THRESHOLD: char = '\u{00A0}';

/// Decide whether a character needs escaping and render the escape.
pub trait FallbackPolicy {
    fn needs_fallback(&self, ch: char) -> bool;

    /// Append the escaped form of `ch` to `out`.
    fn render_fallback(&self, ch: char, out: &mut String);
}

/// `&#233;`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecimalReference;

impl FallbackPolicy for DecimalReference {
    fn needs_fallback(&self, ch: char) -> bool {
        ch >= FALLBACK_THRESHOLD
    }

    fn render_fallback(&self, ch: char, out: &mut String) {
        // Writing to a String cannot fail
        let _ = write!(out, "&#{};", ch as u32);
    }
}

/// `&#xE9;`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexReference;

impl FallbackPolicy for HexReference {
    fn needs_fallback(&self, ch: char) -> bool {
        ch >= FALLBACK_THRESHOLD
    }

    fn render_fallback(&self, ch: char, out: &mut String) {
        let _ = write!(out, "&#x{:X};", ch as u32);
    }
}

/// Leaves un-mapped characters as literal text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFallback;

impl FallbackPolicy for NoFallback {
    fn needs_fallback(&self, _ch: char) -> bool {
        false
    }

    fn render_fallback(&self, ch: char, out: &mut String) {
        out.push(ch);
    }
}

/// Fallback selection as it appears in `config.toml` and on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackStyle {
    #[default]
    Decimal,
    Hexadecimal,
    None,
}

impl FallbackPolicy for FallbackStyle {
    fn needs_fallback(&self, ch: char) -> bool {
        match self {
            FallbackStyle::Decimal => DecimalReference.needs_fallback(ch),
            FallbackStyle::Hexadecimal => HexReference.needs_fallback(ch),
            FallbackStyle::None => NoFallback.needs_fallback(ch),
        }
    }

    fn render_fallback(&self, ch: char, out: &mut String) {
        match self {
            FallbackStyle::Decimal => DecimalReference.render_fallback(ch, out),
            FallbackStyle::Hexadecimal => HexReference.render_fallback(ch, out),
            FallbackStyle::None => NoFallback.render_fallback(ch, out),
        }
    }
}

impl<P: FallbackPolicy + ?Sized> FallbackPolicy for &P {
    fn needs_fallback(&self, ch: char) -> bool {
        (**self).needs_fallback(ch)
    }

    fn render_fallback(&self, ch: char, out: &mut String) {
        (**self).render_fallback(ch, out)
    }
}
