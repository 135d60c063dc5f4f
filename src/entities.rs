//! Entity tables for HTML encoding and decoding.
//!
//! Three tables drive the codec:
//!
//! | Table | Contents | Used by |
//! |-------|----------|---------|
//! | aggressive | `&`, `<`, `>`, `"` | encoder (always) |
//! | defensive | HTML 4.0 Latin-1, special and symbol entities | encoder (when defensive) |
//! | decode | entity text → char, inverse of both | decoder |
//!
//! The entity spellings are the compatibility surface of the codec: another
//! implementation must agree entity-for-entity and code-point-for-code-point
//! for encoded text to round-trip between them. Spellings are case-sensitive
//! (`&Alpha;` and `&alpha;` are different entries).
//!
//! ## Construction
//!
//! A registry is built once and never mutated. Building validates the table
//! data: every entity must look like `&name;`, a table may not list the same
//! character twice, and no entity text may appear twice across the tables
//! (otherwise the decode table would silently lose an entry).
//!
//! [`EntityRegistry::standard`] holds the process-wide instance used by the
//! free functions in the crate root. Code that wants explicit wiring builds
//! its own with [`EntityRegistry::new`] and passes it by reference.

use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableError {
    #[error("entity {entity} maps to both U+{first:04X} and U+{second:04X}")]
    DuplicateEntity {
        entity: &'static str,
        first: u32,
        second: u32,
    },
    #[error("{table} table lists U+{code_point:04X} more than once")]
    DuplicateCodePoint { table: &'static str, code_point: u32 },
    #[error("malformed entity text {0:?} (expected &name;)")]
    MalformedEntity(&'static str),
}

/// Markup-syntax characters. Always escaped.
pub const AGGRESSIVE_ENTITIES: &[(char, &str)] = &[
    ('"', "&quot;"),
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
];

/// Defensive entities: Latin-1 supplement, then the special and symbol sets.
pub const DEFENSIVE_ENTITIES: &[&[(char, &str)]] =
    &[LATIN1_ENTITIES, SPECIAL_ENTITIES, SYMBOL_ENTITIES];

const LATIN1_ENTITIES: &[(char, &str)] = &[
    ('\u{00A0}', "&nbsp;"),
    ('\u{00A1}', "&iexcl;"),
    ('\u{00A2}', "&cent;"),
    ('\u{00A3}', "&pound;"),
    ('\u{00A4}', "&curren;"),
    ('\u{00A5}', "&yen;"),
    ('\u{00A6}', "&brvbar;"),
    ('\u{00A7}', "&sect;"),
    ('\u{00A8}', "&uml;"),
    ('\u{00A9}', "&copy;"),
    ('\u{00AA}', "&ordf;"),
    ('\u{00AB}', "&laquo;"),
    ('\u{00AC}', "&not;"),
    ('\u{00AD}', "&shy;"),
    ('\u{00AE}', "&reg;"),
    ('\u{00AF}', "&macr;"),
    ('\u{00B0}', "&deg;"),
    ('\u{00B1}', "&plusmn;"),
    ('\u{00B2}', "&sup2;"),
    ('\u{00B3}', "&sup3;"),
    ('\u{00B4}', "&acute;"),
    ('\u{00B5}', "&micro;"),
    ('\u{00B6}', "&para;"),
    ('\u{00B7}', "&middot;"),
    ('\u{00B8}', "&cedil;"),
    ('\u{00B9}', "&sup1;"),
    ('\u{00BA}', "&ordm;"),
    ('\u{00BB}', "&raquo;"),
    ('\u{00BC}', "&frac14;"),
    ('\u{00BD}', "&frac12;"),
    ('\u{00BE}', "&frac34;"),
    ('\u{00BF}', "&iquest;"),
    ('\u{00C0}', "&Agrave;"),
    ('\u{00C1}', "&Aacute;"),
    ('\u{00C2}', "&Acirc;"),
    ('\u{00C3}', "&Atilde;"),
    ('\u{00C4}', "&Auml;"),
    ('\u{00C5}', "&Aring;"),
    ('\u{00C6}', "&AElig;"),
    ('\u{00C7}', "&Ccedil;"),
    ('\u{00C8}', "&Egrave;"),
    ('\u{00C9}', "&Eacute;"),
    ('\u{00CA}', "&Ecirc;"),
    ('\u{00CB}', "&Euml;"),
    ('\u{00CC}', "&Igrave;"),
    ('\u{00CD}', "&Iacute;"),
    ('\u{00CE}', "&Icirc;"),
    ('\u{00CF}', "&Iuml;"),
    ('\u{00D0}', "&ETH;"),
    ('\u{00D1}', "&Ntilde;"),
    ('\u{00D2}', "&Ograve;"),
    ('\u{00D3}', "&Oacute;"),
    ('\u{00D4}', "&Ocirc;"),
    ('\u{00D5}', "&Otilde;"),
    ('\u{00D6}', "&Ouml;"),
    ('\u{00D7}', "&times;"),
    ('\u{00D8}', "&Oslash;"),
    ('\u{00D9}', "&Ugrave;"),
    ('\u{00DA}', "&Uacute;"),
    ('\u{00DB}', "&Ucirc;"),
    ('\u{00DC}', "&Uuml;"),
    ('\u{00DD}', "&Yacute;"),
    ('\u{00DE}', "&THORN;"),
    ('\u{00DF}', "&szlig;"),
    ('\u{00E0}', "&agrave;"),
    ('\u{00E1}', "&aacute;"),
    ('\u{00E2}', "&acirc;"),
    ('\u{00E3}', "&atilde;"),
    ('\u{00E4}', "&auml;"),
    ('\u{00E5}', "&aring;"),
    ('\u{00E6}', "&aelig;"),
    ('\u{00E7}', "&ccedil;"),
    ('\u{00E8}', "&egrave;"),
    ('\u{00E9}', "&eacute;"),
    ('\u{00EA}', "&ecirc;"),
    ('\u{00EB}', "&euml;"),
    ('\u{00EC}', "&igrave;"),
    ('\u{00ED}', "&iacute;"),
    ('\u{00EE}', "&icirc;"),
    ('\u{00EF}', "&iuml;"),
    ('\u{00F0}', "&eth;"),
    ('\u{00F1}', "&ntilde;"),
    ('\u{00F2}', "&ograve;"),
    ('\u{00F3}', "&oacute;"),
    ('\u{00F4}', "&ocirc;"),
    ('\u{00F5}', "&otilde;"),
    ('\u{00F6}', "&ouml;"),
    ('\u{00F7}', "&divide;"),
    ('\u{00F8}', "&oslash;"),
    ('\u{00F9}', "&ugrave;"),
    ('\u{00FA}', "&uacute;"),
    ('\u{00FB}', "&ucirc;"),
    ('\u{00FC}', "&uuml;"),
    ('\u{00FD}', "&yacute;"),
    ('\u{00FE}', "&thorn;"),
    ('\u{00FF}', "&yuml;"),
];

const SPECIAL_ENTITIES: &[(char, &str)] = &[
    ('\u{0152}', "&OElig;"),
    ('\u{0153}', "&oelig;"),
    ('\u{0160}', "&Scaron;"),
    ('\u{0161}', "&scaron;"),
    ('\u{0178}', "&Yuml;"),
    ('\u{02C6}', "&circ;"),
    ('\u{02DC}', "&tilde;"),
    ('\u{2002}', "&ensp;"),
    ('\u{2003}', "&emsp;"),
    ('\u{2009}', "&thinsp;"),
    ('\u{200C}', "&zwnj;"),
    ('\u{200D}', "&zwj;"),
    ('\u{200E}', "&lrm;"),
    ('\u{200F}', "&rlm;"),
    ('\u{2013}', "&ndash;"),
    ('\u{2014}', "&mdash;"),
    ('\u{2018}', "&lsquo;"),
    ('\u{2019}', "&rsquo;"),
    ('\u{201A}', "&sbquo;"),
    ('\u{201C}', "&ldquo;"),
    ('\u{201D}', "&rdquo;"),
    ('\u{201E}', "&bdquo;"),
    ('\u{2020}', "&dagger;"),
    ('\u{2021}', "&Dagger;"),
    ('\u{2030}', "&permil;"),
    ('\u{2039}', "&lsaquo;"),
    ('\u{203A}', "&rsaquo;"),
    ('\u{20AC}', "&euro;"),
];

// Greek letters, arrows, mathematical operators and miscellaneous symbols.
const SYMBOL_ENTITIES: &[(char, &str)] = &[
    ('\u{0192}', "&fnof;"),
    ('\u{0391}', "&Alpha;"),
    ('\u{0392}', "&Beta;"),
    ('\u{0393}', "&Gamma;"),
    ('\u{0394}', "&Delta;"),
    ('\u{0395}', "&Epsilon;"),
    ('\u{0396}', "&Zeta;"),
    ('\u{0397}', "&Eta;"),
    ('\u{0398}', "&Theta;"),
    ('\u{0399}', "&Iota;"),
    ('\u{039A}', "&Kappa;"),
    ('\u{039B}', "&Lambda;"),
    ('\u{039C}', "&Mu;"),
    ('\u{039D}', "&Nu;"),
    ('\u{039E}', "&Xi;"),
    ('\u{039F}', "&Omicron;"),
    ('\u{03A0}', "&Pi;"),
    ('\u{03A1}', "&Rho;"),
    ('\u{03A3}', "&Sigma;"),
    ('\u{03A4}', "&Tau;"),
    ('\u{03A5}', "&Upsilon;"),
    ('\u{03A6}', "&Phi;"),
    ('\u{03A7}', "&Chi;"),
    ('\u{03A8}', "&Psi;"),
    ('\u{03A9}', "&Omega;"),
    ('\u{03B1}', "&alpha;"),
    ('\u{03B2}', "&beta;"),
    ('\u{03B3}', "&gamma;"),
    ('\u{03B4}', "&delta;"),
    ('\u{03B5}', "&epsilon;"),
    ('\u{03B6}', "&zeta;"),
    ('\u{03B7}', "&eta;"),
    ('\u{03B8}', "&theta;"),
    ('\u{03B9}', "&iota;"),
    ('\u{03BA}', "&kappa;"),
    ('\u{03BB}', "&lambda;"),
    ('\u{03BC}', "&mu;"),
    ('\u{03BD}', "&nu;"),
    ('\u{03BE}', "&xi;"),
    ('\u{03BF}', "&omicron;"),
    ('\u{03C0}', "&pi;"),
    ('\u{03C1}', "&rho;"),
    ('\u{03C2}', "&sigmaf;"),
    ('\u{03C3}', "&sigma;"),
    ('\u{03C4}', "&tau;"),
    ('\u{03C5}', "&upsilon;"),
    ('\u{03C6}', "&phi;"),
    ('\u{03C7}', "&chi;"),
    ('\u{03C8}', "&psi;"),
    ('\u{03C9}', "&omega;"),
    ('\u{03D1}', "&thetasym;"),
    ('\u{03D2}', "&upsih;"),
    ('\u{03D6}', "&piv;"),
    ('\u{2022}', "&bull;"),
    ('\u{2026}', "&hellip;"),
    ('\u{2032}', "&prime;"),
    ('\u{2033}', "&Prime;"),
    ('\u{203E}', "&oline;"),
    ('\u{2044}', "&frasl;"),
    ('\u{2111}', "&image;"),
    ('\u{2118}', "&weierp;"),
    ('\u{211C}', "&real;"),
    ('\u{2122}', "&trade;"),
    ('\u{2135}', "&alefsym;"),
    ('\u{2190}', "&larr;"),
    ('\u{2191}', "&uarr;"),
    ('\u{2192}', "&rarr;"),
    ('\u{2193}', "&darr;"),
    ('\u{2194}', "&harr;"),
    ('\u{21B5}', "&crarr;"),
    ('\u{21D0}', "&lArr;"),
    ('\u{21D1}', "&uArr;"),
    ('\u{21D2}', "&rArr;"),
    ('\u{21D3}', "&dArr;"),
    ('\u{21D4}', "&hArr;"),
    ('\u{2200}', "&forall;"),
    ('\u{2202}', "&part;"),
    ('\u{2203}', "&exist;"),
    ('\u{2205}', "&empty;"),
    ('\u{2207}', "&nabla;"),
    ('\u{2208}', "&isin;"),
    ('\u{2209}', "&notin;"),
    ('\u{220B}', "&ni;"),
    ('\u{220F}', "&prod;"),
    ('\u{2211}', "&sum;"),
    ('\u{2212}', "&minus;"),
    ('\u{2217}', "&lowast;"),
    ('\u{221A}', "&radic;"),
    ('\u{221D}', "&prop;"),
    ('\u{221E}', "&infin;"),
    ('\u{2220}', "&ang;"),
    ('\u{2227}', "&and;"),
    ('\u{2228}', "&or;"),
    ('\u{2229}', "&cap;"),
    ('\u{222A}', "&cup;"),
    ('\u{222B}', "&int;"),
    ('\u{2234}', "&there4;"),
    ('\u{223C}', "&sim;"),
    ('\u{2245}', "&cong;"),
    ('\u{2248}', "&asymp;"),
    ('\u{2260}', "&ne;"),
    ('\u{2261}', "&equiv;"),
    ('\u{2264}', "&le;"),
    ('\u{2265}', "&ge;"),
    ('\u{2282}', "&sub;"),
    ('\u{2283}', "&sup;"),
    ('\u{2284}', "&nsub;"),
    ('\u{2286}', "&sube;"),
    ('\u{2287}', "&supe;"),
    ('\u{2295}', "&oplus;"),
    ('\u{2297}', "&otimes;"),
    ('\u{22A5}', "&perp;"),
    ('\u{22C5}', "&sdot;"),
    ('\u{2308}', "&lceil;"),
    ('\u{2309}', "&rceil;"),
    ('\u{230A}', "&lfloor;"),
    ('\u{230B}', "&rfloor;"),
    ('\u{2329}', "&lang;"),
    ('\u{232A}', "&rang;"),
    ('\u{25CA}', "&loz;"),
    ('\u{2660}', "&spades;"),
    ('\u{2663}', "&clubs;"),
    ('\u{2665}', "&hearts;"),
    ('\u{2666}', "&diams;"),
];

/// Which encoding table produced a replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Aggressive,
    Defensive,
}

impl TableKind {
    pub fn label(self) -> &'static str {
        match self {
            TableKind::Aggressive => "aggressive",
            TableKind::Defensive => "defensive",
        }
    }
}

/// An immutable char → entity mapping that remembers its insertion order.
#[derive(Debug, Clone)]
pub struct EncodingTable {
    kind: TableKind,
    entries: Vec<(char, &'static str)>,
    index: HashMap<char, &'static str>,
}

impl EncodingTable {
    /// Build a table, rejecting malformed entity text and repeated characters.
    pub fn new(
        kind: TableKind,
        entries: impl IntoIterator<Item = (char, &'static str)>,
    ) -> Result<Self, TableError> {
        let entries: Vec<(char, &'static str)> = entries.into_iter().collect();
        let mut index = HashMap::with_capacity(entries.len());
        for &(ch, entity) in &entries {
            if !is_well_formed(entity) {
                return Err(TableError::MalformedEntity(entity));
            }
            if index.insert(ch, entity).is_some() {
                return Err(TableError::DuplicateCodePoint {
                    table: kind.label(),
                    code_point: ch as u32,
                });
            }
        }
        Ok(Self {
            kind,
            entries,
            index,
        })
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn get(&self, ch: char) -> Option<&'static str> {
        self.index.get(&ch).copied()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.index.contains_key(&ch)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order they were supplied.
    pub fn iter(&self) -> impl Iterator<Item = (char, &'static str)> + '_ {
        self.entries.iter().copied()
    }
}

/// `&name;` with a non-empty name and no delimiters inside.
fn is_well_formed(entity: &str) -> bool {
    entity
        .strip_prefix('&')
        .and_then(|rest| rest.strip_suffix(';'))
        .is_some_and(|name| !name.is_empty() && !name.contains(['&', ';']))
}

/// The aggressive, defensive and decode tables, built together.
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    aggressive: EncodingTable,
    defensive: EncodingTable,
    decode: HashMap<&'static str, char>,
}

static STANDARD: LazyLock<EntityRegistry> = LazyLock::new(|| {
    EntityRegistry::new().expect("built-in entity tables must be collision-free")
});

impl EntityRegistry {
    /// Build the registry from the built-in HTML 4.0 tables.
    pub fn new() -> Result<Self, TableError> {
        let aggressive =
            EncodingTable::new(TableKind::Aggressive, AGGRESSIVE_ENTITIES.iter().copied())?;
        let defensive = EncodingTable::new(
            TableKind::Defensive,
            DEFENSIVE_ENTITIES.iter().flat_map(|set| set.iter().copied()),
        )?;
        Self::from_tables(aggressive, defensive)
    }

    /// Build a registry from custom tables, inverting them into the decode table.
    ///
    /// Fails with [`TableError::DuplicateEntity`] when two entries share the
    /// same entity text, whether within one table or across both.
    pub fn from_tables(
        aggressive: EncodingTable,
        defensive: EncodingTable,
    ) -> Result<Self, TableError> {
        let mut decode = HashMap::with_capacity(aggressive.len() + defensive.len());
        for (ch, entity) in aggressive.iter().chain(defensive.iter()) {
            if let Some(previous) = decode.insert(entity, ch) {
                return Err(TableError::DuplicateEntity {
                    entity,
                    first: previous as u32,
                    second: ch as u32,
                });
            }
        }
        log::debug!(
            "entity registry built: {} aggressive, {} defensive, {} decodable",
            aggressive.len(),
            defensive.len(),
            decode.len()
        );
        Ok(Self {
            aggressive,
            defensive,
            decode,
        })
    }

    /// The process-wide registry over the built-in tables.
    ///
    /// Built on first access. Panics if the built-in data is inconsistent,
    /// which the test suite rules out.
    pub fn standard() -> &'static EntityRegistry {
        &STANDARD
    }

    pub fn aggressive_table(&self) -> &EncodingTable {
        &self.aggressive
    }

    pub fn defensive_table(&self) -> &EncodingTable {
        &self.defensive
    }

    pub fn decode_table(&self) -> &HashMap<&'static str, char> {
        &self.decode
    }

    /// Find the replacement for `ch`, aggressive table first.
    ///
    /// The defensive table is skipped when `defensive` is false. At most one
    /// replacement is ever returned for a character.
    pub fn lookup(&self, ch: char, defensive: bool) -> Option<(TableKind, &'static str)> {
        if let Some(entity) = self.aggressive.get(ch) {
            return Some((TableKind::Aggressive, entity));
        }
        if defensive {
            return self.defensive.get(ch).map(|e| (TableKind::Defensive, e));
        }
        None
    }

    /// Resolve a complete named reference such as `"&euro;"`.
    pub fn decode_named(&self, entity: &str) -> Option<char> {
        self.decode.get(entity).copied()
    }
}
