//! CLI output formatting.
//!
//! Each report has a `format_*` function that returns lines (pure, no I/O)
//! and a `print_*` wrapper that writes them to stdout.
//!
//! ## Inspect
//!
//! ```text
//! Léon & Mathilda
//! 001 @1  é  U+00E9  &eacute;  defensive
//! 002 @6  &  U+0026  &amp;     aggressive
//! 2 substitutions
//! ```
//!
//! ## Table
//!
//! ```text
//! Aggressive (4)
//!     U+0022  "  &quot;
//!     ...
//! Defensive (248)
//!     U+00A0     &nbsp;
//!     ...
//! ```

use crate::encode::Substitution;
use crate::entities::{EncodingTable, EntityRegistry};
use serde::Serialize;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn code_point(ch: char) -> String {
    format!("U+{:04X}", ch as u32)
}

/// Characters that would garble a terminal line are shown blank.
fn printable(ch: char) -> char {
    let invisible = matches!(ch, '\u{200B}'..='\u{200F}' | '\u{00AD}');
    if ch.is_control() || ch.is_whitespace() || invisible {
        ' '
    } else {
        ch
    }
}

// ============================================================================
// Inspect
// ============================================================================

/// Format the substitutions found in `source`.
pub fn format_inspect(source: &str, substitutions: &[Substitution]) -> Vec<String> {
    let mut lines = vec![source.to_string()];
    let width = substitutions
        .iter()
        .map(|s| s.replacement.len())
        .max()
        .unwrap_or(0);
    for (i, sub) in substitutions.iter().enumerate() {
        lines.push(format!(
            "{} @{}  {}  {}  {:<width$}  {}",
            format_index(i + 1),
            sub.offset,
            printable(sub.ch),
            code_point(sub.ch),
            sub.replacement,
            sub.source.label(),
        ));
    }
    lines.push(match substitutions.len() {
        0 => "nothing to encode".to_string(),
        1 => "1 substitution".to_string(),
        n => format!("{n} substitutions"),
    });
    lines
}

pub fn print_inspect(source: &str, substitutions: &[Substitution]) {
    for line in format_inspect(source, substitutions) {
        println!("{}", line);
    }
}

// ============================================================================
// Entity tables
// ============================================================================

fn table_section(title: &str, table: &EncodingTable) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", title, table.len())];
    for (ch, entity) in table.iter() {
        lines.push(format!("    {}  {}  {}", code_point(ch), printable(ch), entity));
    }
    lines
}

/// Format both encoding tables in their defined order.
pub fn format_table(registry: &EntityRegistry) -> Vec<String> {
    let mut lines = table_section("Aggressive", registry.aggressive_table());
    lines.extend(table_section("Defensive", registry.defensive_table()));
    lines
}

pub fn print_table(registry: &EntityRegistry) {
    for line in format_table(registry) {
        println!("{}", line);
    }
}

/// One row of the JSON table dump.
#[derive(Debug, Serialize)]
pub struct EntityRecord {
    pub code_point: String,
    pub character: char,
    pub entity: &'static str,
}

/// Both encoding tables, serializable for `table --json`.
#[derive(Debug, Serialize)]
pub struct TableDump {
    pub aggressive: Vec<EntityRecord>,
    pub defensive: Vec<EntityRecord>,
}

fn records(table: &EncodingTable) -> Vec<EntityRecord> {
    table
        .iter()
        .map(|(ch, entity)| EntityRecord {
            code_point: code_point(ch),
            character: ch,
            entity,
        })
        .collect()
}

impl TableDump {
    pub fn from_registry(registry: &EntityRegistry) -> Self {
        Self {
            aggressive: records(registry.aggressive_table()),
            defensive: records(registry.defensive_table()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::HtmlCodec;

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn code_point_is_four_digit_hex() {
        assert_eq!(code_point('<'), "U+003C");
        assert_eq!(code_point('😀'), "U+1F600");
    }

    #[test]
    fn inspect_lines() {
        let codec = HtmlCodec::new(EntityRegistry::standard());
        let source = "Léon & Mathilda";
        let lines = format_inspect(source, &codec.inspect(source));
        assert_eq!(
            lines,
            vec![
                "Léon & Mathilda",
                "001 @1  é  U+00E9  &eacute;  defensive",
                "002 @6  &  U+0026  &amp;     aggressive",
                "2 substitutions",
            ]
        );
    }

    #[test]
    fn inspect_single_and_none() {
        let codec = HtmlCodec::new(EntityRegistry::standard());
        let one = format_inspect("Ō", &codec.inspect("Ō"));
        assert_eq!(one[1], "001 @0  Ō  U+014C  &#332;  fallback");
        assert_eq!(one[2], "1 substitution");
        let none = format_inspect("plain", &codec.inspect("plain"));
        assert_eq!(none, vec!["plain", "nothing to encode"]);
    }

    #[test]
    fn invisible_chars_are_blanked() {
        assert_eq!(printable('\u{00A0}'), ' ');
        assert_eq!(printable('\u{00AD}'), ' ');
        assert_eq!(printable('\u{200D}'), ' ');
        assert_eq!(printable('é'), 'é');
    }

    #[test]
    fn table_has_both_sections() {
        let lines = format_table(EntityRegistry::standard());
        assert_eq!(lines[0], "Aggressive (4)");
        assert_eq!(lines[1], "    U+0022  \"  &quot;");
        assert_eq!(lines[5], "Defensive (248)");
        assert_eq!(lines[6], "    U+00A0     &nbsp;");
        assert_eq!(lines.len(), 4 + 248 + 2);
    }

    #[test]
    fn table_dump_serializes() {
        let dump = TableDump::from_registry(EntityRegistry::standard());
        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["aggressive"].as_array().unwrap().len(), 4);
        assert_eq!(json["defensive"].as_array().unwrap().len(), 248);
        assert_eq!(json["aggressive"][1]["entity"], "&amp;");
        assert_eq!(json["aggressive"][1]["character"], "&");
        assert_eq!(json["defensive"][0]["code_point"], "U+00A0");
    }
}
