//! Batch encoding and decoding of many independent fields.
//!
//! A catalog export runs the codec over every title, plot and cast name of
//! every entry. The fields are independent and the codec only reads its
//! tables, so one [`HtmlCodec`] is shared by reference across a
//! [rayon](https://docs.rs/rayon) pool. Output order always matches input
//! order.

use crate::codec::HtmlCodec;
use crate::config::{ProcessingConfig, effective_threads};
use crate::fallback::FallbackPolicy;
use rayon::prelude::*;

/// Encode every field, in parallel.
pub fn encode_all<F, S>(codec: &HtmlCodec<'_, F>, fields: &[S]) -> Vec<String>
where
    F: FallbackPolicy + Sync,
    S: AsRef<str> + Sync,
{
    fields
        .par_iter()
        .map(|field| codec.encode(field.as_ref()).into_owned())
        .collect()
}

/// Decode every field, in parallel.
pub fn decode_all<F, S>(codec: &HtmlCodec<'_, F>, fields: &[S]) -> Vec<String>
where
    F: FallbackPolicy + Sync,
    S: AsRef<str> + Sync,
{
    fields
        .par_iter()
        .map(|field| codec.decode(field.as_ref()).into_owned())
        .collect()
}

/// Initialize the global rayon pool from the processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
/// Only the first call takes effect; later calls are ignored.
pub fn init_thread_pool(processing: &ProcessingConfig) {
    let threads = effective_threads(processing);
    if rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .is_ok()
    {
        log::debug!("batch pool started with {threads} threads");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EntityRegistry;
    use crate::fallback::HexReference;

    fn titles() -> Vec<String> {
        vec![
            "Amélie".to_string(),
            "Tom & Jerry".to_string(),
            "The Matrix".to_string(),
            String::new(),
            "Léon: The Professional".to_string(),
            "Crouching Tiger, Hidden Dragon (臥虎藏龍)".to_string(),
        ]
    }

    #[test]
    fn parallel_matches_sequential() {
        let codec = HtmlCodec::new(EntityRegistry::standard());
        let input = titles();
        let expected: Vec<String> = input.iter().map(|t| codec.encode(t).into_owned()).collect();
        assert_eq!(encode_all(&codec, &input), expected);
    }

    #[test]
    fn preserves_order_over_many_fields() {
        let codec = HtmlCodec::new(EntityRegistry::standard());
        let input: Vec<String> = (0..2_000).map(|i| format!("#{i} <é>")).collect();
        let encoded = encode_all(&codec, &input);
        for (i, line) in encoded.iter().enumerate() {
            assert_eq!(line, &format!("#{i} &lt;&eacute;&gt;"));
        }
    }

    #[test]
    fn decode_all_round_trips() {
        let codec = HtmlCodec::new(EntityRegistry::standard()).with_fallback(HexReference);
        let input = titles();
        let encoded = encode_all(&codec, &input);
        assert_eq!(decode_all(&codec, &encoded), input);
    }

    #[test]
    fn accepts_str_slices() {
        let codec = HtmlCodec::new(EntityRegistry::standard());
        assert_eq!(decode_all(&codec, &["&lt;", "x"]), vec!["<", "x"]);
        assert!(encode_all::<_, &str>(&codec, &[]).is_empty());
    }

    #[test]
    fn init_thread_pool_is_idempotent() {
        init_thread_pool(&ProcessingConfig {
            max_processes: Some(2),
        });
        init_thread_pool(&ProcessingConfig::default());
    }
}
