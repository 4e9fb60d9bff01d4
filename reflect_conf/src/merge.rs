//! Merging of prioritised source maps.

use std::collections::HashMap;

/// A string-keyed configuration layer.
pub type SourceMap = HashMap<String, String>;

/// Merge `sources`, highest priority first.
///
/// The first map seeds the result and is consumed in place. Each later map
/// only contributes keys that are still absent. Presence, not content,
/// decides: a blank value in an earlier map still hides the key in later
/// maps. Blank values are kept; treating them as absent is the job of field
/// lookup.
///
/// Returns `None` when no sources are given or the merged map is empty.
///
/// # Examples
///
/// ```
/// use reflect_conf::{SourceMap, merge_sources};
///
/// let high = SourceMap::from([("a".to_owned(), "1".to_owned())]);
/// let low = SourceMap::from([
///     ("a".to_owned(), "2".to_owned()),
///     ("b".to_owned(), "3".to_owned()),
/// ]);
/// let merged = merge_sources([high, low]).expect("non-empty");
/// assert_eq!(merged.get("a").map(String::as_str), Some("1"));
/// assert_eq!(merged.get("b").map(String::as_str), Some("3"));
/// ```
#[must_use]
pub fn merge_sources<I>(sources: I) -> Option<SourceMap>
where
    I: IntoIterator<Item = SourceMap>,
{
    let mut iter = sources.into_iter();
    let mut merged = iter.next()?;
    for source in iter {
        for (key, value) in source {
            merged.entry(key).or_insert(value);
        }
    }
    tracing::debug!(keys = merged.len(), "merged configuration sources");
    if merged.is_empty() { None } else { Some(merged) }
}

#[cfg(test)]
mod tests {
    //! Unit tests for source merging.

    use super::*;
    use rstest::rstest;

    fn map(pairs: &[(&str, &str)]) -> SourceMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[rstest]
    fn no_sources_is_no_configuration() {
        assert_eq!(merge_sources(Vec::new()), None);
    }

    #[rstest]
    fn all_empty_sources_is_no_configuration() {
        assert_eq!(merge_sources([SourceMap::new(), SourceMap::new()]), None);
    }

    #[rstest]
    fn single_source_is_unchanged() {
        let only = map(&[("a", "1"), ("blank", "")]);
        assert_eq!(merge_sources([only.clone()]), Some(only));
    }

    #[rstest]
    fn first_source_wins() {
        let merged = merge_sources([map(&[("a", "1")]), map(&[("a", "2")])]);
        assert_eq!(merged, Some(map(&[("a", "1")])));
    }

    #[rstest]
    fn blank_value_still_blocks_later_sources() {
        let merged = merge_sources([map(&[("a", "")]), map(&[("a", "2"), ("b", "3")])]);
        assert_eq!(merged, Some(map(&[("a", ""), ("b", "3")])));
    }

    #[rstest]
    fn empty_first_source_is_seeded_from_later_ones() {
        let merged = merge_sources([
            SourceMap::new(),
            map(&[("a", "2")]),
            map(&[("a", "3"), ("c", "4")]),
        ]);
        assert_eq!(merged, Some(map(&[("a", "2"), ("c", "4")])));
    }
}
