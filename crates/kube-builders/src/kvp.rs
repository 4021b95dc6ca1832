//! Helpers to accumulate key/value pairs, like labels, annotations or environment variables,
//! inside of builders.
//!
//! Builders keep their collections as `Option<BTreeMap<..>>`, so that an untouched collection is
//! left out of the materialized object entirely and a touched one is always emitted in key order.
use std::{collections::BTreeMap, fmt::Display};

/// Inserts `value` at `key`, creating the map on first use.
///
/// An existing entry with the same key is overwritten.
pub fn set_at_map<V>(target: &mut Option<BTreeMap<String, V>>, key: impl Into<String>, value: V) {
    target
        .get_or_insert_with(BTreeMap::new)
        .insert(key.into(), value);
}

/// Like [`set_at_map`], but stores the [`Display`] rendering of `value`.
///
/// This is what label, annotation and plain environment values go through, so callers can pass
/// numbers or booleans without converting them first.
pub fn set_display_at_map(
    target: &mut Option<BTreeMap<String, String>>,
    key: impl Into<String>,
    value: impl Display,
) {
    set_at_map(target, key, value.to_string());
}

/// Merges `entries` into `target`, creating the map if `entries` is non-empty.
pub fn extend_map<V>(
    target: &mut Option<BTreeMap<String, V>>,
    entries: impl IntoIterator<Item = (String, V)>,
) {
    let mut entries = entries.into_iter().peekable();
    if entries.peek().is_some() {
        target.get_or_insert_with(BTreeMap::new).extend(entries);
    }
}
