//! Query Filter Store
//!
//! Reads typed filter values from the current query string and writes them
//! back with replace navigation. Every write, reset or batch results in at
//! most one navigation, and none at all when the query string is unchanged.

use super::{BookFilters, FilterKey, FilterValue, Navigator};
use tracing::debug;
use url::form_urlencoded;

/// Single reader and writer of filter parameters for one location.
#[derive(Debug, Clone)]
pub struct QueryFilterStore<N: Navigator> {
    navigator: N,
}

impl<N: Navigator> QueryFilterStore<N> {
    pub fn new(navigator: N) -> Self {
        Self { navigator }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Raw query value for `key`, if present.
    pub fn raw(&self, key: FilterKey) -> Option<String> {
        parse_pairs(&self.navigator.current_query())
            .into_iter()
            .find(|(name, _)| name == key.as_str())
            .map(|(_, value)| value)
    }

    /// Looks up `key` and applies `parse`; absent or unparsable values give
    /// `default`.
    pub fn read_with<T>(
        &self,
        key: FilterKey,
        default: T,
        parse: impl Fn(&str) -> Option<T>,
    ) -> T {
        self.raw(key)
            .and_then(|raw| parse(&raw))
            .unwrap_or(default)
    }

    /// Reads `key` through the canonical schema.
    pub fn read(&self, key: FilterKey) -> FilterValue {
        self.read_with(key, key.default_value(), |raw| key.parse(raw))
    }

    /// Typed snapshot of every filter.
    pub fn snapshot(&self) -> BookFilters {
        let mut filters = BookFilters::default();
        for key in FilterKey::ALL {
            filters.set(key, self.read(key));
        }
        filters
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Writes one value. Empty text and values the schema would not read back
    /// (NaN, a flag under `page`, ...) remove the key instead.
    pub fn write(&mut self, key: FilterKey, value: impl Into<FilterValue>) {
        let value = value.into();
        self.batch(|tx| tx.set(key, value));
    }

    /// Removes one key.
    pub fn remove(&mut self, key: FilterKey) {
        self.batch(|tx| tx.remove(key));
    }

    /// Removes all listed keys with a single navigation.
    pub fn reset(&mut self, keys: &[FilterKey]) {
        self.batch(|tx| {
            for key in keys {
                tx.remove(*key);
            }
        });
    }

    /// Changes a filter from a user gesture. Narrowing filters also send the
    /// view back to the first page, in the same navigation.
    pub fn apply_filter(&mut self, key: FilterKey, value: impl Into<FilterValue>) {
        let value = value.into();
        self.batch(|tx| {
            tx.set(key, value);
            if !key.is_pagination() {
                tx.remove(FilterKey::Page);
            }
        });
    }

    /// Runs several edits and commits them as one navigation.
    pub fn batch(&mut self, edits: impl FnOnce(&mut FilterBatch)) {
        let current = self.navigator.current_query();
        let mut tx = FilterBatch {
            pairs: parse_pairs(&current),
        };
        edits(&mut tx);

        let next = tx.finish();
        if next != current {
            debug!(from = %current, to = %next, "replacing filter query");
            self.navigator.replace_query(&next);
        }
    }
}

/// Pending edits to the query parameters, committed by
/// [`QueryFilterStore::batch`].
#[derive(Debug)]
pub struct FilterBatch {
    pairs: Vec<(String, String)>,
}

impl FilterBatch {
    /// Sets `key`, keeping its position when it already exists. Duplicate
    /// occurrences of the key are dropped.
    pub fn set(&mut self, key: FilterKey, value: impl Into<FilterValue>) {
        let rendered = value
            .into()
            .to_query()
            .filter(|raw| key.parse(raw).is_some());

        let Some(rendered) = rendered else {
            self.remove(key);
            return;
        };

        let name = key.as_str();
        match self.pairs.iter().position(|(n, _)| n == name) {
            Some(index) => {
                self.pairs[index].1 = rendered;
                let mut seen = 0;
                self.pairs.retain(|(n, _)| {
                    if n != name {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.pairs.push((name.to_string(), rendered)),
        }
    }

    pub fn remove(&mut self, key: FilterKey) {
        self.pairs.retain(|(name, _)| name != key.as_str());
    }

    fn finish(self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs)
            .finish()
    }
}

fn parse_pairs(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .into_owned()
        .collect()
}
