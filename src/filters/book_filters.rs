//! Typed snapshot of the book list filters

use super::{FilterKey, FilterValue, MemoryNavigator, Navigator, QueryFilterStore, SortOrder};
use serde::Serialize;

/// Every filter of the book list, with defaults filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookFilters {
    pub search: String,
    pub category_name: String,
    pub min_price: f64,
    pub max_price: f64,
    pub min_rating: f64,
    pub in_stock: bool,
    pub featured: bool,
    pub sort_by: String,
    pub sort_order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

impl Default for BookFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            category_name: String::new(),
            min_price: 0.0,
            max_price: 1000.0,
            min_rating: 0.0,
            in_stock: false,
            featured: false,
            sort_by: "createdAt".to_string(),
            sort_order: SortOrder::Desc,
            page: 1,
            limit: 12,
        }
    }
}

impl BookFilters {
    pub fn value_of(&self, key: FilterKey) -> FilterValue {
        match key {
            FilterKey::Search => FilterValue::Text(self.search.clone()),
            FilterKey::CategoryName => FilterValue::Text(self.category_name.clone()),
            FilterKey::MinPrice => FilterValue::Number(self.min_price),
            FilterKey::MaxPrice => FilterValue::Number(self.max_price),
            FilterKey::MinRating => FilterValue::Number(self.min_rating),
            FilterKey::InStock => FilterValue::Flag(self.in_stock),
            FilterKey::Featured => FilterValue::Flag(self.featured),
            FilterKey::SortBy => FilterValue::Text(self.sort_by.clone()),
            FilterKey::SortOrder => FilterValue::Order(self.sort_order),
            FilterKey::Page => FilterValue::Integer(self.page),
            FilterKey::Limit => FilterValue::Integer(self.limit),
        }
    }

    /// Assigns `value` to `key`. Returns `false` and leaves the field alone
    /// when the value has the wrong kind for the key.
    pub fn set(&mut self, key: FilterKey, value: FilterValue) -> bool {
        match (key, value) {
            (FilterKey::Search, FilterValue::Text(v)) => self.search = v,
            (FilterKey::CategoryName, FilterValue::Text(v)) => self.category_name = v,
            (FilterKey::MinPrice, FilterValue::Number(v)) => self.min_price = v,
            (FilterKey::MaxPrice, FilterValue::Number(v)) => self.max_price = v,
            (FilterKey::MinRating, FilterValue::Number(v)) => self.min_rating = v,
            (FilterKey::InStock, FilterValue::Flag(v)) => self.in_stock = v,
            (FilterKey::Featured, FilterValue::Flag(v)) => self.featured = v,
            (FilterKey::SortBy, FilterValue::Text(v)) => self.sort_by = v,
            (FilterKey::SortOrder, FilterValue::Order(v)) => self.sort_order = v,
            (FilterKey::Page, FilterValue::Integer(v)) => self.page = v,
            (FilterKey::Limit, FilterValue::Integer(v)) => self.limit = v,
            _ => return false,
        }
        true
    }

    /// Parameters for the remote list endpoint. Empty text filters are left
    /// out; everything else is sent explicitly.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        FilterKey::ALL
            .into_iter()
            .filter_map(|key| {
                self.value_of(key)
                    .to_query()
                    .map(|raw| (key.as_str(), raw))
            })
            .collect()
    }

    /// Query string holding only the values that differ from the defaults,
    /// in schema order.
    pub fn canonical_query(&self) -> String {
        let defaults = BookFilters::default();
        let mut store = QueryFilterStore::new(MemoryNavigator::new(""));
        store.batch(|tx| {
            for key in FilterKey::ALL {
                let value = self.value_of(key);
                if value != defaults.value_of(key) {
                    tx.set(key, value);
                }
            }
        });
        store.navigator().current_query()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_schema_defaults() {
        for key in FilterKey::ALL {
            assert_eq!(key.default_value(), BookFilters::default().value_of(key));
        }
    }

    #[test]
    fn query_pairs_skip_empty_text() {
        let pairs = BookFilters::default().to_query_pairs();
        let names: Vec<_> = pairs.iter().map(|(name, _)| *name).collect();

        assert!(!names.contains(&"search"));
        assert!(!names.contains(&"categoryName"));
        assert!(pairs.contains(&("page", "1".to_string())));
        assert!(pairs.contains(&("sortOrder", "desc".to_string())));
        assert!(pairs.contains(&("inStock", "false".to_string())));
    }

    #[test]
    fn canonical_query_drops_defaults() {
        let mut filters = BookFilters::default();
        assert_eq!(filters.canonical_query(), "");

        filters.search = "le guin".into();
        filters.page = 3;
        filters.sort_order = SortOrder::Desc;
        assert_eq!(filters.canonical_query(), "search=le+guin&page=3");
    }

    #[test]
    fn set_rejects_wrong_kind() {
        let mut filters = BookFilters::default();
        assert!(!filters.set(FilterKey::Page, FilterValue::Flag(true)));
        assert_eq!(filters.page, 1);
        assert!(filters.set(FilterKey::Page, FilterValue::Integer(9)));
        assert_eq!(filters.page, 9);
    }
}
