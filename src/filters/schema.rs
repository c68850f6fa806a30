//! Filter schema
//!
//! One table of keys, value kinds and parsers shared by every filtered view,
//! so no two views can disagree about a key's type or default. Defaults live
//! in [`BookFilters::default`](super::BookFilters).

use super::BookFilters;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Highest possible rating.
const MAX_RATING: f64 = 5.0;

// =============================================================================
// Keys
// =============================================================================

/// Every query parameter understood by filtered list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Search,
    CategoryName,
    MinPrice,
    MaxPrice,
    MinRating,
    InStock,
    Featured,
    SortBy,
    SortOrder,
    Page,
    Limit,
}

impl FilterKey {
    pub const ALL: [FilterKey; 11] = [
        FilterKey::Search,
        FilterKey::CategoryName,
        FilterKey::MinPrice,
        FilterKey::MaxPrice,
        FilterKey::MinRating,
        FilterKey::InStock,
        FilterKey::Featured,
        FilterKey::SortBy,
        FilterKey::SortOrder,
        FilterKey::Page,
        FilterKey::Limit,
    ];

    /// Name of the query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Search => "search",
            FilterKey::CategoryName => "categoryName",
            FilterKey::MinPrice => "minPrice",
            FilterKey::MaxPrice => "maxPrice",
            FilterKey::MinRating => "minRating",
            FilterKey::InStock => "inStock",
            FilterKey::Featured => "featured",
            FilterKey::SortBy => "sortBy",
            FilterKey::SortOrder => "sortOrder",
            FilterKey::Page => "page",
            FilterKey::Limit => "limit",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }

    /// `page` and `limit` move through results; every other key narrows them.
    pub fn is_pagination(&self) -> bool {
        matches!(self, FilterKey::Page | FilterKey::Limit)
    }

    pub fn default_value(&self) -> FilterValue {
        BookFilters::default().value_of(*self)
    }

    /// Parses a raw query value. `None` means "use the default".
    pub fn parse(&self, raw: &str) -> Option<FilterValue> {
        match self {
            FilterKey::Search | FilterKey::CategoryName | FilterKey::SortBy => {
                parse_text(raw).map(FilterValue::Text)
            }
            FilterKey::MinPrice | FilterKey::MaxPrice => {
                parse_non_negative(raw).map(FilterValue::Number)
            }
            FilterKey::MinRating => parse_rating(raw).map(FilterValue::Number),
            FilterKey::InStock | FilterKey::Featured => parse_flag(raw).map(FilterValue::Flag),
            FilterKey::SortOrder => raw.parse().ok().map(FilterValue::Order),
            FilterKey::Page => parse_page(raw).map(FilterValue::Integer),
            FilterKey::Limit => parse_limit(raw).map(FilterValue::Integer),
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Values
// =============================================================================

/// Sort direction of a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(()),
        }
    }
}

/// A single filter value.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(f64),
    Integer(u32),
    Flag(bool),
    Order(SortOrder),
}

impl FilterValue {
    /// String form written to the query, or `None` when the key should be
    /// removed instead (empty text, non-finite numbers).
    pub fn to_query(&self) -> Option<String> {
        match self {
            FilterValue::Text(text) if text.is_empty() => None,
            FilterValue::Text(text) => Some(text.clone()),
            FilterValue::Number(n) if !n.is_finite() => None,
            FilterValue::Number(n) => Some(n.to_string()),
            FilterValue::Integer(n) => Some(n.to_string()),
            FilterValue::Flag(flag) => Some(flag.to_string()),
            FilterValue::Order(order) => Some(order.as_str().to_string()),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(text: &str) -> Self {
        FilterValue::Text(text.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(text: String) -> Self {
        FilterValue::Text(text)
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        FilterValue::Number(n)
    }
}

impl From<u32> for FilterValue {
    fn from(n: u32) -> Self {
        FilterValue::Integer(n)
    }
}

impl From<bool> for FilterValue {
    fn from(flag: bool) -> Self {
        FilterValue::Flag(flag)
    }
}

impl From<SortOrder> for FilterValue {
    fn from(order: SortOrder) -> Self {
        FilterValue::Order(order)
    }
}

// =============================================================================
// Parsers (pure and total)
// =============================================================================

pub fn parse_text(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Finite numbers only; `NaN` and infinities fall back to the default.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn parse_non_negative(raw: &str) -> Option<f64> {
    parse_number(raw).filter(|n| *n >= 0.0)
}

pub fn parse_rating(raw: &str) -> Option<f64> {
    parse_non_negative(raw).filter(|n| *n <= MAX_RATING)
}

/// Only the literal strings `true` and `false` are flags.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

pub fn parse_page(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|page| *page >= 1)
}

pub fn parse_limit(raw: &str) -> Option<u32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|limit| (1..=MAX_LIMIT).contains(limit))
}
