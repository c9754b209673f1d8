//! Filter predicates narrowing which content items appear in a feed.
//!
//! Filters are plain data (attribute + operator), persisted with the channel
//! and evaluated against an item's attribute values. All filters of a channel
//! must hold for an item to be included; an empty list includes everything.
//!
//! # Text form
//!
//! | Form              | Meaning                                   |
//! |-------------------|-------------------------------------------|
//! | `attr=value`      | equal                                     |
//! | `attr!=value`     | present and not equal                     |
//! | `attr~value`      | case-insensitive substring                |
//! | `attr:start..end` | inclusive range, either bound optional    |
//! | `attr?`           | present and non-empty                     |

use crate::content::ContentItem;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, str::FromStr, sync::LazyLock};

/// A single stored predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub attribute: String,
    pub op: FilterOp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Equals(String),
    NotEquals(String),
    Contains(String),
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<String>,
    },
    Exists,
}

impl Filter {
    pub fn new(attribute: impl Into<String>, op: FilterOp) -> Self {
        Self {
            attribute: attribute.into(),
            op,
        }
    }

    /// Evaluate against an item. A missing attribute never matches.
    pub fn matches(&self, item: &ContentItem) -> bool {
        let Some(value) = item.attribute(&self.attribute) else {
            return false;
        };

        match &self.op {
            FilterOp::Equals(expected) => value == expected,
            FilterOp::NotEquals(expected) => value != expected,
            FilterOp::Contains(needle) => value
                .to_lowercase()
                .contains(needle.to_lowercase().as_str()),
            FilterOp::Range { start, end } => {
                start
                    .as_deref()
                    .is_none_or(|s| compare_values(value, s) != Ordering::Less)
                    && end
                        .as_deref()
                        .is_none_or(|e| compare_values(value, e) != Ordering::Greater)
            }
            FilterOp::Exists => !value.trim().is_empty(),
        }
    }
}

/// Logical AND over every filter; empty always matches.
pub fn matches(filters: &[Filter], item: &ContentItem) -> bool {
    filters.iter().all(|filter| filter.matches(item))
}

/// Numeric comparison when both sides are finite numbers, lexicographic
/// otherwise.
///
/// Lexicographic order is also correct for ISO dates (`YYYY-MM-DD`).
fn compare_values(a: &str, b: &str) -> Ordering {
    match (finite_number(a), finite_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => a.cmp(b),
    }
}

/// `NaN` and `inf` parse as `f64` but have no place in a range.
fn finite_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attr = &self.attribute;
        match &self.op {
            FilterOp::Equals(v) => write!(f, "{attr}={v}"),
            FilterOp::NotEquals(v) => write!(f, "{attr}!={v}"),
            FilterOp::Contains(v) => write!(f, "{attr}~{v}"),
            FilterOp::Range { start, end } => write!(
                f,
                "{attr}:{}..{}",
                start.as_deref().unwrap_or_default(),
                end.as_deref().unwrap_or_default()
            ),
            FilterOp::Exists => write!(f, "{attr}?"),
        }
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static RE_FILTER: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^(?P<attr>[^=!~:?]+?)[ \t]*(?:(?P<op>!=|=|~|:)(?P<value>.*)|(?P<exists>\?))$")
                .unwrap()
        });

        let s = s.trim();
        let caps = RE_FILTER
            .captures(s)
            .ok_or_else(|| format!("invalid filter `{s}` (expected e.g. `Titolo~news`)"))?;
        let attribute = caps["attr"].trim().to_string();

        if caps.name("exists").is_some() {
            return Ok(Self::new(attribute, FilterOp::Exists));
        }

        let value = caps.name("value").map_or("", |m| m.as_str()).trim();
        let op = match caps.name("op").map(|m| m.as_str()) {
            Some("=") => FilterOp::Equals(value.to_string()),
            Some("!=") => FilterOp::NotEquals(value.to_string()),
            Some("~") => FilterOp::Contains(value.to_string()),
            Some(":") => {
                let (start, end) = value
                    .split_once("..")
                    .ok_or_else(|| format!("invalid range `{value}` (expected `start..end`)"))?;
                let bound = |b: &str| (!b.trim().is_empty()).then(|| b.trim().to_string());
                let (start, end) = (bound(start), bound(end));
                if start.is_none() && end.is_none() {
                    return Err(format!("range on `{attribute}` needs at least one bound"));
                }
                FilterOp::Range { start, end }
            }
            _ => return Err(format!("invalid filter `{s}`")),
        };

        Ok(Self::new(attribute, op))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(attrs: &[(&str, &str)]) -> ContentItem {
        let mut item = ContentItem::new("ART1", "ART");
        for (k, v) in attrs {
            item.attributes.insert(k.to_string(), v.to_string());
        }
        item
    }

    #[test]
    fn test_empty_filters_match_everything() {
        assert!(matches(&[], &item(&[])));
        assert!(matches(&[], &item(&[("Titolo", "x")])));
    }

    #[test]
    fn test_missing_attribute_never_matches() {
        let item = item(&[("Titolo", "hello")]);
        for filter in ["Autore=x", "Autore!=x", "Autore~x", "Autore:a..z", "Autore?"] {
            let filter: Filter = filter.parse().unwrap();
            assert!(!filter.matches(&item), "{filter} should not match");
        }
    }

    #[test]
    fn test_operators() {
        let item = item(&[("Titolo", "Rust News"), ("Prezzo", "15"), ("Data", "2024-03-01")]);

        assert!(Filter::new("Titolo", FilterOp::Equals("Rust News".into())).matches(&item));
        assert!(!Filter::new("Titolo", FilterOp::Equals("rust news".into())).matches(&item));
        assert!(Filter::new("Titolo", FilterOp::NotEquals("Other".into())).matches(&item));
        assert!(Filter::new("Titolo", FilterOp::Contains("NEWS".into())).matches(&item));
        assert!(Filter::new("Titolo", FilterOp::Exists).matches(&item));

        // numeric: "15" is between 2 and 100, although "15" < "2" as text
        let numeric: Filter = "Prezzo:2..100".parse().unwrap();
        assert!(numeric.matches(&item));

        let dates: Filter = "Data:2024-01-01..2024-06-30".parse().unwrap();
        assert!(dates.matches(&item));
        let open_end: Filter = "Data:2024-04-01..".parse().unwrap();
        assert!(!open_end.matches(&item));
    }

    #[test]
    fn test_range_ignores_non_finite_numbers() {
        let range: Filter = "Prezzo:1..10".parse().unwrap();
        for value in ["NaN", "nan", "inf", "-inf"] {
            let item = item(&[("Prezzo", value)]);
            assert!(!range.matches(&item), "{value} should not be in 1..10");
        }
        assert!(range.matches(&item(&[("Prezzo", "7.5")])));
    }

    #[test]
    fn test_all_filters_must_hold() {
        let item = item(&[("Titolo", "Rust News"), ("Categoria", "tech")]);
        let both = vec![
            "Titolo~rust".parse().unwrap(),
            "Categoria=tech".parse().unwrap(),
        ];
        assert!(matches(&both, &item));

        let one_fails = vec![
            "Titolo~rust".parse().unwrap(),
            "Categoria=sport".parse().unwrap(),
        ];
        assert!(!matches(&one_fails, &item));
    }

    #[test]
    fn test_exists_rejects_blank_value() {
        let item = item(&[("Titolo", "  ")]);
        assert!(!Filter::new("Titolo", FilterOp::Exists).matches(&item));
    }

    #[test]
    fn test_parse_and_display() {
        let cases = [
            ("Titolo=foo", "Titolo", FilterOp::Equals("foo".into())),
            ("Titolo!=foo", "Titolo", FilterOp::NotEquals("foo".into())),
            ("Titolo~foo bar", "Titolo", FilterOp::Contains("foo bar".into())),
            (
                "Data:..2024-12-31",
                "Data",
                FilterOp::Range {
                    start: None,
                    end: Some("2024-12-31".into()),
                },
            ),
            ("Titolo?", "Titolo", FilterOp::Exists),
        ];
        for (text, attribute, op) in cases {
            let filter: Filter = text.parse().unwrap();
            assert_eq!(filter.attribute, attribute);
            assert_eq!(filter.op, op, "parsing {text}");
            assert_eq!(filter.to_string(), text);
        }
    }

    #[test]
    fn test_parse_invalid() {
        assert!("".parse::<Filter>().is_err());
        assert!("=value".parse::<Filter>().is_err());
        assert!("Data:2024".parse::<Filter>().is_err());
        assert!("Data:..".parse::<Filter>().is_err());
    }

    #[test]
    fn test_serialized_form() {
        let filter: Filter = "Titolo~rust".parse().unwrap();
        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(json, r#"{"attribute":"Titolo","op":{"contains":"rust"}}"#);

        let exists: Filter =
            serde_json::from_str(r#"{"attribute":"Titolo","op":"exists"}"#).unwrap();
        assert_eq!(exists.op, FilterOp::Exists);
    }
}
