//! Typed filtering and sorting for product listings.
//!
//! The list endpoint accepts a JSON filter document (e.g.
//! `{"name":"widget","available":"true"}`) and a sort expression
//! (`field` or `field,desc`). Both are parsed against a fixed allow-list
//! of product fields so arbitrary column names never reach the query
//! builder.

use serde_json::Value;
use std::str::FromStr;
use strum::{Display, EnumString};
use thiserror::Error;

/// Fields that may appear in filter documents and sort expressions.
///
/// Names follow the wire format of the product DTO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum ProductField {
    #[strum(serialize = "code")]
    Code,
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "priceEur")]
    PriceEur,
    #[strum(serialize = "available")]
    Available,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unknown filter field: {0}")]
    UnknownFilterField(String),

    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),

    #[error("Unknown sort direction: {0}")]
    UnknownSortDirection(String),

    #[error("malformed filter document")]
    Malformed,
}

/// A single substring match clause against one product field
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    pub field: ProductField,
    pub value: String,
}

/// Parsed filter document, clauses are combined with AND
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub clauses: Vec<FilterClause>,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Parse a JSON filter document into typed clauses.
    ///
    /// `{}` yields an empty filter. Values may be strings, numbers, or
    /// booleans; all are matched as substrings of the field's text form.
    pub fn parse(raw: &str) -> Result<Self, FilterError> {
        if raw.trim().is_empty() || raw == "{}" {
            return Ok(Self::default());
        }

        let document: Value = serde_json::from_str(raw).map_err(|_| FilterError::Malformed)?;
        let object = document.as_object().ok_or(FilterError::Malformed)?;

        let mut clauses = Vec::with_capacity(object.len());
        for (key, value) in object {
            let field = ProductField::from_str(key)
                .map_err(|_| FilterError::UnknownFilterField(key.clone()))?;

            let value = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return Err(FilterError::Malformed),
            };

            clauses.push(FilterClause { field, value });
        }

        Ok(Self { clauses })
    }
}

/// Parsed sort expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: ProductField,
    pub descending: bool,
}

impl SortSpec {
    /// Parse a sort expression of the form `field`, `field,asc`, or
    /// `field,desc`.
    pub fn parse(raw: &str) -> Result<Self, FilterError> {
        let mut parts = raw.splitn(2, ',');
        let field_part = parts.next().unwrap_or_default().trim();
        let direction_part = parts.next().map(str::trim);

        let field = ProductField::from_str(field_part)
            .map_err(|_| FilterError::UnknownSortField(field_part.to_string()))?;

        let descending = match direction_part {
            None => false,
            Some("asc") => false,
            Some("desc") => true,
            Some(other) => return Err(FilterError::UnknownSortDirection(other.to_string())),
        };

        Ok(Self { field, descending })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_parses_to_no_clauses() {
        assert!(ProductFilter::parse("{}").unwrap().is_empty());
        assert!(ProductFilter::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_filter_with_known_fields() {
        let filter = ProductFilter::parse(r#"{"name":"widget","available":"true"}"#).unwrap();
        assert_eq!(filter.clauses.len(), 2);
        assert!(filter.clauses.contains(&FilterClause {
            field: ProductField::Name,
            value: "widget".to_string(),
        }));
        assert!(filter.clauses.contains(&FilterClause {
            field: ProductField::Available,
            value: "true".to_string(),
        }));
    }

    #[test]
    fn test_filter_accepts_non_string_scalars() {
        let filter = ProductFilter::parse(r#"{"priceEur":19.99,"available":true}"#).unwrap();
        assert_eq!(filter.clauses.len(), 2);
        assert!(filter.clauses.iter().any(|c| c.value == "19.99"));
        assert!(filter.clauses.iter().any(|c| c.value == "true"));
    }

    #[test]
    fn test_filter_rejects_unknown_field() {
        let err = ProductFilter::parse(r#"{"color":"red"}"#).unwrap_err();
        assert_eq!(err, FilterError::UnknownFilterField("color".to_string()));
        assert_eq!(err.to_string(), "Unknown filter field: color");
    }

    #[test]
    fn test_filter_rejects_malformed_json() {
        assert_eq!(
            ProductFilter::parse("{not json").unwrap_err(),
            FilterError::Malformed
        );
        assert_eq!(
            ProductFilter::parse(r#"["name"]"#).unwrap_err(),
            FilterError::Malformed
        );
    }

    #[test]
    fn test_sort_defaults_to_ascending() {
        let sort = SortSpec::parse("name").unwrap();
        assert_eq!(sort.field, ProductField::Name);
        assert!(!sort.descending);
    }

    #[test]
    fn test_sort_with_direction() {
        let sort = SortSpec::parse("priceEur,desc").unwrap();
        assert_eq!(sort.field, ProductField::PriceEur);
        assert!(sort.descending);

        let sort = SortSpec::parse("code,asc").unwrap();
        assert_eq!(sort.field, ProductField::Code);
        assert!(!sort.descending);
    }

    #[test]
    fn test_sort_rejects_unknown_field() {
        let err = SortSpec::parse("color").unwrap_err();
        assert_eq!(err.to_string(), "Unknown sort field: color");
    }

    #[test]
    fn test_sort_rejects_unknown_direction() {
        let err = SortSpec::parse("name,sideways").unwrap_err();
        assert_eq!(err.to_string(), "Unknown sort direction: sideways");
    }
}
