// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Search request/response types.
//!
//! `SearchFilters` is both the query-string shape of `GET /api/search` and the
//! JSON shape persisted inside a saved search. All filter fields are carried as
//! optional strings, matching the wire format: an absent field and an
//! empty-string field are equally "no filter", and numeric validation happens
//! in the query composer where a useful error can be produced.

use crate::models::property::Property;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Sortable listing attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    Price,
    Area,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::Price => "price",
            SortField::Area => "area",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created_at" => Some(SortField::CreatedAt),
            "price" => Some(SortField::Price),
            // The listing column is named area_m2; accept both spellings.
            "area" | "area_m2" => Some(SortField::Area),
            _ => None,
        }
    }

    /// Column the sort key orders by.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::Price => "price",
            SortField::Area => "area_m2",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A flat set of user-supplied filter/sort/page parameters.
///
/// Every field is optional; the composer applies defaults for sort and
/// pagination. `pruned()` produces the form stored in a saved search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rooms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heating_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

fn meaningful(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl SearchFilters {
    /// Snapshot form for persistence: empty-string fields become absent, and
    /// pagination state is never stored (applying a saved search always
    /// restarts at page 1).
    pub fn pruned(&self) -> SearchFilters {
        SearchFilters {
            property_type: meaningful(&self.property_type),
            purpose: meaningful(&self.purpose),
            city: meaningful(&self.city),
            district: meaningful(&self.district),
            min_price: meaningful(&self.min_price),
            max_price: meaningful(&self.max_price),
            min_area: meaningful(&self.min_area),
            max_area: meaningful(&self.max_area),
            rooms: meaningful(&self.rooms),
            floor: meaningful(&self.floor),
            heating_type: meaningful(&self.heating_type),
            keywords: meaningful(&self.keywords),
            sort_by: meaningful(&self.sort_by),
            sort_order: meaningful(&self.sort_order),
            page: None,
            limit: None,
        }
    }

    /// True when no filter field carries a value (sort/page excluded).
    pub fn has_no_predicates(&self) -> bool {
        let p = self.pruned();
        p.property_type.is_none()
            && p.purpose.is_none()
            && p.city.is_none()
            && p.district.is_none()
            && p.min_price.is_none()
            && p.max_price.is_none()
            && p.min_area.is_none()
            && p.max_area.is_none()
            && p.rooms.is_none()
            && p.floor.is_none()
            && p.heating_type.is_none()
            && p.keywords.is_none()
    }
}

/// One page of search results plus pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub properties: Vec<Property>,
    /// Total count of matching listings, irrespective of pagination.
    pub count: i64,
    pub page: i64,
    pub limit: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

/// Error body returned by every API endpoint on failure.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pruned_drops_empty_and_whitespace_fields() {
        let filters = SearchFilters {
            city: Some("Vilnius".to_string()),
            district: Some("".to_string()),
            min_price: Some("   ".to_string()),
            page: Some("3".to_string()),
            ..Default::default()
        };
        let pruned = filters.pruned();
        assert_eq!(pruned.city.as_deref(), Some("Vilnius"));
        assert_eq!(pruned.district, None);
        assert_eq!(pruned.min_price, None);
        assert_eq!(pruned.page, None, "pagination is never persisted");
    }

    #[test]
    fn test_pruned_is_a_fixed_point() {
        let filters = SearchFilters {
            property_type: Some("apartment".to_string()),
            city: Some("  Vilnius  ".to_string()),
            max_price: Some("".to_string()),
            sort_by: Some("price".to_string()),
            ..Default::default()
        };
        let once = filters.pruned();
        let twice = once.pruned();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_pruned_round_trips_through_json() {
        let filters = SearchFilters {
            property_type: Some("apartment".to_string()),
            min_price: Some("100000".to_string()),
            max_price: Some("200000".to_string()),
            sort_by: Some("price".to_string()),
            sort_order: Some("asc".to_string()),
            ..Default::default()
        };
        let pruned = filters.pruned();
        let json = serde_json::to_string(&pruned).unwrap();
        let restored: SearchFilters = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.pruned(), pruned);
    }

    #[test]
    fn test_empty_filters_have_no_predicates() {
        assert!(SearchFilters::default().has_no_predicates());

        let only_sort = SearchFilters {
            sort_by: Some("price".to_string()),
            page: Some("2".to_string()),
            ..Default::default()
        };
        assert!(only_sort.has_no_predicates());
    }

    #[test]
    fn test_serialized_snapshot_uses_camel_case_keys() {
        let filters = SearchFilters {
            property_type: Some("house".to_string()),
            heating_type: Some("gas".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(filters.pruned()).unwrap();
        assert_eq!(json["propertyType"], "house");
        assert_eq!(json["heatingType"], "gas");
        assert!(json.get("minPrice").is_none());
    }

    #[test]
    fn test_sort_field_aliases() {
        assert_eq!(SortField::parse("area"), Some(SortField::Area));
        assert_eq!(SortField::parse("area_m2"), Some(SortField::Area));
        assert_eq!(SortField::Area.column(), "area_m2");
        assert_eq!(SortField::parse("broker_id"), None);
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!(SortDirection::parse("asc"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("desc"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("ASC"), None);
    }
}
