// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Search query composer.
//!
//! Deterministically maps a `SearchFilters` value to a query plan: one
//! predicate per present filter field, a single sort key, and a 1-based row
//! window. The composer is a pure function: it performs no I/O, and every
//! user-supplied value is carried as a bind parameter, never interpolated
//! into the SQL text.

use crate::models::search::{SearchFilters, SortDirection, SortField};
use crate::services::error::ApiError;

/// Canonical page size when the request does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// Upper bound on the requested page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Columns selected for listing rows, in `Property` field order.
pub const LISTING_COLUMNS: &str = "id, broker_id, agency_id, city, district, street, \
     house_number, heating_type, floor_number, num_rooms, area_m2, price, \
     purpose, type, description, images, status, created_at, updated_at";

/// Bind values for the composed query, applied in `$1..$n` order.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Float(f64),
    Int(i64),
}

/// A composed query plan: predicates, binds, sort, and row window.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    predicates: Vec<String>,
    binds: Vec<BindValue>,
    sort_field: SortField,
    sort_direction: SortDirection,
    pub page: i64,
    pub limit: i64,
}

impl QueryPlan {
    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }

    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    fn where_sql(&self) -> String {
        if self.predicates.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.predicates.join(" AND "))
        }
    }

    /// SQL counting every matching listing, ignoring pagination.
    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM properties{}", self.where_sql())
    }

    /// SQL fetching the requested page. `id` is appended as a tie-breaker so
    /// paging over equal sort keys stays deterministic.
    pub fn select_sql(&self) -> String {
        let dir = self.sort_direction.sql();
        format!(
            "SELECT {} FROM properties{} ORDER BY {} {}, id {} LIMIT {} OFFSET {}",
            LISTING_COLUMNS,
            self.where_sql(),
            self.sort_field.column(),
            dir,
            dir,
            self.limit,
            self.offset(),
        )
    }
}

/// `ceil(count / limit)`; zero when nothing matched.
pub fn total_pages(count: i64, limit: i64) -> i64 {
    if count <= 0 {
        0
    } else {
        (count + limit - 1) / limit
    }
}

fn push_text(binds: &mut Vec<BindValue>, value: String) -> usize {
    binds.push(BindValue::Text(value));
    binds.len()
}

fn push_float(binds: &mut Vec<BindValue>, value: f64) -> usize {
    binds.push(BindValue::Float(value));
    binds.len()
}

fn push_int(binds: &mut Vec<BindValue>, value: i64) -> usize {
    binds.push(BindValue::Int(value));
    binds.len()
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_float(field: &str, value: &str) -> Result<f64, ApiError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ApiError::Validation(format!("{field} must be a number (got '{value}')")))
}

fn parse_int(field: &str, value: &str) -> Result<i64, ApiError> {
    value
        .parse::<i64>()
        .map_err(|_| ApiError::Validation(format!("{field} must be an integer (got '{value}')")))
}

/// Normalize a raw keyword string into a tsquery expression: split on
/// whitespace, strip non-alphanumeric characters from each term, discard
/// terms that become empty, and AND-join the survivors. `None` when no term
/// survives; the caller must then emit no text predicate at all.
pub fn normalize_keywords(raw: &str) -> Option<String> {
    let terms: Vec<String> = raw
        .split_whitespace()
        .map(|t| t.chars().filter(|c| c.is_alphanumeric()).collect())
        .filter(|t: &String| !t.is_empty())
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" & "))
    }
}

/// Compose a query plan from a filter set.
///
/// Absent and empty-string fields impose no predicate; the empty filter set
/// matches every listing. Numeric fields that fail to parse, and sort fields
/// outside the allowed set, are validation errors.
pub fn compose(filters: &SearchFilters) -> Result<QueryPlan, ApiError> {
    let mut predicates = Vec::new();
    let mut binds = Vec::new();
    push_filter_predicates(filters, &mut predicates, &mut binds)?;

    let sort_field = match present(&filters.sort_by) {
        None => SortField::CreatedAt,
        Some(v) => SortField::parse(v).ok_or_else(|| {
            ApiError::Validation(format!(
                "sortBy must be one of created_at, price, area (got '{v}')"
            ))
        })?,
    };

    let sort_direction = match present(&filters.sort_order) {
        None => SortDirection::Desc,
        Some(v) => SortDirection::parse(v).ok_or_else(|| {
            ApiError::Validation(format!("sortOrder must be asc or desc (got '{v}')"))
        })?,
    };

    let page = match present(&filters.page) {
        None => 1,
        Some(v) => parse_int("page", v)?.max(1),
    };

    let limit = match present(&filters.limit) {
        None => DEFAULT_PAGE_SIZE,
        Some(v) => parse_int("limit", v)?.clamp(1, MAX_PAGE_SIZE),
    };

    Ok(QueryPlan {
        predicates,
        binds,
        sort_field,
        sort_direction,
        page,
        limit,
    })
}

/// One predicate per present filter field; the field-to-column mapping is
/// injective, with min/max pairs producing two clauses on the same column.
fn push_filter_predicates(
    filters: &SearchFilters,
    predicates: &mut Vec<String>,
    binds: &mut Vec<BindValue>,
) -> Result<(), ApiError> {
    if let Some(v) = present(&filters.property_type) {
        if crate::models::property::PropertyType::parse(v).is_none() {
            return Err(ApiError::Validation(format!(
                "propertyType must be one of apartment, house, commercial (got '{v}')"
            )));
        }
        let idx = push_text(binds, v.to_string());
        predicates.push(format!("type = ${idx}"));
    }

    if let Some(v) = present(&filters.purpose) {
        if crate::models::property::Purpose::parse(v).is_none() {
            return Err(ApiError::Validation(format!(
                "purpose must be sale or rent (got '{v}')"
            )));
        }
        let idx = push_text(binds, v.to_string());
        predicates.push(format!("purpose = ${idx}"));
    }

    if let Some(v) = present(&filters.city) {
        let idx = push_text(binds, format!("%{v}%"));
        predicates.push(format!("city ILIKE ${idx}"));
    }

    if let Some(v) = present(&filters.district) {
        let idx = push_text(binds, format!("%{v}%"));
        predicates.push(format!("district ILIKE ${idx}"));
    }

    if let Some(v) = present(&filters.min_price) {
        let idx = push_float(binds, parse_float("minPrice", v)?);
        predicates.push(format!("price >= ${idx}"));
    }

    if let Some(v) = present(&filters.max_price) {
        let idx = push_float(binds, parse_float("maxPrice", v)?);
        predicates.push(format!("price <= ${idx}"));
    }

    if let Some(v) = present(&filters.min_area) {
        let idx = push_float(binds, parse_float("minArea", v)?);
        predicates.push(format!("area_m2 >= ${idx}"));
    }

    if let Some(v) = present(&filters.max_area) {
        let idx = push_float(binds, parse_float("maxArea", v)?);
        predicates.push(format!("area_m2 <= ${idx}"));
    }

    if let Some(v) = present(&filters.rooms) {
        let idx = push_int(binds, parse_int("rooms", v)?);
        predicates.push(format!("num_rooms = ${idx}"));
    }

    if let Some(v) = present(&filters.floor) {
        let idx = push_int(binds, parse_int("floor", v)?);
        predicates.push(format!("floor_number = ${idx}"));
    }

    if let Some(v) = present(&filters.heating_type) {
        let idx = push_text(binds, v.to_string());
        predicates.push(format!("heating_type = ${idx}"));
    }

    if let Some(raw) = present(&filters.keywords) {
        if let Some(tsquery) = normalize_keywords(raw) {
            let idx = push_text(binds, tsquery);
            predicates.push(format!("fts @@ to_tsquery('simple', ${idx})"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(pairs: &[(&str, &str)]) -> SearchFilters {
        let mut f = SearchFilters::default();
        for (key, value) in pairs {
            let v = Some(value.to_string());
            match *key {
                "propertyType" => f.property_type = v,
                "purpose" => f.purpose = v,
                "city" => f.city = v,
                "district" => f.district = v,
                "minPrice" => f.min_price = v,
                "maxPrice" => f.max_price = v,
                "minArea" => f.min_area = v,
                "maxArea" => f.max_area = v,
                "rooms" => f.rooms = v,
                "floor" => f.floor = v,
                "heatingType" => f.heating_type = v,
                "keywords" => f.keywords = v,
                "sortBy" => f.sort_by = v,
                "sortOrder" => f.sort_order = v,
                "page" => f.page = v,
                "limit" => f.limit = v,
                other => panic!("unknown filter key {other}"),
            }
        }
        f
    }

    #[test]
    fn test_empty_filters_match_everything() {
        let plan = compose(&SearchFilters::default()).unwrap();
        assert_eq!(plan.predicate_count(), 0);
        assert!(plan.binds().is_empty());
        assert_eq!(plan.count_sql(), "SELECT COUNT(*) FROM properties");
        assert!(!plan.select_sql().contains("WHERE"));
    }

    #[test]
    fn test_defaults_created_at_desc_page_one() {
        let plan = compose(&SearchFilters::default()).unwrap();
        assert_eq!(plan.page, 1);
        assert_eq!(plan.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(plan.offset(), 0);
        assert!(plan
            .select_sql()
            .contains("ORDER BY created_at DESC, id DESC"));
    }

    #[test]
    fn test_each_present_field_emits_one_predicate() {
        let plan = compose(&filters(&[
            ("propertyType", "apartment"),
            ("purpose", "sale"),
            ("city", "Vilnius"),
            ("district", "Antakalnis"),
            ("minPrice", "100000"),
            ("maxPrice", "200000"),
            ("minArea", "40"),
            ("maxArea", "90"),
            ("rooms", "3"),
            ("floor", "2"),
            ("heatingType", "central"),
            ("keywords", "balcony renovated"),
        ]))
        .unwrap();

        // min/max pairs count as one predicate each on the same attribute.
        assert_eq!(plan.predicate_count(), 12);
        let sql = plan.select_sql();
        assert!(sql.contains("type = $1"));
        assert!(sql.contains("purpose = $2"));
        assert!(sql.contains("city ILIKE $3"));
        assert!(sql.contains("district ILIKE $4"));
        assert!(sql.contains("price >= $5"));
        assert!(sql.contains("price <= $6"));
        assert!(sql.contains("area_m2 >= $7"));
        assert!(sql.contains("area_m2 <= $8"));
        assert!(sql.contains("num_rooms = $9"));
        assert!(sql.contains("floor_number = $10"));
        assert!(sql.contains("heating_type = $11"));
        assert!(sql.contains("fts @@ to_tsquery('simple', $12)"));
        assert_eq!(plan.binds().len(), 12);
    }

    #[test]
    fn test_substring_filters_are_wrapped_in_wildcards() {
        let plan = compose(&filters(&[("city", "Vilnius")])).unwrap();
        assert_eq!(
            plan.binds(),
            &[BindValue::Text("%Vilnius%".to_string())]
        );
    }

    #[test]
    fn test_price_bounds_bind_as_floats() {
        let plan = compose(&filters(&[
            ("minPrice", "100000"),
            ("maxPrice", "200000.5"),
        ]))
        .unwrap();
        assert_eq!(
            plan.binds(),
            &[BindValue::Float(100000.0), BindValue::Float(200000.5)]
        );
    }

    #[test]
    fn test_empty_string_fields_impose_no_predicate() {
        let plan = compose(&filters(&[("city", ""), ("minPrice", "   ")])).unwrap();
        assert_eq!(plan.predicate_count(), 0);
    }

    #[test]
    fn test_whitespace_only_keywords_emit_no_text_predicate() {
        let plan = compose(&filters(&[("keywords", "   \t  ")])).unwrap();
        assert_eq!(plan.predicate_count(), 0);
        assert!(plan.binds().is_empty());
    }

    #[test]
    fn test_keywords_are_and_joined() {
        assert_eq!(
            normalize_keywords("balcony renovated"),
            Some("balcony & renovated".to_string())
        );
        assert_eq!(normalize_keywords("  single  "), Some("single".to_string()));
        assert_eq!(normalize_keywords("   "), None);
    }

    #[test]
    fn test_keyword_operator_characters_are_stripped() {
        // tsquery operators in user input must never reach Postgres.
        assert_eq!(
            normalize_keywords("b&b café!"),
            Some("bb & café".to_string())
        );
        assert_eq!(normalize_keywords("& | ! ( )"), None);
    }

    #[test]
    fn test_non_numeric_price_is_a_validation_error() {
        let err = compose(&filters(&[("minPrice", "cheap")])).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = compose(&filters(&[("minPrice", "NaN")])).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_non_integer_rooms_is_a_validation_error() {
        let err = compose(&filters(&[("rooms", "3.5")])).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_unknown_enum_values_are_validation_errors() {
        assert!(compose(&filters(&[("propertyType", "villa")])).is_err());
        assert!(compose(&filters(&[("purpose", "lease")])).is_err());
        assert!(compose(&filters(&[("sortBy", "broker_id")])).is_err());
        assert!(compose(&filters(&[("sortOrder", "sideways")])).is_err());
    }

    #[test]
    fn test_sort_resolution() {
        let plan = compose(&filters(&[("sortBy", "price"), ("sortOrder", "asc")])).unwrap();
        assert!(plan.select_sql().contains("ORDER BY price ASC, id ASC"));

        let plan = compose(&filters(&[("sortBy", "area_m2")])).unwrap();
        assert!(plan.select_sql().contains("ORDER BY area_m2 DESC"));
    }

    #[test]
    fn test_page_window_is_one_based() {
        let plan = compose(&filters(&[("page", "3"), ("limit", "9")])).unwrap();
        assert_eq!(plan.offset(), 18);
        assert!(plan.select_sql().ends_with("LIMIT 9 OFFSET 18"));
    }

    #[test]
    fn test_page_below_one_is_clamped() {
        assert_eq!(compose(&filters(&[("page", "0")])).unwrap().page, 1);
        assert_eq!(compose(&filters(&[("page", "-5")])).unwrap().page, 1);
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(compose(&filters(&[("limit", "0")])).unwrap().limit, 1);
        assert_eq!(
            compose(&filters(&[("limit", "5000")])).unwrap().limit,
            MAX_PAGE_SIZE
        );
    }

    #[test]
    fn test_user_values_never_appear_in_sql_text() {
        let plan = compose(&filters(&[("city", "x'; DROP TABLE properties;--")])).unwrap();
        let sql = plan.select_sql();
        assert!(!sql.contains("DROP TABLE"));
        assert_eq!(
            plan.binds(),
            &[BindValue::Text("%x'; DROP TABLE properties;--%".to_string())]
        );
    }

    #[test]
    fn test_total_pages_is_ceiling_division() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(12, 9), 2);
    }

    #[test]
    fn test_composition_is_deterministic() {
        let f = filters(&[
            ("propertyType", "apartment"),
            ("city", "Vilnius"),
            ("minPrice", "100000"),
            ("maxPrice", "200000"),
            ("sortBy", "price"),
            ("sortOrder", "asc"),
            ("page", "1"),
        ]);
        let a = compose(&f).unwrap();
        let b = compose(&f).unwrap();
        assert_eq!(a.select_sql(), b.select_sql());
        assert_eq!(a.count_sql(), b.count_sql());
        assert_eq!(a.binds(), b.binds());
    }
}
