// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Listing (property) records and their enumerated attributes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Kind of property being listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    House,
    Commercial,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Commercial => "commercial",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "apartment" => Some(PropertyType::Apartment),
            "house" => Some(PropertyType::House),
            "commercial" => Some(PropertyType::Commercial),
            _ => None,
        }
    }
}

/// Whether a listing is offered for sale or for rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    Sale,
    Rent,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Sale => "sale",
            Purpose::Rent => "rent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sale" => Some(Purpose::Sale),
            "rent" => Some(Purpose::Rent),
            _ => None,
        }
    }
}

/// Lifecycle status of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    Active,
    Pending,
    Sold,
    Rented,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Active => "active",
            PropertyStatus::Pending => "pending",
            PropertyStatus::Sold => "sold",
            PropertyStatus::Rented => "rented",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(PropertyStatus::Active),
            "pending" => Some(PropertyStatus::Pending),
            "sold" => Some(PropertyStatus::Sold),
            "rented" => Some(PropertyStatus::Rented),
            _ => None,
        }
    }
}

/// A property listing as stored and as returned by the API.
///
/// The enumerated columns are carried as plain text; the request types below
/// validate values against the enums before anything reaches the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Property {
    pub id: Uuid,
    pub broker_id: Uuid,
    pub agency_id: Option<Uuid>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub heating_type: Option<String>,
    pub floor_number: Option<i32>,
    pub num_rooms: Option<i32>,
    pub area_m2: Option<f64>,
    pub price: Option<f64>,
    pub purpose: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub property_type: Option<String>,
    pub description: Option<String>,
    /// Object-storage keys of the listing images, in display order.
    pub images: Vec<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating or fully replacing a listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PropertyPayload {
    pub city: Option<String>,
    pub district: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub heating_type: Option<String>,
    pub floor_number: Option<i32>,
    pub num_rooms: Option<i32>,
    pub area_m2: Option<f64>,
    pub price: Option<f64>,
    pub purpose: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl PropertyPayload {
    /// Validate the enumerated fields; returns the offending description on
    /// failure so the handler can surface a field-level message.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(t) = self.property_type.as_deref() {
            if PropertyType::parse(t).is_none() {
                return Err(format!(
                    "type must be one of apartment, house, commercial (got '{t}')"
                ));
            }
        }
        if let Some(p) = self.purpose.as_deref() {
            if Purpose::parse(p).is_none() {
                return Err(format!("purpose must be sale or rent (got '{p}')"));
            }
        }
        if let Some(s) = self.status.as_deref() {
            if PropertyStatus::parse(s).is_none() {
                return Err(format!(
                    "status must be one of active, pending, sold, rented (got '{s}')"
                ));
            }
        }
        if let Some(price) = self.price {
            if price < 0.0 {
                return Err("price must not be negative".to_string());
            }
        }
        if let Some(area) = self.area_m2 {
            if area < 0.0 {
                return Err("area_m2 must not be negative".to_string());
            }
        }
        Ok(())
    }
}

/// Response for listing a broker's own properties.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PropertyListResponse {
    pub properties: Vec<Property>,
    pub count: usize,
}

/// Response after attaching an image to a listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImageUploadResponse {
    pub success: bool,
    pub key: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_type_roundtrip() {
        for t in [
            PropertyType::Apartment,
            PropertyType::House,
            PropertyType::Commercial,
        ] {
            assert_eq!(PropertyType::parse(t.as_str()), Some(t));
        }
        assert_eq!(PropertyType::parse("castle"), None);
    }

    #[test]
    fn test_purpose_roundtrip() {
        assert_eq!(Purpose::parse("sale"), Some(Purpose::Sale));
        assert_eq!(Purpose::parse("rent"), Some(Purpose::Rent));
        assert_eq!(Purpose::parse("lease"), None);
    }

    #[test]
    fn test_status_roundtrip() {
        for s in [
            PropertyStatus::Active,
            PropertyStatus::Pending,
            PropertyStatus::Sold,
            PropertyStatus::Rented,
        ] {
            assert_eq!(PropertyStatus::parse(s.as_str()), Some(s));
        }
    }

    #[test]
    fn test_payload_validation() {
        let ok = PropertyPayload {
            property_type: Some("apartment".to_string()),
            purpose: Some("sale".to_string()),
            price: Some(125000.0),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let bad_type = PropertyPayload {
            property_type: Some("villa".to_string()),
            ..Default::default()
        };
        assert!(bad_type.validate().is_err());

        let negative_price = PropertyPayload {
            price: Some(-1.0),
            ..Default::default()
        };
        assert!(negative_price.validate().is_err());
    }

    #[test]
    fn test_payload_type_field_uses_wire_name() {
        let json = r#"{"type": "house", "purpose": "rent"}"#;
        let payload: PropertyPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.property_type.as_deref(), Some("house"));
    }
}
