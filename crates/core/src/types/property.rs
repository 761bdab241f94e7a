//! Property listing value object.
//!
//! Listings are owned by the upstream catalog and consumed read-only here.
//! Two `Property` values are the same listing when their ids match, which is
//! what [`Property::same_listing`] checks; the derived `PartialEq` compares
//! every field.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::PropertyId;
use super::price::Price;
use super::status::{GenderPreference, PropertyType};

/// A rentable listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub title: String,
    /// Image URLs, cover image first.
    #[serde(default)]
    pub images: Vec<String>,
    pub price: Price,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub gender_preference: GenderPreference,
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Average review rating (0-5), absent until the first review.
    #[serde(default)]
    pub rating: Option<Decimal>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

const fn default_available() -> bool {
    true
}

impl Property {
    /// Create a listing with only the required fields set.
    #[must_use]
    pub fn new(id: PropertyId, title: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            title: title.into(),
            images: Vec::new(),
            price,
            city: None,
            address: None,
            property_type: PropertyType::default(),
            gender_preference: GenderPreference::default(),
            amenities: Vec::new(),
            rating: None,
            review_count: 0,
            available: true,
            created_at: None,
        }
    }

    /// The cover image, if the listing has any images.
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Returns true when both values describe the same listing.
    #[must_use]
    pub fn same_listing(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::price::CurrencyCode;

    fn price(amount: i64) -> Price {
        Price::new(Decimal::new(amount, 0), CurrencyCode::INR)
    }

    #[test]
    fn test_deserialize_minimal_listing() {
        let json = r#"{
            "id": "6f1c2a4e-8a7b-4c1d-9e2f-3a4b5c6d7e8f",
            "title": "Sunrise PG",
            "price": {"amount": "7500"}
        }"#;

        let property: Property = serde_json::from_str(json).unwrap();
        assert_eq!(property.title, "Sunrise PG");
        assert!(property.available);
        assert!(property.images.is_empty());
        assert_eq!(property.property_type, PropertyType::Pg);
        assert_eq!(property.cover_image(), None);
    }

    #[test]
    fn test_cover_image_is_first() {
        let mut property = Property::new(PropertyId::generate(), "Hostel A", price(5000));
        property.images = vec!["a.jpg".to_string(), "b.jpg".to_string()];
        assert_eq!(property.cover_image(), Some("a.jpg"));
    }

    #[test]
    fn test_same_listing_ignores_other_fields() {
        let id = PropertyId::generate();
        let a = Property::new(id, "Old title", price(5000));
        let b = Property::new(id, "New title", price(6000));
        assert!(a.same_listing(&b));
        assert_ne!(a, b);
    }
}
