//! Display data for the floating comparison bar and the comparison page.

use rust_decimal::Decimal;
use serde::Serialize;
use stayhub_core::{Property, PropertyId};

/// Number of thumbnails the floating comparison bar shows.
pub const MAX_THUMBNAILS: usize = 3;

/// One thumbnail in the comparison bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    pub property_id: PropertyId,
    pub title: String,
    pub image_url: Option<String>,
}

/// Summary of the current comparison selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub count: usize,
    /// The first [`MAX_THUMBNAILS`] properties, in list order.
    pub thumbnails: Vec<Thumbnail>,
    /// Properties not shown as thumbnails ("+N more").
    pub overflow: usize,
    /// Lowest monthly price. First listing wins ties; `None` when currencies
    /// differ.
    pub cheapest: Option<PropertyId>,
    /// Highest rating among rated listings. First listing wins ties.
    pub best_rated: Option<PropertyId>,
    /// Mean monthly price; `None` when empty, when currencies differ, or when
    /// the total does not fit in a `Decimal`.
    pub average_price: Option<Decimal>,
}

impl ComparisonSummary {
    /// Build a summary from the selection in display order.
    #[must_use]
    pub fn from_properties(properties: &[Property]) -> Self {
        let thumbnails = properties
            .iter()
            .take(MAX_THUMBNAILS)
            .map(|p| Thumbnail {
                property_id: p.id,
                title: p.title.clone(),
                image_url: p.cover_image().map(str::to_string),
            })
            .collect();

        Self {
            count: properties.len(),
            thumbnails,
            overflow: properties.len().saturating_sub(MAX_THUMBNAILS),
            cheapest: cheapest(properties),
            best_rated: best_rated(properties),
            average_price: average_price(properties),
        }
    }

    /// Returns true when nothing is selected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Returns true when every listing is priced in the same currency.
fn single_currency(properties: &[Property]) -> bool {
    properties.first().is_none_or(|first| {
        properties
            .iter()
            .all(|p| p.price.currency_code == first.price.currency_code)
    })
}

fn cheapest(properties: &[Property]) -> Option<PropertyId> {
    if !single_currency(properties) {
        return None;
    }

    properties
        .iter()
        .fold(None::<&Property>, |best, p| match best {
            Some(b) if b.price.amount <= p.price.amount => Some(b),
            _ => Some(p),
        })
        .map(|p| p.id)
}

fn best_rated(properties: &[Property]) -> Option<PropertyId> {
    properties
        .iter()
        .filter_map(|p| p.rating.map(|rating| (p.id, rating)))
        .fold(None::<(PropertyId, Decimal)>, |best, (id, rating)| match best {
            Some((_, best_rating)) if best_rating >= rating => best,
            _ => Some((id, rating)),
        })
        .map(|(id, _)| id)
}

fn average_price(properties: &[Property]) -> Option<Decimal> {
    if properties.is_empty() || !single_currency(properties) {
        return None;
    }

    let total = properties
        .iter()
        .try_fold(Decimal::ZERO, |total, p| total.checked_add(p.price.amount))?;
    total.checked_div(Decimal::from(properties.len()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use stayhub_core::{CurrencyCode, Price};

    use super::*;

    fn listing(title: &str, amount: i64) -> Property {
        let mut property = Property::new(
            PropertyId::generate(),
            title,
            Price::new(Decimal::new(amount, 0), CurrencyCode::INR),
        );
        property.images = vec![format!("{title}.jpg")];
        property
    }

    #[test]
    fn test_empty_selection() {
        let summary = ComparisonSummary::from_properties(&[]);
        assert!(summary.is_empty());
        assert!(summary.thumbnails.is_empty());
        assert_eq!(summary.overflow, 0);
        assert_eq!(summary.cheapest, None);
        assert_eq!(summary.best_rated, None);
        assert_eq!(summary.average_price, None);
    }

    #[test]
    fn test_thumbnails_cap_and_overflow() {
        let properties: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|t| listing(t, 5000))
            .collect();

        let summary = ComparisonSummary::from_properties(&properties);
        assert_eq!(summary.count, 4);
        assert_eq!(summary.thumbnails.len(), MAX_THUMBNAILS);
        assert_eq!(summary.overflow, 1);
        assert_eq!(summary.thumbnails[0].title, "a");
        assert_eq!(summary.thumbnails[2].image_url.as_deref(), Some("c.jpg"));
    }

    #[test]
    fn test_no_overflow_under_three() {
        let properties = vec![listing("a", 5000), listing("b", 6000)];
        let summary = ComparisonSummary::from_properties(&properties);
        assert_eq!(summary.thumbnails.len(), 2);
        assert_eq!(summary.overflow, 0);
    }

    #[test]
    fn test_cheapest_prefers_first_on_tie() {
        let properties = vec![
            listing("a", 7000),
            listing("b", 4000),
            listing("c", 4000),
        ];
        let summary = ComparisonSummary::from_properties(&properties);
        assert_eq!(summary.cheapest, Some(properties[1].id));
    }

    #[test]
    fn test_best_rated_skips_unrated() {
        let mut properties = vec![listing("a", 5000), listing("b", 5000), listing("c", 5000)];
        properties[1].rating = Some(Decimal::new(42, 1));
        properties[2].rating = Some(Decimal::new(38, 1));

        let summary = ComparisonSummary::from_properties(&properties);
        assert_eq!(summary.best_rated, Some(properties[1].id));
    }

    #[test]
    fn test_average_price() {
        let properties = vec![listing("a", 5000), listing("b", 7000)];
        let summary = ComparisonSummary::from_properties(&properties);
        assert_eq!(summary.average_price, Some(Decimal::new(6000, 0)));
    }

    #[test]
    fn test_average_price_mixed_currency() {
        let mut properties = vec![listing("a", 5000), listing("b", 7000)];
        properties[1].price.currency_code = CurrencyCode::USD;

        let summary = ComparisonSummary::from_properties(&properties);
        assert_eq!(summary.average_price, None);
    }

    #[test]
    fn test_cheapest_mixed_currency() {
        let mut properties = vec![listing("a", 5000), listing("b", 70)];
        properties[1].price.currency_code = CurrencyCode::USD;

        let summary = ComparisonSummary::from_properties(&properties);
        assert_eq!(summary.cheapest, None);
    }

    #[test]
    fn test_average_price_overflow() {
        let mut properties = vec![listing("a", 0), listing("b", 0)];
        properties[0].price.amount = Decimal::MAX;
        properties[1].price.amount = Decimal::MAX;

        let summary = ComparisonSummary::from_properties(&properties);
        assert_eq!(summary.average_price, None);
        assert_eq!(summary.cheapest, Some(properties[0].id));
    }
}
