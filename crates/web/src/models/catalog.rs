//! Catalog models: products and categories.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use omnimarket_core::{CategoryId, CurrencyCode, Price, ProductId};

/// A product category.
///
/// Categories come from a fixed seed list; the slug is the stable key used
/// in URLs and on products.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// A catalog product, seeded from the external product API.
///
/// Immutable after seeding except by an explicit reseed.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub currency: CurrencyCode,
    /// Thumbnail shown in listings.
    pub image_url: Option<String>,
    /// Full image gallery for the detail page.
    pub images: Vec<String>,
    pub category_slug: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// The product's price as a typed [`Price`].
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::new(self.price, self.currency)
    }

    /// Formatted price for templates, e.g. `199.96 zł`.
    #[must_use]
    pub fn price_display(&self) -> String {
        self.unit_price().display()
    }
}

/// Turn a category slug into its display name (`home-decoration` ->
/// `Home Decoration`), matching how the seed list is labelled.
#[must_use]
pub fn category_name_from_slug(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_category_name_from_slug() {
        assert_eq!(category_name_from_slug("smartphones"), "Smartphones");
        assert_eq!(category_name_from_slug("home-decoration"), "Home Decoration");
        assert_eq!(category_name_from_slug("womens-dresses"), "Womens Dresses");
    }

    #[test]
    fn test_price_display() {
        let product = Product {
            id: ProductId::new(1),
            name: "Test".to_owned(),
            description: String::new(),
            price: dec!(219.96),
            currency: CurrencyCode::PLN,
            image_url: None,
            images: Vec::new(),
            category_slug: "laptops".to_owned(),
            created_at: Utc::now(),
        };
        assert_eq!(product.price_display(), "219.96 zł");
    }
}
