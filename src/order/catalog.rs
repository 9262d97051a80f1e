//! The static item catalog, one list per order category.

use crate::order::types::{CatalogItem, OrderType};

pub struct Catalog {
    apps: Vec<CatalogItem>,
    websites: Vec<CatalogItem>,
    promotions: Vec<CatalogItem>,
}

fn item(name: &str, price: u32, link: &str) -> CatalogItem {
    CatalogItem {
        name: name.to_string(),
        price,
        link: link.to_string(),
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            apps: vec![
                item("APP-1", 2500, "yourapplink.com"),
                item("APP-2", 3500, "yourapplink.com"),
                item("APP-3", 5000, "yourapplink.com"),
                item("APP-4", 7000, "yourapplink.com"),
            ],
            websites: vec![
                item("WEBSITE-1", 3500, "yourweblink.com"),
                item("WEBSITE-2", 4800, "yourweblink.com"),
                item("WEBSITE-3", 5900, "yourweblink.com"),
            ],
            promotions: vec![
                item("PROMOT-1", 700, "500 Customers"),
                item("PROMOT-2", 1300, "1000 Customers"),
                item("PROMOT-3", 1800, "1500 Customers"),
            ],
        }
    }
}

impl Catalog {
    pub fn items(&self, order_type: OrderType) -> &[CatalogItem] {
        match order_type {
            OrderType::App => &self.apps,
            OrderType::Website => &self.websites,
            OrderType::Promotion => &self.promotions,
        }
    }

    /// Resolves raw input to a catalog item. The input must exactly match an
    /// item's name or its price rendered as a decimal string; there is no
    /// fuzzy matching.
    pub fn resolve(&self, order_type: OrderType, input: &str) -> Option<&CatalogItem> {
        self.items(order_type)
            .iter()
            .find(|i| i.name == input || i.price.to_string() == input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_by_exact_name() {
        let catalog = Catalog::default();
        let found = catalog.resolve(OrderType::App, "APP-3").unwrap();
        assert_eq!(found.price, 5000);
    }

    #[test]
    fn resolves_by_price_string() {
        let catalog = Catalog::default();
        let found = catalog.resolve(OrderType::Website, "4800").unwrap();
        assert_eq!(found.name, "WEBSITE-2");
    }

    #[test]
    fn rejects_near_misses() {
        let catalog = Catalog::default();
        assert!(catalog.resolve(OrderType::App, "app-1").is_none());
        assert!(catalog.resolve(OrderType::App, "APP-1 ").is_none());
        assert!(catalog.resolve(OrderType::App, "WEBSITE-1").is_none());
        assert!(catalog.resolve(OrderType::Promotion, "9999").is_none());
    }
}
