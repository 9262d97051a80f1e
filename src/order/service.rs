//! src/order/service.rs
//!
//! The OrderService is the facade over the order domain: it owns the
//! catalog and the store, and gives the bot handlers a small API for the
//! two durable operations (append a completed order, fetch a user's
//! history).

use std::sync::Arc;

use crate::order::catalog::Catalog;
use crate::order::store::{OrderStore, StoreError};
use crate::order::types::OrderRecord;

pub struct OrderService {
    store: Arc<dyn OrderStore>,
    catalog: Catalog,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>, catalog: Catalog) -> Self {
        Self { store, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Appends the record to the store and returns its id.
    pub fn record_order(&self, record: &OrderRecord) -> Result<String, StoreError> {
        let id = self.store.append(record)?;
        log::info!(
            "Saved order {} for user {} ({})",
            id,
            record.user_id,
            record.order_type.label()
        );
        Ok(id)
    }

    /// All of a user's orders, oldest first. The store keeps insertion
    /// order; sorting by timestamp makes the rendering deterministic even
    /// for backends that do not.
    pub fn history(&self, user_id: u64) -> Result<Vec<OrderRecord>, StoreError> {
        let mut orders = self.store.orders_for_user(user_id)?;
        orders.sort_by_key(|o| o.timestamp);
        Ok(orders)
    }
}

/// Renders a user's order list for Telegram.
pub fn render_history(orders: &[OrderRecord]) -> String {
    if orders.is_empty() {
        return "❌ You have no previous orders.".to_string();
    }

    let mut history = String::from("🗂️ Your Orders:\n\n");
    for order in orders {
        history.push_str(&format!(
            "• Type: {}\n• Payment: {}\n• Payment Status: {}\n• Date: {}\n\n",
            order.order_type.label(),
            order.payment_method.label(),
            order.payment_status.label(),
            order.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        ));
    }
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::store::MemoryStore;
    use crate::order::types::{OrderType, PaymentMethod, PaymentStatus};
    use chrono::{Duration, Utc};

    fn record(user_id: u64, order_type: OrderType, age_mins: i64) -> OrderRecord {
        OrderRecord {
            user_id,
            name: "Rahim".to_string(),
            email: "rahim@gmail.com".to_string(),
            telegram: "01318645435".to_string(),
            whatsapp: "01318645435".to_string(),
            order_type,
            item_name: None,
            item_price: None,
            payment_method: PaymentMethod::Nagad,
            payment_status: PaymentStatus::Paid,
            transaction_id: "TX".to_string(),
            timestamp: Utc::now() - Duration::minutes(age_mins),
        }
    }

    #[test]
    fn empty_history_renders_the_no_orders_message() {
        assert_eq!(render_history(&[]), "❌ You have no previous orders.");
    }

    #[test]
    fn history_is_sorted_ascending_by_timestamp() {
        let service = OrderService::new(Arc::new(MemoryStore::new()), Catalog::default());
        // Inserted newest first; history must come back oldest first.
        service
            .record_order(&record(5, OrderType::App, 1))
            .unwrap();
        service
            .record_order(&record(5, OrderType::Website, 60))
            .unwrap();
        service
            .record_order(&record(5, OrderType::Promotion, 30))
            .unwrap();

        let orders = service.history(5).unwrap();
        assert_eq!(orders.len(), 3);
        assert_eq!(orders[0].order_type, OrderType::Website);
        assert_eq!(orders[1].order_type, OrderType::Promotion);
        assert_eq!(orders[2].order_type, OrderType::App);
    }

    #[test]
    fn rendered_history_lists_every_order_with_type_and_date() {
        let orders = vec![record(5, OrderType::App, 10), record(5, OrderType::Website, 5)];
        let text = render_history(&orders);
        assert!(text.starts_with("🗂️ Your Orders:"));
        assert!(text.contains("• Type: App Order"));
        assert!(text.contains("• Type: Website Order"));
        assert!(text.contains("• Payment Status: Paid"));
        assert_eq!(text.matches("• Date: ").count(), 2);
    }
}
