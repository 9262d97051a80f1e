//! Shared order domain types.
//!
//! `OrderRecord` is serialized with the exact camelCase field names the
//! order documents have always used, so existing stores keep working.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::order::flow::ConversationSession;

/// Top-level order categories selectable from the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "App Order")]
    App,
    #[serde(rename = "Website Order")]
    Website,
    #[serde(rename = "Promotion Order")]
    Promotion,
}

impl OrderType {
    pub fn label(&self) -> &'static str {
        match self {
            OrderType::App => "App Order",
            OrderType::Website => "Website Order",
            OrderType::Promotion => "Promotion Order",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Bkash,
    Nagad,
    Rocket,
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
}

impl PaymentMethod {
    /// The quick-reply label, which is also the accepted raw input.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Bkash => "Bkash",
            PaymentMethod::Nagad => "Nagad",
            PaymentMethod::Rocket => "Rocket",
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
        }
    }

    pub fn from_label(label: &str) -> Option<PaymentMethod> {
        match label {
            "Bkash" => Some(PaymentMethod::Bkash),
            "Nagad" => Some(PaymentMethod::Nagad),
            "Rocket" => Some(PaymentMethod::Rocket),
            "Cash on Delivery" => Some(PaymentMethod::CashOnDelivery),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Paid,
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::CashOnDelivery => "Cash on Delivery",
        }
    }
}

/// One purchasable offering. For promotion plans `link` carries the audience
/// description instead of a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub price: u32,
    pub link: String,
}

/// The durable artifact written once per completed session. Append-only,
/// never updated or deleted by this bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub user_id: u64,
    pub name: String,
    pub email: String,
    pub telegram: String,
    pub whatsapp: String,
    pub order_type: OrderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_price: Option<u32>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub transaction_id: String,
    pub timestamp: DateTime<Utc>,
}

impl OrderRecord {
    /// Builds the record from a fully populated session. Returns `None` if
    /// any required field is missing, which completion should make
    /// impossible.
    pub fn from_session(user_id: u64, session: &ConversationSession) -> Option<OrderRecord> {
        Some(OrderRecord {
            user_id,
            name: session.name.clone()?,
            email: session.email.clone()?,
            telegram: session.telegram_number.clone()?,
            whatsapp: session.whatsapp_number.clone()?,
            order_type: session.order_type,
            item_name: session.item.as_ref().map(|i| i.name.clone()),
            item_price: session.item.as_ref().map(|i| i.price),
            payment_method: session.payment_method?,
            payment_status: session.payment_status?,
            transaction_id: session.transaction_id.clone()?,
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_method_labels_round_trip() {
        for method in [
            PaymentMethod::Bkash,
            PaymentMethod::Nagad,
            PaymentMethod::Rocket,
            PaymentMethod::CashOnDelivery,
        ] {
            assert_eq!(PaymentMethod::from_label(method.label()), Some(method));
        }
        assert_eq!(PaymentMethod::from_label("PayPal"), None);
    }

    #[test]
    fn order_record_serializes_with_document_field_names() {
        let record = OrderRecord {
            user_id: 42,
            name: "Rahim".to_string(),
            email: "rahim@gmail.com".to_string(),
            telegram: "01318645435".to_string(),
            whatsapp: "01318645435".to_string(),
            order_type: OrderType::App,
            item_name: Some("APP-1".to_string()),
            item_price: Some(2500),
            payment_method: PaymentMethod::Bkash,
            payment_status: PaymentStatus::Paid,
            transaction_id: "TX123".to_string(),
            timestamp: Utc::now(),
        };

        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(json["userId"], 42);
        assert_eq!(json["orderType"], "App Order");
        assert_eq!(json["paymentMethod"], "Bkash");
        assert_eq!(json["paymentStatus"], "Paid");
        assert_eq!(json["itemName"], "APP-1");
        assert_eq!(json["itemPrice"], 2500);
        assert_eq!(json["transactionId"], "TX123");
    }

    #[test]
    fn item_fields_are_omitted_when_absent() {
        let record = OrderRecord {
            user_id: 7,
            name: "Karim".to_string(),
            email: "karim@gmail.com".to_string(),
            telegram: "01855966005".to_string(),
            whatsapp: "01855966005".to_string(),
            order_type: OrderType::Promotion,
            item_name: None,
            item_price: None,
            payment_method: PaymentMethod::CashOnDelivery,
            payment_status: PaymentStatus::CashOnDelivery,
            transaction_id: "N/A".to_string(),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("itemName"));
        assert!(!json.contains("itemPrice"));

        let parsed: OrderRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.item_name, None);
        assert_eq!(parsed, record);
    }
}
