//! src/bot/ui.rs
//!
//! This module serves as a factory for the bot's Telegram UI: the fixed
//! message texts, the quick-reply labels offered at each step, and the
//! reply keyboards built from them. Keeping every label here ensures the
//! keyboards stay in lockstep with the inputs the flow validators accept.

use teloxide::types::{KeyboardButton, KeyboardMarkup};

use crate::config::{Config, FlowConfig, PaymentNumbers};
use crate::order::catalog::Catalog;
use crate::order::flow::OrderStep;
use crate::order::types::{OrderRecord, OrderType};

// --- Menu labels (also the accepted raw inputs) ---

pub const MENU_APP_ORDER: &str = "📱 App Order";
pub const MENU_WEBSITE_ORDER: &str = "🌐 Website Order";
pub const MENU_PROMOTE: &str = "🚀 Promote App/Website";
pub const MENU_ORDER_HISTORY: &str = "🗂️ Order History";
pub const LABEL_BACK: &str = "Back";
pub const LABEL_CANCEL: &str = "Cancel";

// --- Fixed texts ---

pub const WELCOME: &str =
    "✨ Welcome to Premium Tournament Service Bot! ✨\n\nPlease select an option:";
pub const ORDER_CANCELLED: &str = "❌ Your order has been cancelled.";
pub const ORDER_CONFIRMED: &str =
    "✅ Order Confirmed!\n\nWe have received your order. Please wait for admin confirmation.";
pub const ORDER_SAVE_FAILED: &str =
    "⚠️ Your order could not be saved. Please try again.";
pub const HISTORY_FAILED: &str =
    "⚠️ Could not load your order history. Please try again later.";
pub const SESSION_EXPIRED: &str = "⌛ Your session has expired. Please start again.";

// --- Keyboards ---

fn keyboard(rows: Vec<Vec<String>>) -> KeyboardMarkup {
    KeyboardMarkup::new(
        rows.into_iter()
            .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>()),
    )
    .resize_keyboard()
}

fn rows_of_two(labels: Vec<String>) -> Vec<Vec<String>> {
    labels.chunks(2).map(|c| c.to_vec()).collect()
}

fn escape_row() -> Vec<String> {
    vec![LABEL_BACK.to_string(), LABEL_CANCEL.to_string()]
}

pub fn main_menu_labels() -> Vec<Vec<String>> {
    vec![
        vec![MENU_APP_ORDER.to_string(), MENU_WEBSITE_ORDER.to_string()],
        vec![MENU_PROMOTE.to_string(), MENU_ORDER_HISTORY.to_string()],
    ]
}

pub fn main_menu_keyboard() -> KeyboardMarkup {
    keyboard(main_menu_labels())
}

/// The ordered quick-reply rows offered at a step. Every label returned here
/// must be accepted by the step's validator.
pub fn step_labels(
    step: OrderStep,
    order_type: OrderType,
    catalog: &Catalog,
    flow: &FlowConfig,
) -> Vec<Vec<String>> {
    let mut rows = match step {
        OrderStep::SelectingItem => rows_of_two(
            catalog
                .items(order_type)
                .iter()
                .map(|i| i.name.clone())
                .collect(),
        ),
        OrderStep::SelectingPaymentMethod => rows_of_two(
            flow.payment_methods
                .iter()
                .map(|m| m.label().to_string())
                .collect(),
        ),
        _ => Vec::new(),
    };
    rows.push(escape_row());
    rows
}

pub fn step_keyboard(
    step: OrderStep,
    order_type: OrderType,
    catalog: &Catalog,
    flow: &FlowConfig,
) -> KeyboardMarkup {
    keyboard(step_labels(step, order_type, catalog, flow))
}

// --- Prompts ---

/// The single prompt emitted on entry to a step.
pub fn step_prompt(step: OrderStep, order_type: OrderType, catalog: &Catalog, cfg: &Config) -> String {
    match step {
        OrderStep::SelectingItem => item_menu_text(order_type, catalog),
        OrderStep::CollectingName => "👤 Please enter your Name:".to_string(),
        OrderStep::CollectingEmail => match &cfg.flow.email_suffix {
            Some(suffix) => format!("📧 Please enter your Email ({} only):", suffix),
            None => "📧 Please enter your Email:".to_string(),
        },
        OrderStep::CollectingTelegram => "💬 Please enter your Telegram Number:".to_string(),
        OrderStep::CollectingWhatsapp => "📱 Please enter your WhatsApp Number:".to_string(),
        OrderStep::SelectingPaymentMethod => {
            "💵 Choose Payment Method:\n\n➡️ Click below to copy numbers:".to_string()
        }
        OrderStep::CollectingTransactionId => {
            "🧾 Please enter your Transaction ID after sending payment:".to_string()
        }
    }
}

fn item_menu_text(order_type: OrderType, catalog: &Catalog) -> String {
    let header = match order_type {
        OrderType::App => "📱 Choose your App:",
        OrderType::Website => "🌐 Choose your Website:",
        OrderType::Promotion => "🚀 Choose Promotion Plan:",
    };
    let mut text = format!("{}\n", header);
    for item in catalog.items(order_type) {
        text.push_str(&format!("\n- {}: {} - {}৳", item.name, item.link, item.price));
    }
    text
}

/// The helper message sent together with the payment prompt.
pub fn payment_numbers_text(numbers: &PaymentNumbers) -> String {
    format!(
        "📱 Payment Numbers:\n\nBkash: `{}`\nNagad: `{}`\nRocket: `{}`\n\n(Click and copy the number)",
        numbers.bkash, numbers.nagad, numbers.rocket
    )
}

/// The fixed-format summary delivered to the administrator for every
/// completed order.
pub fn admin_summary(record: &OrderRecord) -> String {
    let mut summary = format!(
        "📥 New Order Received!\n\n👤 Name: {}\n📧 Email: {}\n💬 Telegram: {}\n📱 WhatsApp: {}\n🛒 Order Type: {}",
        record.name, record.email, record.telegram, record.whatsapp, record.order_type.label()
    );
    if let (Some(name), Some(price)) = (&record.item_name, record.item_price) {
        summary.push_str(&format!("\n📦 Item: {} - {}৳", name, price));
    }
    summary.push_str(&format!(
        "\n💵 Payment Method: {}\n📋 Transaction ID: {}\n⚡ Payment Status: {}",
        record.payment_method.label(),
        record.transaction_id,
        record.payment_status.label()
    ));
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::flow::{self, ConversationSession, StepOutcome};
    use crate::order::types::{PaymentMethod, PaymentStatus};
    use chrono::Utc;

    #[test]
    fn every_offered_payment_label_passes_validation() {
        let catalog = Catalog::default();
        let flow_cfg = FlowConfig::default();
        let labels = step_labels(
            OrderStep::SelectingPaymentMethod,
            OrderType::App,
            &catalog,
            &flow_cfg,
        );

        for label in labels.iter().flatten() {
            if label == LABEL_BACK || label == LABEL_CANCEL {
                continue;
            }
            let mut session = ConversationSession::new(OrderType::App, &flow_cfg);
            session.step = OrderStep::SelectingPaymentMethod;
            let outcome = flow::apply(&mut session, label, &flow_cfg, &catalog);
            assert_ne!(
                outcome,
                StepOutcome::Reprompt(flow::ValidationError::UnknownPaymentMethod),
                "offered label {:?} was rejected",
                label
            );
        }
    }

    #[test]
    fn every_offered_item_label_passes_validation() {
        let catalog = Catalog::default();
        let flow_cfg = FlowConfig::default();
        for order_type in [OrderType::App, OrderType::Website, OrderType::Promotion] {
            let labels = step_labels(OrderStep::SelectingItem, order_type, &catalog, &flow_cfg);
            for label in labels.iter().flatten() {
                if label == LABEL_BACK || label == LABEL_CANCEL {
                    continue;
                }
                let mut session = ConversationSession::new(order_type, &flow_cfg);
                let outcome = flow::apply(&mut session, label, &flow_cfg, &catalog);
                assert_eq!(outcome, StepOutcome::Advance, "offered item {:?}", label);
            }
        }
    }

    #[test]
    fn collecting_steps_offer_only_the_escape_row() {
        let catalog = Catalog::default();
        let flow_cfg = FlowConfig::default();
        for step in [
            OrderStep::CollectingName,
            OrderStep::CollectingEmail,
            OrderStep::CollectingTelegram,
            OrderStep::CollectingWhatsapp,
            OrderStep::CollectingTransactionId,
        ] {
            let labels = step_labels(step, OrderType::App, &catalog, &flow_cfg);
            assert_eq!(labels, vec![vec!["Back".to_string(), "Cancel".to_string()]]);
        }
    }

    #[test]
    fn payment_rows_follow_the_configured_method_list() {
        let catalog = Catalog::default();
        let flow_cfg = FlowConfig {
            payment_methods: vec![PaymentMethod::Bkash, PaymentMethod::CashOnDelivery],
            ..FlowConfig::default()
        };
        let labels = step_labels(
            OrderStep::SelectingPaymentMethod,
            OrderType::App,
            &catalog,
            &flow_cfg,
        );
        assert_eq!(
            labels,
            vec![
                vec!["Bkash".to_string(), "Cash on Delivery".to_string()],
                vec!["Back".to_string(), "Cancel".to_string()],
            ]
        );
    }

    #[test]
    fn item_menu_lists_every_item_with_price() {
        let catalog = Catalog::default();
        let text = item_menu_text(OrderType::App, &catalog);
        assert!(text.starts_with("📱 Choose your App:"));
        for name in ["APP-1", "APP-2", "APP-3", "APP-4"] {
            assert!(text.contains(name));
        }
        assert!(text.contains("2500৳"));
    }

    #[test]
    fn admin_summary_includes_the_item_line_only_for_catalog_orders() {
        let base = OrderRecord {
            user_id: 1,
            name: "Rahim".to_string(),
            email: "rahim@gmail.com".to_string(),
            telegram: "01318645435".to_string(),
            whatsapp: "01318645435".to_string(),
            order_type: OrderType::App,
            item_name: Some("APP-1".to_string()),
            item_price: Some(2500),
            payment_method: PaymentMethod::Bkash,
            payment_status: PaymentStatus::Paid,
            transaction_id: "TX1".to_string(),
            timestamp: Utc::now(),
        };
        let with_item = admin_summary(&base);
        assert!(with_item.contains("📦 Item: APP-1 - 2500৳"));
        assert!(with_item.contains("⚡ Payment Status: Paid"));

        let without_item = admin_summary(&OrderRecord {
            item_name: None,
            item_price: None,
            ..base
        });
        assert!(!without_item.contains("📦 Item:"));
    }
}
