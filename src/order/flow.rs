//! The per-user conversation state machine.
//!
//! One linear sequence of data-collection steps drives every order
//! category; `FlowConfig` covers the points where deployments have
//! historically differed (catalog on/off, email domain restriction, phone
//! digit count, offered payment methods, transaction-id requirement).
//!
//! `apply` is a pure transition function over the session: it never talks to
//! Telegram or the store, which keeps every rule unit-testable.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::FlowConfig;
use crate::order::catalog::Catalog;
use crate::order::types::{CatalogItem, OrderType, PaymentMethod, PaymentStatus};

/// Recoverable input rejection. The `Display` text is sent to the user
/// verbatim; the session is left unchanged and the same step runs again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("❌ Invalid selection. Please choose an item from the keyboard.")]
    UnknownItem,
    #[error("❌ Invalid Email! Please provide a valid *{0}* email address.")]
    EmailSuffix(String),
    #[error("❌ Invalid Number! {field} Number must be exactly *{digits} digits*.")]
    PhoneDigits { field: &'static str, digits: usize },
    #[error("❌ Invalid Payment Method. Please select from the keyboard.")]
    UnknownPaymentMethod,
}

/// The steps, in the only order they can occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStep {
    SelectingItem,
    CollectingName,
    CollectingEmail,
    CollectingTelegram,
    CollectingWhatsapp,
    SelectingPaymentMethod,
    CollectingTransactionId,
}

/// One user's in-progress order. Lives only in process memory; a restart
/// drops every in-flight session.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    pub order_type: OrderType,
    pub step: OrderStep,
    pub item: Option<CatalogItem>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub telegram_number: Option<String>,
    pub whatsapp_number: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
    pub transaction_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationSession {
    pub fn new(order_type: OrderType, flow: &FlowConfig) -> Self {
        let step = if flow.catalog {
            OrderStep::SelectingItem
        } else {
            OrderStep::CollectingName
        };
        Self {
            order_type,
            step,
            item: None,
            name: None,
            email: None,
            telegram_number: None,
            whatsapp_number: None,
            payment_method: None,
            payment_status: None,
            transaction_id: None,
            updated_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, idle_timeout_secs: u64) -> bool {
        let idle = Utc::now().signed_duration_since(self.updated_at);
        idle.num_seconds() >= idle_timeout_secs as i64
    }
}

/// What the caller must do after feeding one input to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Input rejected; send the error, keep the step.
    Reprompt(ValidationError),
    /// Input accepted; `session.step` now names the next step to prompt for.
    Advance,
    /// The session is fully populated and ready to be saved.
    Complete,
}

/// Feeds one raw text input to the session's current step.
pub fn apply(
    session: &mut ConversationSession,
    text: &str,
    flow: &FlowConfig,
    catalog: &Catalog,
) -> StepOutcome {
    session.updated_at = Utc::now();
    match session.step {
        OrderStep::SelectingItem => match catalog.resolve(session.order_type, text) {
            Some(found) => {
                session.item = Some(found.clone());
                session.step = OrderStep::CollectingName;
                StepOutcome::Advance
            }
            None => StepOutcome::Reprompt(ValidationError::UnknownItem),
        },
        OrderStep::CollectingName => {
            session.name = Some(text.to_string());
            session.step = OrderStep::CollectingEmail;
            StepOutcome::Advance
        }
        OrderStep::CollectingEmail => match validate_email(text, flow) {
            Ok(()) => {
                session.email = Some(text.to_string());
                session.step = OrderStep::CollectingTelegram;
                StepOutcome::Advance
            }
            Err(e) => StepOutcome::Reprompt(e),
        },
        OrderStep::CollectingTelegram => match validate_phone(text, "Telegram", flow) {
            Ok(()) => {
                session.telegram_number = Some(text.to_string());
                session.step = OrderStep::CollectingWhatsapp;
                StepOutcome::Advance
            }
            Err(e) => StepOutcome::Reprompt(e),
        },
        OrderStep::CollectingWhatsapp => match validate_phone(text, "WhatsApp", flow) {
            Ok(()) => {
                session.whatsapp_number = Some(text.to_string());
                session.step = OrderStep::SelectingPaymentMethod;
                StepOutcome::Advance
            }
            Err(e) => StepOutcome::Reprompt(e),
        },
        OrderStep::SelectingPaymentMethod => match parse_payment_method(text, flow) {
            Some(method) => {
                session.payment_method = Some(method);
                if method == PaymentMethod::CashOnDelivery {
                    session.payment_status = Some(PaymentStatus::CashOnDelivery);
                    session.transaction_id = Some("N/A".to_string());
                    StepOutcome::Complete
                } else if !flow.require_transaction_id {
                    session.payment_status = Some(PaymentStatus::Paid);
                    session.transaction_id = Some("N/A".to_string());
                    StepOutcome::Complete
                } else {
                    session.payment_status = Some(PaymentStatus::Pending);
                    session.step = OrderStep::CollectingTransactionId;
                    StepOutcome::Advance
                }
            }
            None => StepOutcome::Reprompt(ValidationError::UnknownPaymentMethod),
        },
        OrderStep::CollectingTransactionId => {
            session.transaction_id = Some(text.to_string());
            session.payment_status = Some(PaymentStatus::Paid);
            StepOutcome::Complete
        }
    }
}

fn validate_email(text: &str, flow: &FlowConfig) -> Result<(), ValidationError> {
    match &flow.email_suffix {
        Some(suffix) if !text.ends_with(suffix.as_str()) => {
            Err(ValidationError::EmailSuffix(suffix.clone()))
        }
        _ => Ok(()),
    }
}

fn validate_phone(
    text: &str,
    field: &'static str,
    flow: &FlowConfig,
) -> Result<(), ValidationError> {
    if text.len() == flow.phone_digits && text.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::PhoneDigits {
            field,
            digits: flow.phone_digits,
        })
    }
}

fn parse_payment_method(text: &str, flow: &FlowConfig) -> Option<PaymentMethod> {
    PaymentMethod::from_label(text).filter(|m| flow.payment_methods.contains(m))
}
