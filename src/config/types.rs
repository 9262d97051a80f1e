use crate::order::types::PaymentMethod;
use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_TOKEN: &str = "YOUR_TELEGRAM_BOT_TOKEN";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub storage: StorageConfig,
    pub payments: PaymentNumbers,
    pub flow: FlowConfig,
    pub keep_alive: KeepAliveConfig,
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig::default(),
            storage: StorageConfig::default(),
            payments: PaymentNumbers::default(),
            flow: FlowConfig::default(),
            keep_alive: KeepAliveConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    pub token: String,
    /// The single administrator identity notified of every completed order.
    pub admin_id: i64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: PLACEHOLDER_TOKEN.to_string(),
            admin_id: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub orders_json_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            orders_json_path: "data/orders.json".to_string(),
        }
    }
}

/// Deposit numbers shown to the user at the payment step.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentNumbers {
    pub bkash: String,
    pub nagad: String,
    pub rocket: String,
}

impl Default for PaymentNumbers {
    fn default() -> Self {
        Self {
            bkash: "01318645435".to_string(),
            nagad: "01855966005".to_string(),
            rocket: "01829261192".to_string(),
        }
    }
}

/// Knobs that drive the order flow. The historical deployments of this bot
/// differed only in these values, so one state machine serves them all.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlowConfig {
    /// Whether an item must be picked from the catalog before the contact
    /// questions start.
    pub catalog: bool,
    /// Required email suffix; `None` accepts any address.
    pub email_suffix: Option<String>,
    /// Exact number of ASCII digits required for phone numbers.
    pub phone_digits: usize,
    /// Payment methods offered and accepted.
    pub payment_methods: Vec<PaymentMethod>,
    /// When false, no payment method asks for a transaction id.
    pub require_transaction_id: bool,
    /// Sessions idle longer than this are dropped on the next input.
    pub idle_timeout_secs: u64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            catalog: true,
            email_suffix: Some("@gmail.com".to_string()),
            phone_digits: 11,
            payment_methods: vec![
                PaymentMethod::Bkash,
                PaymentMethod::Nagad,
                PaymentMethod::Rocket,
                PaymentMethod::CashOnDelivery,
            ],
            require_transaction_id: true,
            idle_timeout_secs: 1800,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeepAliveConfig {
    pub port: u16,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}
