use crate::core::types::{
    wire_date, CommissionType, Currency, PaymentStatus, PaymentSystem, PayoutStatus,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Account balance in rubles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    #[serde(deserialize_with = "lenient::number")]
    pub balance: f64,
}

/// Current conversion rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    /// Rates applied when receiving payments
    #[serde(rename = "in")]
    pub incoming: HashMap<Currency, f64>,
    /// Rates applied to payouts
    #[serde(rename = "out")]
    pub outgoing: HashMap<Currency, f64>,
}

/// Commission percentage per payment system
pub type Commissions = HashMap<PaymentSystem, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    /// Recipient account the transfer must be made to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedPayment {
    pub transaction_id: i64,
    pub pay_id: i64,
    pub status: PaymentStatus,
    pub payment_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<PaymentData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub transaction_id: i64,
    pub pay_id: i64,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentSystem>,
    #[serde(deserialize_with = "lenient::number")]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    /// Amount credited to the merchant, in rubles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub desc: String,
    #[serde(with = "wire_date")]
    pub date: NaiveDateTime,
    #[serde(default, with = "wire_date::option", skip_serializing_if = "Option::is_none")]
    pub pay_date: Option<NaiveDateTime>,
}

/// One page of payments keyed by transaction id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentTransactions {
    #[serde(default)]
    pub total: i64,
    #[serde(default, deserialize_with = "lenient::map")]
    pub payments: BTreeMap<i64, Payment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub transaction_id: i64,
    pub payout_id: i64,
    pub payout_type: PaymentSystem,
    pub status: PayoutStatus,
    #[serde(deserialize_with = "lenient::number")]
    pub amount: f64,
    /// Sent by the service as `comission`
    #[serde(alias = "comission", deserialize_with = "lenient::number")]
    pub commission: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_type: Option<CommissionType>,
    #[serde(deserialize_with = "lenient::number")]
    pub rate: f64,
    pub wallet: String,
    /// Balance left for payouts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(with = "wire_date")]
    pub date: NaiveDateTime,
    #[serde(default, with = "wire_date::option", skip_serializing_if = "Option::is_none")]
    pub complete_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayoutTransactions {
    #[serde(default)]
    pub total: i64,
    #[serde(default, deserialize_with = "lenient::map")]
    pub payouts: BTreeMap<i64, Payout>,
}

/// Addresses the service sends notifications from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddresses {
    pub ip: Vec<String>,
}

/// Deserializers for values the service encodes inconsistently
mod lenient {
    use super::{BTreeMap, Deserialize, Deserializer};
    use serde::de::{DeserializeOwned, Error};
    use serde_json::Value;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    /// Numbers may arrive either as JSON numbers or as decimal strings
    pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(value) => Ok(value),
            NumberOrString::String(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|e| D::Error::custom(format!("invalid number '{}': {}", raw, e))),
        }
    }

    /// An empty page is sent as `[]` or `null` rather than `{}`
    pub fn map<'de, D, V>(deserializer: D) -> Result<BTreeMap<i64, V>, D::Error>
    where
        D: Deserializer<'de>,
        V: DeserializeOwned,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(BTreeMap::new()),
            Value::Array(items) if items.is_empty() => Ok(BTreeMap::new()),
            value @ Value::Object(_) => serde_json::from_value(value).map_err(D::Error::custom),
            _ => Err(D::Error::custom("expected an object keyed by transaction id")),
        }
    }
}
