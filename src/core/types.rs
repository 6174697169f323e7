use crate::core::errors::AnyPayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payment currency: ISO 4217 alpha codes and crypto tickers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
    RUB,
    UAH,
    BYN,
    KZT,
    USD,
    EUR,
    BTC,
    ETH,
    BCH,
    LTC,
    DASH,
    ZEC,
    DOGE,
    USDT,
}

impl Currency {
    pub const ALL: [Self; 14] = [
        Self::RUB,
        Self::UAH,
        Self::BYN,
        Self::KZT,
        Self::USD,
        Self::EUR,
        Self::BTC,
        Self::ETH,
        Self::BCH,
        Self::LTC,
        Self::DASH,
        Self::ZEC,
        Self::DOGE,
        Self::USDT,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RUB => "RUB",
            Self::UAH => "UAH",
            Self::BYN => "BYN",
            Self::KZT => "KZT",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::BTC => "BTC",
            Self::ETH => "ETH",
            Self::BCH => "BCH",
            Self::LTC => "LTC",
            Self::DASH => "DASH",
            Self::ZEC => "ZEC",
            Self::DOGE => "DOGE",
            Self::USDT => "USDT",
        }
    }
}

/// Payment and payout systems, keyed by their wire code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PaymentSystem {
    #[serde(rename = "qiwi")]
    Qiwi,
    #[serde(rename = "ym")]
    YooMoney,
    #[serde(rename = "wm")]
    WebMoney,
    /// No longer supported by the service
    #[serde(rename = "mp")]
    MobilePhone,
    #[serde(rename = "card")]
    Card,
    #[serde(rename = "advcash")]
    Advcash,
    #[serde(rename = "pm")]
    PerfectMoney,
    #[serde(rename = "applepay")]
    ApplePay,
    #[serde(rename = "googlepay")]
    GooglePay,
    #[serde(rename = "samsungpay")]
    SamsungPay,
    #[serde(rename = "sbp")]
    Sbp,
    #[serde(rename = "payeer")]
    Payeer,
    #[serde(rename = "btc")]
    Bitcoin,
    #[serde(rename = "eth")]
    Ethereum,
    #[serde(rename = "bch")]
    BitcoinCash,
    #[serde(rename = "ltc")]
    Litecoin,
    #[serde(rename = "dash")]
    Dash,
    #[serde(rename = "zec")]
    Zcash,
    #[serde(rename = "doge")]
    Dogecoin,
    #[serde(rename = "usdt")]
    Tether,
    #[serde(rename = "mts")]
    Mts,
    #[serde(rename = "beeline")]
    Beeline,
    #[serde(rename = "megafon")]
    Megafon,
    #[serde(rename = "tele2")]
    Tele2,
    /// No longer supported by the service
    #[serde(rename = "exmo")]
    Exmo,
    #[serde(rename = "term")]
    Terminal,
}

impl PaymentSystem {
    pub const ALL: [Self; 26] = [
        Self::Qiwi,
        Self::YooMoney,
        Self::WebMoney,
        Self::MobilePhone,
        Self::Card,
        Self::Advcash,
        Self::PerfectMoney,
        Self::ApplePay,
        Self::GooglePay,
        Self::SamsungPay,
        Self::Sbp,
        Self::Payeer,
        Self::Bitcoin,
        Self::Ethereum,
        Self::BitcoinCash,
        Self::Litecoin,
        Self::Dash,
        Self::Zcash,
        Self::Dogecoin,
        Self::Tether,
        Self::Mts,
        Self::Beeline,
        Self::Megafon,
        Self::Tele2,
        Self::Exmo,
        Self::Terminal,
    ];

    /// Wire code used both in transmitted fields and in signatures
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Qiwi => "qiwi",
            Self::YooMoney => "ym",
            Self::WebMoney => "wm",
            Self::MobilePhone => "mp",
            Self::Card => "card",
            Self::Advcash => "advcash",
            Self::PerfectMoney => "pm",
            Self::ApplePay => "applepay",
            Self::GooglePay => "googlepay",
            Self::SamsungPay => "samsungpay",
            Self::Sbp => "sbp",
            Self::Payeer => "payeer",
            Self::Bitcoin => "btc",
            Self::Ethereum => "eth",
            Self::BitcoinCash => "bch",
            Self::Litecoin => "ltc",
            Self::Dash => "dash",
            Self::Zcash => "zec",
            Self::Dogecoin => "doge",
            Self::Tether => "usdt",
            Self::Mts => "mts",
            Self::Beeline => "beeline",
            Self::Megafon => "megafon",
            Self::Tele2 => "tele2",
            Self::Exmo => "exmo",
            Self::Terminal => "term",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Waiting,
    Refund,
    Canceled,
    Expired,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    Paid,
    /// Sent to the payment system, not final yet
    InProcess,
    Canceled,
    Blocked,
}

/// Where a payout commission is charged from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionType {
    Payment,
    Balance,
}

impl CommissionType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Balance => "balance",
        }
    }
}

/// Hash used to sign merchant redirect URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignType {
    #[default]
    #[serde(rename = "md5")]
    Md5,
    #[serde(rename = "sha256")]
    Sha256,
}

impl SignType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
        }
    }
}

/// Representation of the transmitted field set on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    #[default]
    Form,
    Json,
}

macro_rules! wire_code_impls {
    ($($ty:ident),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

wire_code_impls!(Currency, PaymentSystem, CommissionType, SignType);

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown currency: {}", s))
    }
}

impl FromStr for PaymentSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Unknown payment system: {}", s))
    }
}

/// Selecting a sign type by name is where an unsupported selector gets rejected
impl FromStr for SignType {
    type Err = AnyPayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha256" => Ok(Self::Sha256),
            other => Err(AnyPayError::validation(format!(
                "Sign type {} is not supported",
                other
            ))),
        }
    }
}

/// Dates on the wire use `dd.MM.yyyy HH:mm:ss`
pub mod wire_date {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%d.%m.%Y %H:%M:%S";

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use super::FORMAT;
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(date: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match date {
                Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.is_empty() => NaiveDateTime::parse_from_str(&raw, FORMAT)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                _ => Ok(None),
            }
        }
    }
}
