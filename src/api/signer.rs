use crate::core::config::AnyPayConfig;
use crate::core::errors::AnyPayError;
use crate::core::kernel::signer::{md5_hex, sha256_hex, sha256_joined};
use crate::core::types::SignType;
use reqwest::Method;
use secrecy::{ExposeSecret, Secret};

/// Account credentials, immutable for the lifetime of a client
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_id: String,
    api_key: Secret<String>,
    secret_key: Secret<String>,
    pub project_id: i64,
}

impl Credentials {
    pub fn new(api_id: String, api_key: String, secret_key: String, project_id: i64) -> Self {
        Self {
            api_id,
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            project_id,
        }
    }

    pub fn from_config(config: &AnyPayConfig) -> Self {
        Self {
            api_id: config.api_id.clone(),
            api_key: config.api_key.clone(),
            secret_key: config.secret_key.clone(),
            project_id: config.project_id,
        }
    }
}

/// Remote API operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Balance,
    Rates,
    Commissions,
    CreatePayment,
    ListPayments,
    CreatePayout,
    ListPayouts,
    IpList,
}

impl Operation {
    pub const ALL: [Self; 8] = [
        Self::Balance,
        Self::Rates,
        Self::Commissions,
        Self::CreatePayment,
        Self::ListPayments,
        Self::CreatePayout,
        Self::ListPayouts,
        Self::IpList,
    ];

    /// Path segment of the operation, also the first signed value
    pub const fn method_name(self) -> &'static str {
        match self {
            Self::Balance => "balance",
            Self::Rates => "rates",
            Self::Commissions => "commissions",
            Self::CreatePayment => "create-payment",
            Self::ListPayments => "payments",
            Self::CreatePayout => "create-payout",
            Self::ListPayouts => "payouts",
            Self::IpList => "ip-notification",
        }
    }

    pub fn http_method(self) -> Method {
        Method::POST
    }

    /// Ordered inputs of the operation's signature.
    ///
    /// This order is fixed by the remote service and differs from the order
    /// fields are transmitted in. `ListPayouts` transmits `project_id` but does
    /// not sign it.
    pub const fn signature_fields(self) -> &'static [SignField] {
        use SignField::{
            Amount, ApiId, ApiKey, Currency, Desc, MethodName, PayId, PaymentMethod, PayoutId,
            PayoutType, ProjectId, Wallet,
        };

        match self {
            Self::Balance | Self::Rates | Self::IpList => &[MethodName, ApiId, ApiKey],
            Self::Commissions | Self::ListPayments => &[MethodName, ApiId, ProjectId, ApiKey],
            Self::CreatePayment => &[
                MethodName,
                ApiId,
                ProjectId,
                PayId,
                Amount,
                Currency,
                Desc,
                PaymentMethod,
                ApiKey,
            ],
            Self::CreatePayout => &[
                MethodName, ApiId, PayoutId, PayoutType, Amount, Wallet, ApiKey,
            ],
            Self::ListPayouts => &[MethodName, ApiId, ApiKey],
        }
    }
}

/// A value participating in a request signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignField {
    MethodName,
    ApiId,
    ApiKey,
    ProjectId,
    PayId,
    Amount,
    Currency,
    Desc,
    PaymentMethod,
    PayoutId,
    PayoutType,
    Wallet,
}

impl SignField {
    /// Name of the transmitted field carrying this value, if it is transmitted
    pub const fn field_name(self) -> Option<&'static str> {
        match self {
            Self::MethodName | Self::ApiId | Self::ApiKey => None,
            Self::ProjectId => Some("project_id"),
            Self::PayId => Some("pay_id"),
            Self::Amount => Some("amount"),
            Self::Currency => Some("currency"),
            Self::Desc => Some("desc"),
            Self::PaymentMethod => Some("method"),
            Self::PayoutId => Some("payout_id"),
            Self::PayoutType => Some("payout_type"),
            Self::Wallet => Some("wallet"),
        }
    }
}

/// Inputs of the merchant redirect signature, already stringified
#[derive(Debug, Clone, Copy)]
pub struct MerchantSignInput<'a> {
    pub pay_id: i64,
    pub amount: &'a str,
    pub currency: &'a str,
    pub desc: Option<&'a str>,
    pub success_url: Option<&'a str>,
    pub fail_url: Option<&'a str>,
}

/// Computes request and merchant redirect signatures
#[derive(Debug, Clone)]
pub struct AnyPaySigner {
    credentials: Credentials,
}

impl AnyPaySigner {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn api_id(&self) -> &str {
        &self.credentials.api_id
    }

    pub const fn project_id(&self) -> i64 {
        self.credentials.project_id
    }

    /// Ordered signature input of `operation`, resolved against the transmitted fields
    pub fn signature_input<'a>(
        &'a self,
        operation: Operation,
        fields: &'a [(String, String)],
    ) -> Result<Vec<&'a str>, AnyPayError> {
        operation
            .signature_fields()
            .iter()
            .map(|field| match field {
                SignField::MethodName => Ok(operation.method_name()),
                SignField::ApiId => Ok(self.credentials.api_id.as_str()),
                SignField::ApiKey => Ok(self.credentials.api_key.expose_secret().as_str()),
                other => {
                    let name = other.field_name().unwrap_or_default();
                    fields
                        .iter()
                        .find(|(key, _)| key == name)
                        .map(|(_, value)| value.as_str())
                        .ok_or_else(|| {
                            AnyPayError::validation(format!(
                                "{} requires field '{}' for its signature",
                                operation.method_name(),
                                name
                            ))
                        })
                }
            })
            .collect()
    }

    /// SHA-256 request signature: signature inputs concatenated without separator
    pub fn sign_operation(
        &self,
        operation: Operation,
        fields: &[(String, String)],
    ) -> Result<String, AnyPayError> {
        let input = self.signature_input(operation, fields)?;
        Ok(sha256_joined(&input, ""))
    }

    /// Signature of a merchant redirect URL.
    ///
    /// - MD5: `currency:amount:secret_key:project_id:pay_id`
    /// - SHA-256: `project_id:pay_id:amount:currency:desc:success_url:fail_url:secret_key`,
    ///   absent optional values are kept as empty slots
    pub fn sign_merchant_redirect(&self, sign_type: SignType, input: &MerchantSignInput<'_>) -> String {
        let secret = self.credentials.secret_key.expose_secret();
        let project_id = self.credentials.project_id;

        match sign_type {
            SignType::Md5 => md5_hex(&format!(
                "{}:{}:{}:{}:{}",
                input.currency, input.amount, secret, project_id, input.pay_id
            )),
            SignType::Sha256 => sha256_hex(&format!(
                "{}:{}:{}:{}:{}:{}:{}:{}",
                project_id,
                input.pay_id,
                input.amount,
                input.currency,
                input.desc.unwrap_or_default(),
                input.success_url.unwrap_or_default(),
                input.fail_url.unwrap_or_default(),
                secret
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> AnyPaySigner {
        AnyPaySigner::new(Credentials::new(
            "1234".to_string(),
            "apikey".to_string(),
            "secret".to_string(),
            77,
        ))
    }

    fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_parameterless_operations() {
        let signer = signer();
        assert_eq!(
            signer.sign_operation(Operation::Balance, &[]).unwrap(),
            sha256_hex("balance1234apikey")
        );
        assert_eq!(
            signer.sign_operation(Operation::Rates, &[]).unwrap(),
            sha256_hex("rates1234apikey")
        );
        assert_eq!(
            signer.sign_operation(Operation::IpList, &[]).unwrap(),
            sha256_hex("ip-notification1234apikey")
        );
    }

    #[test]
    fn test_project_scoped_operations() {
        let signer = signer();
        let project = fields(&[("project_id", "77")]);
        assert_eq!(
            signer.sign_operation(Operation::Commissions, &project).unwrap(),
            sha256_hex("commissions123477apikey")
        );
        assert_eq!(
            signer.sign_operation(Operation::ListPayments, &project).unwrap(),
            sha256_hex("payments123477apikey")
        );
    }

    #[test]
    fn test_list_payouts_ignores_project_id() {
        let signer = signer();
        let project = fields(&[("project_id", "77"), ("payout_id", "5")]);
        assert_eq!(
            signer.sign_operation(Operation::ListPayouts, &project).unwrap(),
            sha256_hex("payouts1234apikey")
        );
    }

    #[test]
    fn test_create_payment_fixture() {
        // Transmission order deliberately differs from signature order
        let transmitted = fields(&[
            ("project_id", "77"),
            ("pay_id", "1001"),
            ("amount", "100.50"),
            ("currency", "RUB"),
            ("desc", "Order 1001"),
            ("method", "qiwi"),
            ("email", "user@example.com"),
        ]);
        let sign = signer()
            .sign_operation(Operation::CreatePayment, &transmitted)
            .unwrap();

        assert_eq!(sign, sha256_hex("create-payment1234771001100.50RUBOrder 1001qiwiapikey"));
        assert_eq!(
            sign,
            "32e38d05bdaaef025bf9a19f75e282fed21852931be2529f3cb51c4b2a8cf836"
        );
    }

    #[test]
    fn test_create_payout_fixture() {
        let transmitted = fields(&[
            ("project_id", "77"),
            ("payout_id", "9"),
            ("payout_type", "card"),
            ("amount", "250.5"),
            ("wallet", "4111111111111111"),
        ]);
        assert_eq!(
            signer()
                .sign_operation(Operation::CreatePayout, &transmitted)
                .unwrap(),
            "4c9bf7c85a445f5657152511273d9661429094ed10d6842fb4b7b1c99cf7794c"
        );
    }

    #[test]
    fn test_missing_signed_field_is_rejected() {
        let err = signer()
            .sign_operation(Operation::CreatePayment, &fields(&[("project_id", "77")]))
            .unwrap_err();
        assert!(matches!(err, AnyPayError::Validation(ref msg) if msg.contains("pay_id")));
    }

    #[test]
    fn test_merchant_md5() {
        let input = MerchantSignInput {
            pay_id: 42,
            amount: "10.00",
            currency: "RUB",
            desc: Some("ignored by md5"),
            success_url: None,
            fail_url: None,
        };
        assert_eq!(
            signer().sign_merchant_redirect(SignType::Md5, &input),
            "0bee9c793f034120e1e699308360ee65"
        );
    }

    #[test]
    fn test_merchant_sha256_keeps_empty_slots() {
        let input = MerchantSignInput {
            pay_id: 42,
            amount: "10.00",
            currency: "USD",
            desc: None,
            success_url: Some("https://shop.example/ok"),
            fail_url: None,
        };
        assert_eq!(
            signer().sign_merchant_redirect(SignType::Sha256, &input),
            "86ee444eef6b5dbd0f987d9421d83cda414512bbfa0c5076360afd65cd59bd1c"
        );
    }

    #[test]
    fn test_every_operation_starts_with_method_name_and_ends_with_api_key() {
        for operation in Operation::ALL {
            let order = operation.signature_fields();
            assert_eq!(order.first(), Some(&SignField::MethodName));
            assert_eq!(order.get(1), Some(&SignField::ApiId));
            assert_eq!(order.last(), Some(&SignField::ApiKey));
        }
    }
}
