use crate::api::signer::{AnyPaySigner, Operation};
use crate::core::errors::{AnyPayError, TransportError};
use crate::core::kernel::HttpRequest;
use crate::core::types::{BodyEncoding, CommissionType, Currency, PaymentSystem};
use reqwest::Method;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Value};

/// Largest order number accepted by the service (15 digits)
pub const MAX_PAY_ID: i64 = 99_999_999_999_999;

/// Name of the signature field, always transmitted last
pub const SIGN_FIELD: &str = "sign";

fn round_fixed(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Amount with exactly two decimals and a `.` separator, e.g. `100.50`
pub fn format_amount_fixed(amount: Decimal) -> String {
    format!("{:.2}", round_fixed(amount))
}

/// Shortest decimal form of an amount, e.g. `100.5` or `100`
pub fn format_amount_plain(amount: Decimal) -> String {
    amount.normalize().to_string()
}

pub(crate) fn validate_amount(amount: Decimal) -> Result<(), AnyPayError> {
    if amount <= Decimal::ZERO {
        return Err(AnyPayError::validation(format!(
            "amount must be greater than zero, got {}",
            amount
        )));
    }
    Ok(())
}

/// Positivity of the amount as it is sent, i.e. after rounding to two decimals
pub(crate) fn validate_fixed_amount(amount: Decimal) -> Result<(), AnyPayError> {
    validate_amount(amount)?;
    if round_fixed(amount) <= Decimal::ZERO {
        return Err(AnyPayError::validation(format!(
            "amount must be at least 0.01 after rounding to two decimals, got {}",
            amount
        )));
    }
    Ok(())
}

/// Blank optional values count as absent
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn validate_id(name: &str, value: i64, enforce_bound: bool) -> Result<(), AnyPayError> {
    if value <= 0 {
        return Err(AnyPayError::validation(format!(
            "{} must be a positive integer, got {}",
            name, value
        )));
    }
    if enforce_bound && value > MAX_PAY_ID {
        return Err(AnyPayError::validation(format!(
            "{} must not exceed {}, got {}",
            name, MAX_PAY_ID, value
        )));
    }
    Ok(())
}

pub(crate) fn require(name: &str, value: &str) -> Result<(), AnyPayError> {
    if value.trim().is_empty() {
        return Err(AnyPayError::validation(format!("{} is required", name)));
    }
    Ok(())
}

/// Ordered field set with the "omit when absent" and "first write wins" rules
#[derive(Debug, Default, Clone)]
pub(crate) struct FieldSet {
    fields: Vec<(String, String)>,
}

impl FieldSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    pub(crate) fn push(&mut self, key: &str, value: impl ToString) -> &mut Self {
        if !self.contains(key) {
            self.fields.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Absent and blank values are left out entirely
    pub(crate) fn push_opt<V: ToString>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.trim().is_empty() {
                self.push(key, value);
            }
        }
        self
    }

    /// Free-form pairs; keys already present are silently dropped
    pub(crate) fn merge<'a, I>(&mut self, extra: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a (String, String)>,
    {
        for (key, value) in extra {
            self.push(key, value);
        }
        self
    }

    pub(crate) fn into_inner(self) -> Vec<(String, String)> {
        self.fields
    }
}

/// Parameters of `create-payment`
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePaymentParams {
    /// Order number in the merchant system
    pub pay_id: i64,
    pub amount: Decimal,
    pub currency: Currency,
    /// Short description, up to 150 characters
    pub desc: String,
    pub email: String,
    pub method: PaymentSystem,
    pub method_currency: Option<Currency>,
    pub phone: Option<u64>,
    /// Last 4 digits of the card number for card payments
    pub tail: Option<String>,
    pub success_url: Option<String>,
    pub fail_url: Option<String>,
    pub lang: Option<String>,
    pub extra: Vec<(String, String)>,
}

impl CreatePaymentParams {
    pub fn new(
        pay_id: i64,
        amount: Decimal,
        currency: Currency,
        desc: impl Into<String>,
        email: impl Into<String>,
        method: PaymentSystem,
    ) -> Self {
        Self {
            pay_id,
            amount,
            currency,
            desc: desc.into(),
            email: email.into(),
            method,
            method_currency: None,
            phone: None,
            tail: None,
            success_url: None,
            fail_url: None,
            lang: None,
            extra: Vec::new(),
        }
    }

    pub fn with_method_currency(mut self, currency: Currency) -> Self {
        self.method_currency = Some(currency);
        self
    }

    pub fn with_phone(mut self, phone: u64) -> Self {
        self.phone = Some(phone);
        self
    }

    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = Some(tail.into());
        self
    }

    pub fn with_success_url(mut self, url: impl Into<String>) -> Self {
        self.success_url = Some(url.into());
        self
    }

    pub fn with_fail_url(mut self, url: impl Into<String>) -> Self {
        self.fail_url = Some(url.into());
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }
}

/// Filters of `payments`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPaymentsParams {
    /// Payment number assigned by the service
    pub trans_id: Option<i64>,
    pub pay_id: Option<i64>,
    /// Offset of the page; the service returns up to 1000 transactions per page
    pub offset: Option<u32>,
}

/// Parameters of `create-payout`
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePayoutParams {
    /// Unique payout number in the merchant system
    pub payout_id: i64,
    pub payout_type: PaymentSystem,
    pub amount: Decimal,
    /// Recipient wallet, without spaces or separators
    pub wallet: String,
    pub wallet_currency: Option<Currency>,
    pub commission_type: Option<CommissionType>,
    /// Receives a GET request once the payout reaches a final status
    pub status_url: Option<String>,
}

impl CreatePayoutParams {
    pub fn new(
        payout_id: i64,
        payout_type: PaymentSystem,
        amount: Decimal,
        wallet: impl Into<String>,
    ) -> Self {
        Self {
            payout_id,
            payout_type,
            amount,
            wallet: wallet.into(),
            wallet_currency: None,
            commission_type: None,
            status_url: None,
        }
    }

    pub fn with_wallet_currency(mut self, currency: Currency) -> Self {
        self.wallet_currency = Some(currency);
        self
    }

    pub fn with_commission_type(mut self, commission_type: CommissionType) -> Self {
        self.commission_type = Some(commission_type);
        self
    }

    pub fn with_status_url(mut self, url: impl Into<String>) -> Self {
        self.status_url = Some(url.into());
        self
    }
}

/// Filters of `payouts`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPayoutsParams {
    pub trans_id: Option<i64>,
    pub payout_id: Option<i64>,
    pub offset: Option<u32>,
}

/// A fully assembled, signed request for one API operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    operation: Operation,
    fields: Vec<(String, String)>,
    signature: String,
}

impl OperationRequest {
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    pub const fn method_name(&self) -> &'static str {
        self.operation.method_name()
    }

    pub fn http_method(&self) -> Method {
        self.operation.http_method()
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Transmitted fields in order, `sign` included as the last one
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Transmitted fields without the trailing signature
    pub fn unsigned_fields(&self) -> &[(String, String)] {
        match self.fields.split_last() {
            Some(((key, _), rest)) if key == SIGN_FIELD => rest,
            _ => &self.fields,
        }
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `<api_url>/<method_name>/<api_id>`
    pub fn url(&self, api_url: &str, api_id: &str) -> String {
        format!(
            "{}/{}/{}",
            api_url.trim_end_matches('/'),
            self.method_name(),
            api_id
        )
    }

    /// JSON object of the transmitted fields, values kept as their wire strings
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Value::Object(map)
    }

    pub fn to_http_request(
        &self,
        api_url: &str,
        api_id: &str,
        encoding: BodyEncoding,
    ) -> Result<HttpRequest, TransportError> {
        let url = self.url(api_url, api_id);
        let mut request = match encoding {
            BodyEncoding::Form => HttpRequest::post_form(url, self.fields.clone())?,
            BodyEncoding::Json => HttpRequest::post_json(url, &self.to_json())?,
        };
        request.method = self.http_method();
        Ok(request)
    }
}

/// Validates operation parameters and assembles signed requests
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    signer: AnyPaySigner,
    enforce_pay_id_bound: bool,
}

impl RequestBuilder {
    pub fn new(signer: AnyPaySigner) -> Self {
        Self {
            signer,
            enforce_pay_id_bound: false,
        }
    }

    /// Apply [`MAX_PAY_ID`] to payment and payout creation as well
    pub fn enforce_pay_id_bound(mut self, enforce: bool) -> Self {
        self.enforce_pay_id_bound = enforce;
        self
    }

    pub fn signer(&self) -> &AnyPaySigner {
        &self.signer
    }

    fn finish(&self, operation: Operation, fields: FieldSet) -> Result<OperationRequest, AnyPayError> {
        let mut fields = fields.into_inner();
        let signature = self.signer.sign_operation(operation, &fields)?;
        fields.push((SIGN_FIELD.to_string(), signature.clone()));

        Ok(OperationRequest {
            operation,
            fields,
            signature,
        })
    }

    fn project_fields(&self) -> FieldSet {
        let mut fields = FieldSet::new();
        fields.push("project_id", self.signer.project_id());
        fields
    }

    pub fn balance(&self) -> Result<OperationRequest, AnyPayError> {
        self.finish(Operation::Balance, FieldSet::new())
    }

    pub fn rates(&self) -> Result<OperationRequest, AnyPayError> {
        self.finish(Operation::Rates, FieldSet::new())
    }

    pub fn ip_list(&self) -> Result<OperationRequest, AnyPayError> {
        self.finish(Operation::IpList, FieldSet::new())
    }

    pub fn commissions(&self) -> Result<OperationRequest, AnyPayError> {
        self.finish(Operation::Commissions, self.project_fields())
    }

    pub fn create_payment(&self, params: &CreatePaymentParams) -> Result<OperationRequest, AnyPayError> {
        validate_id("pay_id", params.pay_id, self.enforce_pay_id_bound)?;
        validate_fixed_amount(params.amount)?;
        require("desc", &params.desc)?;
        require("email", &params.email)?;

        let mut fields = self.project_fields();
        fields
            .push("pay_id", params.pay_id)
            .push("amount", format_amount_fixed(params.amount))
            .push("currency", params.currency)
            .push("desc", &params.desc)
            .push("method", params.method)
            .push_opt("method_currency", params.method_currency)
            .push("email", &params.email)
            .push_opt("phone", params.phone)
            .push_opt("tail", params.tail.as_deref())
            .push_opt("success_url", params.success_url.as_deref())
            .push_opt("fail_url", params.fail_url.as_deref())
            .push_opt("lang", params.lang.as_deref())
            .merge(params.extra.iter().filter(|(key, _)| key != SIGN_FIELD));

        self.finish(Operation::CreatePayment, fields)
    }

    pub fn list_payments(&self, params: &ListPaymentsParams) -> Result<OperationRequest, AnyPayError> {
        let mut fields = self.project_fields();
        fields
            .push_opt("trans_id", params.trans_id)
            .push_opt("pay_id", params.pay_id)
            .push_opt("offset", params.offset);

        self.finish(Operation::ListPayments, fields)
    }

    pub fn create_payout(&self, params: &CreatePayoutParams) -> Result<OperationRequest, AnyPayError> {
        validate_id("payout_id", params.payout_id, self.enforce_pay_id_bound)?;
        validate_amount(params.amount)?;
        require("wallet", &params.wallet)?;

        let mut fields = self.project_fields();
        fields
            .push("payout_id", params.payout_id)
            .push("payout_type", params.payout_type)
            .push("amount", format_amount_plain(params.amount))
            .push("wallet", &params.wallet)
            .push_opt("wallet_currency", params.wallet_currency)
            .push_opt("commission_type", params.commission_type)
            .push_opt("status_url", params.status_url.as_deref());

        self.finish(Operation::CreatePayout, fields)
    }

    pub fn list_payouts(&self, params: &ListPayoutsParams) -> Result<OperationRequest, AnyPayError> {
        let mut fields = self.project_fields();
        fields
            .push_opt("trans_id", params.trans_id)
            .push_opt("payout_id", params.payout_id)
            .push_opt("offset", params.offset);

        self.finish(Operation::ListPayouts, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::signer::Credentials;
    use crate::core::kernel::sha256_hex;
    use rust_decimal_macros::dec;

    fn builder() -> RequestBuilder {
        RequestBuilder::new(AnyPaySigner::new(Credentials::new(
            "1234".to_string(),
            "apikey".to_string(),
            "secret".to_string(),
            77,
        )))
    }

    fn keys(request: &OperationRequest) -> Vec<&str> {
        request.fields().iter().map(|(k, _)| k.as_str()).collect()
    }

    fn payment() -> CreatePaymentParams {
        CreatePaymentParams::new(
            1001,
            dec!(100.5),
            Currency::RUB,
            "Order 1001",
            "user@example.com",
            PaymentSystem::Qiwi,
        )
    }

    #[test]
    fn test_amount_formatting() {
        assert_eq!(format_amount_fixed(dec!(100.5)), "100.50");
        assert_eq!(format_amount_fixed(dec!(100)), "100.00");
        assert_eq!(format_amount_fixed(dec!(0.005)), "0.01");
        assert_eq!(format_amount_fixed(dec!(19.999)), "20.00");
        assert_eq!(format_amount_plain(dec!(100.50)), "100.5");
        assert_eq!(format_amount_plain(dec!(100.00)), "100");
    }

    #[test]
    fn test_balance_request_only_carries_sign() {
        let request = builder().balance().unwrap();
        assert_eq!(keys(&request), vec!["sign"]);
        assert_eq!(request.signature(), sha256_hex("balance1234apikey"));
        assert_eq!(
            request.url("https://anypay.io/api/", "1234"),
            "https://anypay.io/api/balance/1234"
        );
    }

    #[test]
    fn test_create_payment_fields_and_signature() {
        let request = builder().create_payment(&payment()).unwrap();

        assert_eq!(
            keys(&request),
            vec!["project_id", "pay_id", "amount", "currency", "desc", "method", "email", "sign"]
        );
        assert_eq!(request.field("amount"), Some("100.50"));
        assert_eq!(request.field("method"), Some("qiwi"));
        assert_eq!(
            request.signature(),
            "32e38d05bdaaef025bf9a19f75e282fed21852931be2529f3cb51c4b2a8cf836"
        );
    }

    #[test]
    fn test_signature_rederived_from_transmitted_fields() {
        let builder = builder();
        let params = payment()
            .with_phone(79_990_000_000)
            .with_success_url("https://shop.example/ok")
            .with_extra("order_ref", "A-1");
        let request = builder.create_payment(&params).unwrap();

        let rederived = builder
            .signer()
            .sign_operation(request.operation(), request.unsigned_fields())
            .unwrap();
        assert_eq!(rederived, request.signature());
        assert_eq!(request.fields().last().map(|(k, _)| k.as_str()), Some("sign"));
    }

    #[test]
    fn test_optional_fields_are_omitted_when_absent() {
        let request = builder()
            .create_payment(&payment().with_lang("").with_tail("4242"))
            .unwrap();

        assert!(request.field("lang").is_none());
        assert!(request.field("phone").is_none());
        assert!(request.field("success_url").is_none());
        assert_eq!(request.field("tail"), Some("4242"));
    }

    #[test]
    fn test_extra_fields_cannot_override_declared_ones() {
        let params = payment()
            .with_extra("amount", "0.01")
            .with_extra("sign", "forged")
            .with_extra("ref", "first")
            .with_extra("ref", "second");
        let request = builder().create_payment(&params).unwrap();

        assert_eq!(request.field("amount"), Some("100.50"));
        assert_eq!(request.field("ref"), Some("first"));
        assert_eq!(request.field("sign"), Some(request.signature()));
        assert_eq!(
            request.fields().iter().filter(|(k, _)| k == "sign").count(),
            1
        );
    }

    #[test]
    fn test_create_payment_validation() {
        let builder = builder();

        for amount in [dec!(0), dec!(-1)] {
            let mut params = payment();
            params.amount = amount;
            assert!(matches!(
                builder.create_payment(&params),
                Err(AnyPayError::Validation(_))
            ));
        }

        let mut params = payment();
        params.amount = dec!(0.004);
        assert!(matches!(
            builder.create_payment(&params),
            Err(AnyPayError::Validation(ref msg)) if msg.contains("rounding")
        ));

        let mut params = payment();
        params.pay_id = 0;
        assert!(matches!(builder.create_payment(&params), Err(AnyPayError::Validation(_))));

        let mut params = payment();
        params.email = "  ".to_string();
        assert!(matches!(builder.create_payment(&params), Err(AnyPayError::Validation(_))));
    }

    #[test]
    fn test_pay_id_bound_is_configurable() {
        let mut params = payment();
        params.pay_id = MAX_PAY_ID + 1;

        assert!(builder().create_payment(&params).is_ok());
        assert!(matches!(
            builder().enforce_pay_id_bound(true).create_payment(&params),
            Err(AnyPayError::Validation(_))
        ));
    }

    #[test]
    fn test_create_payout_uses_plain_amount() {
        let params = CreatePayoutParams::new(9, PaymentSystem::Card, dec!(250.50), "4111111111111111")
            .with_commission_type(CommissionType::Balance);
        let request = builder().create_payout(&params).unwrap();

        assert_eq!(
            keys(&request),
            vec![
                "project_id",
                "payout_id",
                "payout_type",
                "amount",
                "wallet",
                "commission_type",
                "sign"
            ]
        );
        assert_eq!(request.field("amount"), Some("250.5"));
        assert_eq!(request.field("commission_type"), Some("balance"));
        assert_eq!(
            request.signature(),
            "4c9bf7c85a445f5657152511273d9661429094ed10d6842fb4b7b1c99cf7794c"
        );
    }

    #[test]
    fn test_create_payout_requires_wallet() {
        let params = CreatePayoutParams::new(9, PaymentSystem::Card, dec!(10), "");
        assert!(matches!(
            builder().create_payout(&params),
            Err(AnyPayError::Validation(ref msg)) if msg.contains("wallet")
        ));
    }

    #[test]
    fn test_list_payouts_transmits_project_without_signing_it() {
        let request = builder()
            .list_payouts(&ListPayoutsParams {
                payout_id: Some(9),
                ..ListPayoutsParams::default()
            })
            .unwrap();

        assert_eq!(keys(&request), vec!["project_id", "payout_id", "sign"]);
        assert_eq!(request.signature(), sha256_hex("payouts1234apikey"));
    }

    #[test]
    fn test_list_payments_signs_project() {
        let request = builder()
            .list_payments(&ListPaymentsParams {
                pay_id: Some(42),
                ..ListPaymentsParams::default()
            })
            .unwrap();

        assert_eq!(keys(&request), vec!["project_id", "pay_id", "sign"]);
        assert_eq!(request.signature(), sha256_hex("payments123477apikey"));
    }

    #[test]
    fn test_json_encoding() {
        let request = builder().commissions().unwrap();
        let http = request
            .to_http_request("https://anypay.io/api", "1234", BodyEncoding::Json)
            .unwrap();

        let body: Value = serde_json::from_slice(&http.body).unwrap();
        assert_eq!(body["project_id"], "77");
        assert_eq!(body["sign"], sha256_hex("commissions123477apikey").as_str());
        assert_eq!(http.url, "https://anypay.io/api/commissions/1234");
    }
}
