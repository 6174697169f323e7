use crate::api::request::{
    format_amount_fixed, non_blank, validate_fixed_amount, validate_id, FieldSet, SIGN_FIELD,
};
use crate::api::signer::{AnyPaySigner, MerchantSignInput};
use crate::core::config::ConfigError;
use crate::core::errors::AnyPayError;
use crate::core::types::{Currency, PaymentSystem, SignType};
use rust_decimal::Decimal;
use url::Url;

/// Parameters of a hosted payment page redirect
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantRedirect {
    /// Order number, 1 to 99999999999999
    pub pay_id: i64,
    pub amount: Decimal,
    pub currency: Currency,
    pub desc: Option<String>,
    pub email: Option<String>,
    pub phone: Option<u64>,
    pub method: Option<PaymentSystem>,
    pub success_url: Option<String>,
    pub fail_url: Option<String>,
    /// Payment page language, `ru` or `en`
    pub lang: Option<String>,
    pub extra: Vec<(String, String)>,
    pub sign_type: SignType,
}

impl MerchantRedirect {
    pub fn new(pay_id: i64, amount: Decimal, currency: Currency) -> Self {
        Self {
            pay_id,
            amount,
            currency,
            desc: None,
            email: None,
            phone: None,
            method: None,
            success_url: None,
            fail_url: None,
            lang: None,
            extra: Vec::new(),
            sign_type: SignType::default(),
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: u64) -> Self {
        self.phone = Some(phone);
        self
    }

    pub fn with_method(mut self, method: PaymentSystem) -> Self {
        self.method = Some(method);
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

    pub fn with_sign_type(mut self, sign_type: SignType) -> Self {
        self.sign_type = sign_type;
        self
    }

    /// Reject out-of-range order numbers and non-positive amounts
    pub fn validate(&self) -> Result<(), AnyPayError> {
        validate_id("pay_id", self.pay_id, true)?;
        validate_fixed_amount(self.amount)
    }

    /// Ordered query parameters, `sign` included
    pub fn query_pairs(&self, signer: &AnyPaySigner) -> Result<Vec<(String, String)>, AnyPayError> {
        self.validate()?;

        // The same values go into the signature and the query
        let desc = non_blank(self.desc.as_deref());
        let success_url = non_blank(self.success_url.as_deref());
        let fail_url = non_blank(self.fail_url.as_deref());

        let amount = format_amount_fixed(self.amount);
        let sign = signer.sign_merchant_redirect(
            self.sign_type,
            &MerchantSignInput {
                pay_id: self.pay_id,
                amount: &amount,
                currency: self.currency.as_str(),
                desc,
                success_url,
                fail_url,
            },
        );

        let mut fields = FieldSet::new();
        fields
            .push("merchant_id", signer.project_id())
            .push("pay_id", self.pay_id)
            .push("amount", &amount)
            .push("currency", self.currency)
            .push(SIGN_FIELD, sign)
            .push_opt("desc", desc)
            .push_opt("email", self.email.as_deref())
            .push_opt("phone", self.phone)
            .push_opt("method", self.method)
            .push_opt("success_url", success_url)
            .push_opt("fail_url", fail_url)
            .push_opt("lang", self.lang.as_deref())
            .merge(&self.extra);

        Ok(fields.into_inner())
    }

    /// Absolute URL of the hosted payment page
    pub fn build_url(&self, merchant_url: &str, signer: &AnyPaySigner) -> Result<String, AnyPayError> {
        let pairs = self.query_pairs(signer)?;

        let mut url = Url::parse(merchant_url).map_err(|e| {
            ConfigError::InvalidConfiguration(format!(
                "Invalid merchant url '{}': {}",
                merchant_url, e
            ))
        })?;
        url.query_pairs_mut().extend_pairs(pairs);

        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::request::MAX_PAY_ID;
    use crate::api::signer::Credentials;
    use crate::core::kernel::sha256_hex;
    use rust_decimal_macros::dec;

    const MERCHANT_URL: &str = "https://anypay.io/merchant";

    fn signer() -> AnyPaySigner {
        AnyPaySigner::new(Credentials::new(
            "1234".to_string(),
            "apikey".to_string(),
            "secret".to_string(),
            77,
        ))
    }

    fn query(url: &str) -> Vec<(String, String)> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_md5_redirect() {
        let url = MerchantRedirect::new(42, dec!(10), Currency::RUB)
            .build_url(MERCHANT_URL, &signer())
            .unwrap();

        assert_eq!(
            url,
            "https://anypay.io/merchant?merchant_id=77&pay_id=42&amount=10.00&currency=RUB&sign=0bee9c793f034120e1e699308360ee65"
        );
    }

    #[test]
    fn test_sha256_redirect_with_optional_fields() {
        let url = MerchantRedirect::new(42, dec!(10.00), Currency::USD)
            .with_success_url("https://shop.example/ok")
            .with_email("user@example.com")
            .with_method(PaymentSystem::Card)
            .with_sign_type(SignType::Sha256)
            .build_url(MERCHANT_URL, &signer())
            .unwrap();

        let pairs = query(&url);
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["merchant_id", "pay_id", "amount", "currency", "sign", "email", "method", "success_url"]
        );
        assert!(pairs.contains(&(
            "sign".to_string(),
            "86ee444eef6b5dbd0f987d9421d83cda414512bbfa0c5076360afd65cd59bd1c".to_string()
        )));
        assert!(pairs.contains(&("method".to_string(), "card".to_string())));
    }

    #[test]
    fn test_out_of_range_pay_id_is_rejected() {
        for pay_id in [0, -5, 100_000_000_000_000] {
            let err = MerchantRedirect::new(pay_id, dec!(10), Currency::RUB)
                .build_url(MERCHANT_URL, &signer())
                .unwrap_err();
            assert!(matches!(err, AnyPayError::Validation(_)), "pay_id {}", pay_id);
        }

        assert!(MerchantRedirect::new(MAX_PAY_ID, dec!(10), Currency::RUB)
            .build_url(MERCHANT_URL, &signer())
            .is_ok());
    }

    #[test]
    fn test_non_positive_amount_is_rejected() {
        for amount in [dec!(0), dec!(-1)] {
            let err = MerchantRedirect::new(42, amount, Currency::RUB)
                .query_pairs(&signer())
                .unwrap_err();
            assert!(matches!(err, AnyPayError::Validation(_)));
        }
    }

    #[test]
    fn test_amount_rounding_to_zero_is_rejected() {
        let err = MerchantRedirect::new(42, dec!(0.004), Currency::RUB)
            .query_pairs(&signer())
            .unwrap_err();
        assert!(matches!(err, AnyPayError::Validation(_)));

        let pairs = MerchantRedirect::new(42, dec!(0.005), Currency::RUB)
            .query_pairs(&signer())
            .unwrap();
        assert!(pairs.contains(&("amount".to_string(), "0.01".to_string())));
    }

    #[test]
    fn test_blank_optional_fields_sign_as_empty_slots() {
        let pairs = MerchantRedirect::new(42, dec!(10), Currency::RUB)
            .with_desc("  ")
            .with_fail_url("")
            .with_success_url("https://shop.example/ok")
            .with_sign_type(SignType::Sha256)
            .query_pairs(&signer())
            .unwrap();

        let value = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(value("desc"), None);
        assert_eq!(value("fail_url"), None);

        // Rebuild the signature from what was actually sent
        let expected = sha256_hex(&format!(
            "{}:{}:{}:{}:{}:{}:{}:secret",
            value("merchant_id").unwrap(),
            value("pay_id").unwrap(),
            value("amount").unwrap(),
            value("currency").unwrap(),
            value("desc").unwrap_or_default(),
            value("success_url").unwrap_or_default(),
            value("fail_url").unwrap_or_default(),
        ));
        assert_eq!(value("sign"), Some(expected.as_str()));
        assert_eq!(
            expected,
            sha256_hex("77:42:10.00:RUB::https://shop.example/ok::secret")
        );
    }

    #[test]
    fn test_extra_parameters_first_write_wins() {
        let pairs = MerchantRedirect::new(42, dec!(10), Currency::RUB)
            .with_extra("amount", "0.01")
            .with_extra("ref", "first")
            .with_extra("ref", "second")
            .with_extra("sign", "forged")
            .query_pairs(&signer())
            .unwrap();

        let lookup = |key: &str| {
            pairs
                .iter()
                .filter(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .collect::<Vec<_>>()
        };
        assert_eq!(lookup("amount"), vec!["10.00"]);
        assert_eq!(lookup("ref"), vec!["first"]);
        assert_eq!(lookup("sign"), vec!["0bee9c793f034120e1e699308360ee65"]);
    }

    #[test]
    fn test_invalid_merchant_url() {
        let err = MerchantRedirect::new(42, dec!(10), Currency::RUB)
            .build_url("not a url", &signer())
            .unwrap_err();
        assert!(matches!(err, AnyPayError::Config(_)));
    }
}
