use crate::api::merchant::MerchantRedirect;
use crate::api::request::{CreatePaymentParams, CreatePayoutParams, ListPaymentsParams, ListPayoutsParams};
use crate::api::rest::AnyPayRest;
use crate::api::types::{
    AccountBalance, Commissions, CreatedPayment, IpAddresses, Payment, PaymentTransactions,
    Payout, PayoutTransactions, Rates,
};
use crate::core::config::AnyPayConfig;
use crate::core::errors::AnyPayError;
use crate::core::kernel::Transport;
use crate::core::traits::{AccountApi, AnyPayApi, PaymentsApi, PayoutsApi};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

pub mod account;
pub mod payments;
pub mod payouts;

pub use account::Account;
pub use payments::Payments;
pub use payouts::Payouts;

/// AnyPay client that composes all sub-trait implementations
pub struct AnyPayClient<T: Transport> {
    pub account: Account<T>,
    pub payments: Payments<T>,
    pub payouts: Payouts<T>,
    rest: AnyPayRest<T>,
    merchant_url: String,
}

impl<T: Transport> AnyPayClient<T> {
    /// Create a client over an explicitly injected transport
    pub fn with_transport(config: &AnyPayConfig, transport: T) -> Self {
        Self::from_rest(
            AnyPayRest::new(config, Arc::new(transport)),
            config.merchant_url.clone(),
        )
    }

    fn from_rest(rest: AnyPayRest<T>, merchant_url: String) -> Self {
        Self {
            account: Account::new(&rest),
            payments: Payments::new(&rest),
            payouts: Payouts::new(&rest),
            rest,
            merchant_url,
        }
    }

    /// Every subsequent call is abandoned with `TransportError::Cancelled` once `token` fires
    pub fn with_cancellation(self, token: CancellationToken) -> Self {
        let merchant_url = self.merchant_url;
        Self::from_rest(self.rest.with_cancellation(token), merchant_url)
    }

    pub fn rest(&self) -> &AnyPayRest<T> {
        &self.rest
    }

    pub fn merchant_url(&self) -> &str {
        &self.merchant_url
    }

    /// Signed URL of the hosted payment page. Performs no network call.
    #[instrument(skip(self, redirect), fields(pay_id = redirect.pay_id, sign_type = %redirect.sign_type))]
    pub fn build_merchant_redirect_url(&self, redirect: &MerchantRedirect) -> Result<String, AnyPayError> {
        redirect.build_url(&self.merchant_url, self.rest.signer())
    }
}

#[async_trait]
impl<T: Transport> AccountApi for AnyPayClient<T> {
    async fn get_balance(&self) -> Result<AccountBalance, AnyPayError> {
        self.account.get_balance().await
    }

    async fn get_rates(&self) -> Result<Rates, AnyPayError> {
        self.account.get_rates().await
    }

    async fn get_commissions(&self) -> Result<Commissions, AnyPayError> {
        self.account.get_commissions().await
    }

    async fn get_ip_addresses(&self) -> Result<IpAddresses, AnyPayError> {
        self.account.get_ip_addresses().await
    }
}

#[async_trait]
impl<T: Transport> PaymentsApi for AnyPayClient<T> {
    async fn create_payment(&self, params: CreatePaymentParams) -> Result<CreatedPayment, AnyPayError> {
        self.payments.create_payment(params).await
    }

    async fn list_payments(&self, params: ListPaymentsParams) -> Result<PaymentTransactions, AnyPayError> {
        self.payments.list_payments(params).await
    }

    async fn get_payment(&self, pay_id: i64) -> Result<Option<Payment>, AnyPayError> {
        self.payments.get_payment(pay_id).await
    }
}

#[async_trait]
impl<T: Transport> PayoutsApi for AnyPayClient<T> {
    async fn create_payout(&self, params: CreatePayoutParams) -> Result<Payout, AnyPayError> {
        self.payouts.create_payout(params).await
    }

    async fn list_payouts(&self, params: ListPayoutsParams) -> Result<PayoutTransactions, AnyPayError> {
        self.payouts.list_payouts(params).await
    }

    async fn get_payout(&self, payout_id: i64) -> Result<Option<Payout>, AnyPayError> {
        self.payouts.get_payout(payout_id).await
    }
}

impl<T: Transport> AnyPayApi for AnyPayClient<T> {}
