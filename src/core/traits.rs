use crate::api::request::{CreatePaymentParams, CreatePayoutParams, ListPaymentsParams, ListPayoutsParams};
use crate::api::types::{
    AccountBalance, Commissions, CreatedPayment, IpAddresses, Payment, PaymentTransactions,
    Payout, PayoutTransactions, Rates,
};
use crate::core::errors::AnyPayError;
use async_trait::async_trait;

#[async_trait]
pub trait AccountApi {
    /// Account balance in rubles
    async fn get_balance(&self) -> Result<AccountBalance, AnyPayError>;

    /// Current conversion rates for incoming payments and payouts
    async fn get_rates(&self) -> Result<Rates, AnyPayError>;

    /// Commission of every payment system enabled for the project
    async fn get_commissions(&self) -> Result<Commissions, AnyPayError>;

    /// Addresses payment notifications are sent from
    async fn get_ip_addresses(&self) -> Result<IpAddresses, AnyPayError>;
}

#[async_trait]
pub trait PaymentsApi {
    async fn create_payment(&self, params: CreatePaymentParams) -> Result<CreatedPayment, AnyPayError>;

    /// One page of up to 1000 payments matching the filters
    async fn list_payments(&self, params: ListPaymentsParams) -> Result<PaymentTransactions, AnyPayError>;

    /// Payment of an order, `None` when the service knows no such order
    async fn get_payment(&self, pay_id: i64) -> Result<Option<Payment>, AnyPayError>;
}

#[async_trait]
pub trait PayoutsApi {
    async fn create_payout(&self, params: CreatePayoutParams) -> Result<Payout, AnyPayError>;

    async fn list_payouts(&self, params: ListPayoutsParams) -> Result<PayoutTransactions, AnyPayError>;

    async fn get_payout(&self, payout_id: i64) -> Result<Option<Payout>, AnyPayError>;
}

// Composite trait for callers that need the whole API surface
#[async_trait]
pub trait AnyPayApi: AccountApi + PaymentsApi + PayoutsApi {}
