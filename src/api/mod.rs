pub mod codec;
pub mod merchant;
pub mod request;
pub mod signer;
pub mod types;

pub mod builder;
pub mod connector;
pub mod rest;

// Re-export main components
pub use builder::{build_client, build_client_with_http};
pub use codec::{ApiErrorBody, ApiResult};
pub use connector::{Account, AnyPayClient, Payments, Payouts};
pub use merchant::MerchantRedirect;
pub use request::{
    CreatePaymentParams, CreatePayoutParams, ListPaymentsParams, ListPayoutsParams,
    OperationRequest, RequestBuilder, MAX_PAY_ID,
};
pub use rest::AnyPayRest;
pub use signer::{AnyPaySigner, Credentials, Operation, SignField};
pub use types::{
    AccountBalance, Commissions, CreatedPayment, IpAddresses, Payment, PaymentData,
    PaymentTransactions, Payout, PayoutTransactions, Rates,
};
