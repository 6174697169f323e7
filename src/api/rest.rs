use crate::api::codec::interpret;
use crate::api::request::{
    CreatePaymentParams, CreatePayoutParams, ListPaymentsParams, ListPayoutsParams,
    OperationRequest, RequestBuilder,
};
use crate::api::signer::{AnyPaySigner, Credentials};
use crate::api::types::{
    AccountBalance, Commissions, CreatedPayment, IpAddresses, PaymentTransactions, Payout,
    PayoutTransactions, Rates,
};
use crate::core::config::AnyPayConfig;
use crate::core::errors::{AnyPayError, TransportError};
use crate::core::kernel::Transport;
use crate::core::types::BodyEncoding;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// AnyPay REST API: one signed POST per operation over an injected transport
pub struct AnyPayRest<T: Transport> {
    transport: Arc<T>,
    requests: RequestBuilder,
    api_url: String,
    body_encoding: BodyEncoding,
    cancel: CancellationToken,
}

impl<T: Transport> Clone for AnyPayRest<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            requests: self.requests.clone(),
            api_url: self.api_url.clone(),
            body_encoding: self.body_encoding,
            cancel: self.cancel.clone(),
        }
    }
}

impl<T: Transport> AnyPayRest<T> {
    pub fn new(config: &AnyPayConfig, transport: Arc<T>) -> Self {
        let signer = AnyPaySigner::new(Credentials::from_config(config));
        Self {
            transport,
            requests: RequestBuilder::new(signer).enforce_pay_id_bound(config.enforce_pay_id_bound),
            api_url: config.api_url.clone(),
            body_encoding: config.body_encoding,
            cancel: CancellationToken::new(),
        }
    }

    /// Race every call against `token`; a fired token yields [`TransportError::Cancelled`]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn requests(&self) -> &RequestBuilder {
        &self.requests
    }

    pub fn signer(&self) -> &AnyPaySigner {
        self.requests.signer()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    #[instrument(skip(self, request), fields(method = request.method_name()))]
    async fn execute<R: DeserializeOwned>(&self, request: OperationRequest) -> Result<R, AnyPayError> {
        let http = request.to_http_request(&self.api_url, self.signer().api_id(), self.body_encoding)?;
        debug!(url = %http.url, "Calling AnyPay");

        let response = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Err(TransportError::Cancelled.into()),
            response = self.transport.send(http) => response?,
        };

        interpret(&response)
    }

    pub async fn balance(&self) -> Result<AccountBalance, AnyPayError> {
        self.execute(self.requests.balance()?).await
    }

    pub async fn rates(&self) -> Result<Rates, AnyPayError> {
        self.execute(self.requests.rates()?).await
    }

    pub async fn commissions(&self) -> Result<Commissions, AnyPayError> {
        self.execute(self.requests.commissions()?).await
    }

    pub async fn ip_notification(&self) -> Result<IpAddresses, AnyPayError> {
        self.execute(self.requests.ip_list()?).await
    }

    pub async fn create_payment(&self, params: &CreatePaymentParams) -> Result<CreatedPayment, AnyPayError> {
        self.execute(self.requests.create_payment(params)?).await
    }

    pub async fn payments(&self, params: &ListPaymentsParams) -> Result<PaymentTransactions, AnyPayError> {
        self.execute(self.requests.list_payments(params)?).await
    }

    pub async fn create_payout(&self, params: &CreatePayoutParams) -> Result<Payout, AnyPayError> {
        self.execute(self.requests.create_payout(params)?).await
    }

    pub async fn payouts(&self, params: &ListPayoutsParams) -> Result<PayoutTransactions, AnyPayError> {
        self.execute(self.requests.list_payouts(params)?).await
    }
}
