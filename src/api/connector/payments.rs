use crate::api::request::{CreatePaymentParams, ListPaymentsParams};
use crate::api::rest::AnyPayRest;
use crate::api::types::{CreatedPayment, Payment, PaymentTransactions};
use crate::core::errors::AnyPayError;
use crate::core::kernel::Transport;
use crate::core::traits::PaymentsApi;
use async_trait::async_trait;
use tracing::{debug, instrument};

pub struct Payments<T: Transport> {
    rest: AnyPayRest<T>,
}

impl<T: Transport> Payments<T> {
    pub fn new(rest: &AnyPayRest<T>) -> Self {
        Self { rest: rest.clone() }
    }
}

#[async_trait]
impl<T: Transport> PaymentsApi for Payments<T> {
    #[instrument(skip(self, params), fields(pay_id = params.pay_id, method = %params.method))]
    async fn create_payment(&self, params: CreatePaymentParams) -> Result<CreatedPayment, AnyPayError> {
        self.rest.create_payment(&params).await
    }

    #[instrument(skip(self))]
    async fn list_payments(&self, params: ListPaymentsParams) -> Result<PaymentTransactions, AnyPayError> {
        self.rest.payments(&params).await
    }

    #[instrument(skip(self))]
    async fn get_payment(&self, pay_id: i64) -> Result<Option<Payment>, AnyPayError> {
        let page = self
            .rest
            .payments(&ListPaymentsParams {
                pay_id: Some(pay_id),
                ..ListPaymentsParams::default()
            })
            .await?;

        // Keyed by transaction id, so the oldest matching transaction comes first
        let payment = page.payments.into_values().find(|p| p.pay_id == pay_id);
        if payment.is_none() {
            debug!("No payment found");
        }
        Ok(payment)
    }
}
