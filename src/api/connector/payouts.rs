use crate::api::request::{CreatePayoutParams, ListPayoutsParams};
use crate::api::rest::AnyPayRest;
use crate::api::types::{Payout, PayoutTransactions};
use crate::core::errors::AnyPayError;
use crate::core::kernel::Transport;
use crate::core::traits::PayoutsApi;
use async_trait::async_trait;
use tracing::instrument;

pub struct Payouts<T: Transport> {
    rest: AnyPayRest<T>,
}

impl<T: Transport> Payouts<T> {
    pub fn new(rest: &AnyPayRest<T>) -> Self {
        Self { rest: rest.clone() }
    }
}

#[async_trait]
impl<T: Transport> PayoutsApi for Payouts<T> {
    #[instrument(skip(self, params), fields(payout_id = params.payout_id, payout_type = %params.payout_type))]
    async fn create_payout(&self, params: CreatePayoutParams) -> Result<Payout, AnyPayError> {
        self.rest.create_payout(&params).await
    }

    #[instrument(skip(self))]
    async fn list_payouts(&self, params: ListPayoutsParams) -> Result<PayoutTransactions, AnyPayError> {
        self.rest.payouts(&params).await
    }

    #[instrument(skip(self))]
    async fn get_payout(&self, payout_id: i64) -> Result<Option<Payout>, AnyPayError> {
        let page = self
            .rest
            .payouts(&ListPayoutsParams {
                payout_id: Some(payout_id),
                ..ListPayoutsParams::default()
            })
            .await?;

        Ok(page.payouts.into_values().find(|p| p.payout_id == payout_id))
    }
}
