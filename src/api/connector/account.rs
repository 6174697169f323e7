use crate::api::rest::AnyPayRest;
use crate::api::types::{AccountBalance, Commissions, IpAddresses, Rates};
use crate::core::errors::AnyPayError;
use crate::core::kernel::Transport;
use crate::core::traits::AccountApi;
use async_trait::async_trait;
use tracing::instrument;

/// Balance, rates, commissions and notification addresses
pub struct Account<T: Transport> {
    rest: AnyPayRest<T>,
}

impl<T: Transport> Account<T> {
    pub fn new(rest: &AnyPayRest<T>) -> Self {
        Self { rest: rest.clone() }
    }
}

#[async_trait]
impl<T: Transport> AccountApi for Account<T> {
    #[instrument(skip(self))]
    async fn get_balance(&self) -> Result<AccountBalance, AnyPayError> {
        self.rest.balance().await
    }

    #[instrument(skip(self))]
    async fn get_rates(&self) -> Result<Rates, AnyPayError> {
        self.rest.rates().await
    }

    #[instrument(skip(self))]
    async fn get_commissions(&self) -> Result<Commissions, AnyPayError> {
        self.rest.commissions().await
    }

    #[instrument(skip(self))]
    async fn get_ip_addresses(&self) -> Result<IpAddresses, AnyPayError> {
        self.rest.ip_notification().await
    }
}
