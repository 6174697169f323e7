pub mod api;
pub mod core;

pub use api::{build_client, build_client_with_http, AnyPayClient, MerchantRedirect};
pub use crate::core::{
    config::AnyPayConfig,
    errors::{AnyPayError, TransportError},
    traits::{AccountApi, AnyPayApi, PaymentsApi, PayoutsApi},
    types::*,
};
