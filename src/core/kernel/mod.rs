/// Transport kernel for the AnyPay client
///
/// The kernel knows nothing about individual API operations. It provides:
///
/// - `Transport`: one HTTP exchange per call, injected into the client so
///   tests can substitute a fake
/// - `ReqwestTransport`: the default `Transport` backed by reqwest
/// - hashing primitives (`sha256_hex`, `md5_hex`) used by the API signer
///
/// # Example
/// ```rust,no_run
/// use anypay::core::kernel::{HttpRequest, ReqwestTransport, Transport, TransportConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = ReqwestTransport::new(TransportConfig::default())?;
/// let response = transport
///     .send(HttpRequest::post_form(
///         "https://anypay.io/api/balance/123".to_string(),
///         vec![("sign".to_string(), "abc".to_string())],
///     )?)
///     .await?;
/// println!("status {}", response.status);
/// # Ok(())
/// # }
/// ```
pub mod rest;
pub mod signer;

pub use rest::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportConfig};
pub use signer::{md5_hex, sha256_hex, sha256_joined};
