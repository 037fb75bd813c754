//! The REST client base used by declared clients.
//!
//! Implement [`RestClient`] for a type holding an [`HttpClient`] and a base
//! URL, and every trait declared with `#[rest_client]` is implemented for
//! it. Override the provided methods to add default headers or to rewrite
//! requests right before they are sent.

use std::future::Future;

use serde_json::Value;
use url::Url;

use crate::{HttpClient, MethodDescriptor, Request, Response, Result, assemble};

/// Base of every declared client.
///
/// # Example
///
/// ```ignore
/// use declarest::{HyperClient, Request, RestClient};
/// use url::Url;
///
/// struct GithubClient {
///     http: HyperClient,
///     base_url: Url,
///     token: String,
/// }
///
/// impl RestClient for GithubClient {
///     type Http = HyperClient;
///
///     fn http(&self) -> &HyperClient {
///         &self.http
///     }
///
///     fn base_url(&self) -> &Url {
///         &self.base_url
///     }
///
///     fn intercept_request(&self, request: &mut Request) {
///         request
///             .options_mut()
///             .set_header("Authorization", format!("Bearer {}", self.token));
///     }
/// }
/// ```
pub trait RestClient: Send + Sync {
    /// The injected transport.
    type Http: HttpClient;

    /// The transport requests are delegated to.
    fn http(&self) -> &Self::Http;

    /// All declared paths are resolved relative to this URL.
    fn base_url(&self) -> &Url;

    /// Headers sent with every request, before method headers.
    fn default_headers(&self) -> &[(String, String)] {
        &[]
    }

    /// Last chance to modify an assembled request.
    fn intercept_request(&self, request: &mut Request) {
        let _ = request;
    }

    /// Assemble and send one call of the method described by `descriptor`.
    ///
    /// `args` holds the call-time arguments in signature order. The response
    /// is returned as received, whatever its status.
    fn invoke(
        &self,
        descriptor: &MethodDescriptor,
        args: &[Value],
    ) -> impl Future<Output = Result<Response>> + Send {
        let assembled = assemble::assemble(
            self.base_url(),
            self.default_headers(),
            descriptor,
            args,
        );
        async move {
            let mut request = assembled?;
            self.intercept_request(&mut request);
            let (method, url, options) = request.into_parts();
            self.http().request(method, url, options).await
        }
    }
}
