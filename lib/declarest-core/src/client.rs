//! The injected HTTP client.
//!
//! [`HttpClient`] is the only seam between a declared client and the
//! network. The facade ships a hyper-based implementation; tests usually
//! provide a recording mock.

use std::future::Future;

use url::Url;

use crate::{Method, RequestOptions, Response, Result};

/// Executes fully assembled requests.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use std::future::Future;
///
/// use declarest_core::{HttpClient, Method, RequestOptions, Response, Result};
/// use url::Url;
///
/// struct Always200;
///
/// impl HttpClient for Always200 {
///     fn request(
///         &self,
///         _method: Method,
///         _url: Url,
///         _options: RequestOptions,
///     ) -> impl Future<Output = Result<Response>> + Send {
///         std::future::ready(Ok(Response::new(200, HashMap::new(), "ok")))
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Send one request and return the response as received.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    fn request(
        &self,
        method: Method,
        url: Url,
        options: RequestOptions,
    ) -> impl Future<Output = Result<Response>> + Send;
}

impl<T: HttpClient> HttpClient for &T {
    fn request(
        &self,
        method: Method,
        url: Url,
        options: RequestOptions,
    ) -> impl Future<Output = Result<Response>> + Send {
        (**self).request(method, url, options)
    }
}

impl<T: HttpClient> HttpClient for std::sync::Arc<T> {
    fn request(
        &self,
        method: Method,
        url: Url,
        options: RequestOptions,
    ) -> impl Future<Output = Result<Response>> + Send {
        (**self).request(method, url, options)
    }
}
