//! Generic REST client.
//!
//! This module provides [`RestApi`], which pairs any [`HttpClient`] with a
//! base URL and default headers to form a [`RestClient`].

use url::Url;

use crate::{Error, HttpClient, Request, RestClient, Result};

type Interceptor = std::sync::Arc<dyn Fn(&mut Request) + Send + Sync>;

/// Generic REST client.
///
/// Every trait declared with `#[rest_client]` is implemented for `RestApi`.
/// A single HTTP client (with its connection pool and middleware) can be
/// shared by several `RestApi` values pointing at different services.
///
/// # Example
///
/// ```ignore
/// use declarest::{HyperClient, RestApi};
///
/// let http = HyperClient::builder().with_logging().build();
///
/// let petstore = RestApi::new(http.clone(), "https://petstore.example.com/v1")?
///     .default_header("Accept", "application/json");
/// let github = RestApi::new(http, "https://api.github.com")?;
/// ```
#[derive(Clone)]
pub struct RestApi<C> {
    client: C,
    base_url: Url,
    default_headers: Vec<(String, String)>,
    interceptor: Option<Interceptor>,
}

impl<C: std::fmt::Debug> std::fmt::Debug for RestApi<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestApi")
            .field("client", &self.client)
            .field("base_url", &self.base_url.as_str())
            .field("default_headers", &self.default_headers)
            .field("interceptor", &self.interceptor.is_some())
            .finish()
    }
}

impl<C> RestApi<C> {
    /// Create a new REST client with the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn new(client: C, base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self::with_url(
            client,
            Url::parse(base_url.as_ref()).map_err(Error::InvalidUrl)?,
        ))
    }

    /// Create a new REST client with a pre-parsed URL.
    #[must_use]
    pub fn with_url(client: C, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            default_headers: Vec::new(),
            interceptor: None,
        }
    }

    /// Add a header sent with every request.
    ///
    /// Method headers and header parameters with the same name take precedence.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Rewrite every assembled request right before it is sent.
    ///
    /// ```ignore
    /// let api = RestApi::new(http, "https://api.example.com")?
    ///     .intercept(|request| request.options_mut().set_header("X-Request-Id", "42"));
    /// ```
    #[must_use]
    pub fn intercept<F>(mut self, interceptor: F) -> Self
    where
        F: Fn(&mut Request) + Send + Sync + 'static,
    {
        self.interceptor = Some(std::sync::Arc::new(interceptor));
        self
    }

    /// Get a reference to the inner HTTP client.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.client
    }

    /// Consume the wrapper and return the inner HTTP client.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.client
    }
}

impl<C: HttpClient> RestClient for RestApi<C> {
    type Http = C;

    fn http(&self) -> &C {
        &self.client
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    fn intercept_request(&self, request: &mut Request) {
        if let Some(interceptor) = &self.interceptor {
            interceptor(request);
        }
    }
}
