//! Header-setting middleware.
//!
//! Adds a header to every request leaving the client, replacing a header of
//! the same name set by the declared method.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tower::{Layer, Service};

use crate::{Error, Request, Response, Result};

/// Layer that sets one header on every request.
///
/// # Example
///
/// ```ignore
/// use declarest::HyperClient;
/// use declarest::middleware::SetHeaderLayer;
///
/// let client = HyperClient::builder()
///     .layer(SetHeaderLayer::bearer("my-secret-token"))
///     .layer(SetHeaderLayer::if_missing("Accept", "application/json"))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct SetHeaderLayer {
    name: Arc<str>,
    value: Arc<str>,
    overriding: bool,
}

impl SetHeaderLayer {
    /// Always set the header, replacing any value already present.
    pub fn overriding(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Arc::from(name.into()),
            value: Arc::from(value.into()),
            overriding: true,
        }
    }

    /// Set the header only when the request does not carry it yet.
    pub fn if_missing(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            overriding: false,
            ..Self::overriding(name, value)
        }
    }

    /// `Authorization: Bearer <token>`.
    pub fn bearer(token: impl AsRef<str>) -> Self {
        Self::overriding("Authorization", format!("Bearer {}", token.as_ref()))
    }
}

impl<S> Layer<S> for SetHeaderLayer {
    type Service = SetHeader<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SetHeader {
            inner,
            layer: self.clone(),
        }
    }
}

/// Service that sets one header on every request.
#[derive(Debug, Clone)]
pub struct SetHeader<S> {
    inner: S,
    layer: SetHeaderLayer,
}

impl<S> Service<Request> for SetHeader<S>
where
    S: Service<Request, Response = Response, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        let SetHeaderLayer {
            name,
            value,
            overriding,
        } = &self.layer;
        if *overriding || request.header(name).is_none() {
            request.options_mut().set_header(&**name, &**value);
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(request).await })
    }
}
