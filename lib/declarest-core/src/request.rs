//! HTTP request building.
//!
//! Requests are normally assembled from a [`crate::MethodDescriptor`]; the
//! builder is also usable directly.
//!
//! ```
//! use declarest_core::{Method, Request};
//!
//! let request = Request::builder(Method::Get, "https://api.example.com/users".parse().unwrap())
//!     .header("Accept", "application/json")
//!     .query("page", "1")
//!     .build();
//! assert_eq!(request.url().as_str(), "https://api.example.com/users?page=1");
//! ```

use std::collections::HashMap;

use bytes::Bytes;
use url::Url;

use crate::{ContentType, Method};

/// Headers and body passed to [`crate::HttpClient::request`] alongside the method and URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    headers: HashMap<String, String>,
    body: Option<Bytes>,
}

impl RequestOptions {
    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Set a header, replacing any existing header with the same name regardless of case.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
    }

    /// Consume into (headers, body).
    #[must_use]
    pub fn into_parts(self) -> (HashMap<String, String>, Option<Bytes>) {
        (self.headers, self.body)
    }
}

/// An HTTP request with method, URL, headers, and optional body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    url: Url,
    options: RequestOptions,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// Rebuild a request from the parts given to [`crate::HttpClient::request`].
    #[must_use]
    pub const fn from_parts(method: Method, url: Url, options: RequestOptions) -> Self {
        Self {
            method,
            url,
            options,
        }
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        self.options.headers()
    }

    /// Single header value, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.options.header(name)
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.options.body()
    }

    /// Headers and body.
    #[must_use]
    pub const fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Mutable access to headers and body.
    #[must_use]
    pub fn options_mut(&mut self) -> &mut RequestOptions {
        &mut self.options
    }

    /// Consume into (method, url, options).
    #[must_use]
    pub fn into_parts(self) -> (Method, Url, RequestOptions) {
        (self.method, self.url, self.options)
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: Url,
    options: RequestOptions,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            options: RequestOptions::default(),
        }
    }

    /// Sets a header, replacing any previous value under the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.set_header(name, value);
        self
    }

    /// Sets multiple headers, in order.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        for (name, value) in headers {
            self.options.set_header(name, value);
        }
        self
    }

    /// Appends a query parameter to the URL.
    #[must_use]
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// Appends multiple query parameters to the URL.
    #[must_use]
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut pairs = pairs.into_iter().peekable();
        if pairs.peek().is_none() {
            return self;
        }
        {
            let mut query = self.url.query_pairs_mut();
            for (name, value) in pairs {
                query.append_pair(&name, &value);
            }
        }
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.options.body = Some(body.into());
        self
    }

    /// Sets the body along with its `Content-Type`.
    #[must_use]
    pub fn typed_body(self, content_type: ContentType, body: impl Into<Bytes>) -> Self {
        self.header("Content-Type", content_type.as_str()).body(body)
    }

    /// Set a JSON body.
    pub fn json<T: serde::Serialize + ?Sized>(self, value: &T) -> crate::Result<Self> {
        let body = crate::to_json(value)?;
        Ok(self.typed_body(ContentType::Json, body))
    }

    /// Set a form-urlencoded body.
    pub fn form<T: serde::Serialize + ?Sized>(self, value: &T) -> crate::Result<Self> {
        let body = crate::to_form(value)?;
        Ok(self.typed_body(ContentType::FormUrlEncoded, body))
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            options: self.options,
        }
    }
}

pub(crate) fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).expect("valid URL")
    }

    #[test]
    fn request_builder_basic() {
        let request = Request::builder(Method::Get, url("https://api.example.com/users"))
            .header("Accept", "application/json")
            .build();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.url().as_str(), "https://api.example.com/users");
        assert_eq!(request.header("accept"), Some("application/json"));
        assert!(request.body().is_none());
    }

    #[test]
    fn later_header_overrides_regardless_of_case() {
        let request = Request::builder(Method::Get, url("https://api.example.com"))
            .header("Accept", "text/plain")
            .header("accept", "application/json")
            .build();

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("ACCEPT"), Some("application/json"));
    }

    #[test]
    fn request_builder_with_query() {
        let request = Request::builder(Method::Get, url("https://api.example.com/users"))
            .query("page", "1")
            .query_pairs(vec![("tag".to_string(), "a b".to_string())])
            .build();

        assert_eq!(
            request.url().as_str(),
            "https://api.example.com/users?page=1&tag=a+b"
        );
    }

    #[test]
    fn empty_query_pairs_leave_url_untouched() {
        let request = Request::builder(Method::Get, url("https://api.example.com/users"))
            .query_pairs(Vec::new())
            .build();
        assert_eq!(request.url().as_str(), "https://api.example.com/users");
    }

    #[test]
    fn request_builder_json() {
        #[derive(serde::Serialize)]
        struct User {
            name: String,
        }

        let request = Request::builder(Method::Post, url("https://api.example.com/users"))
            .json(&User {
                name: "test".to_string(),
            })
            .expect("json")
            .build();

        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(
            request.body().map(Bytes::as_ref),
            Some(br#"{"name":"test"}"#.as_slice())
        );
    }

    #[test]
    fn parts_round_trip() {
        let request = Request::builder(Method::Delete, url("https://api.example.com/users/1"))
            .header("X-Token", "abc")
            .build();
        let (method, target, options) = request.clone().into_parts();
        assert_eq!(Request::from_parts(method, target, options), request);
    }
}
