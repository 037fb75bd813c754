//! Per-method descriptors: verb, path template, static headers and
//! parameter bindings, built once and read on every call.

use std::collections::BTreeMap;

use crate::{Error, Method, ParamDecorator, ParamKind, ParameterMetadata, PathTemplate, Result};

/// Value of a static header declared on a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    /// A single value.
    Single(String),
    /// An ordered list, sent comma-joined (`en,nl`).
    List(Vec<String>),
}

impl HeaderValue {
    /// The value as sent on the wire.
    #[must_use]
    pub fn joined(&self) -> String {
        match self {
            Self::Single(value) => value.clone(),
            Self::List(values) => values.join(","),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for HeaderValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<&[&str]> for HeaderValue {
    fn from(values: &[&str]) -> Self {
        Self::List(values.iter().map(ToString::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for HeaderValue {
    fn from(values: [&str; N]) -> Self {
        Self::List(values.iter().map(ToString::to_string).collect())
    }
}

/// Everything recorded about one declared method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    name: String,
    method: Method,
    path: PathTemplate,
    headers: Vec<(String, HeaderValue)>,
    params: BTreeMap<ParamKind, Vec<ParameterMetadata>>,
}

impl MethodDescriptor {
    /// Start describing a method.
    #[must_use]
    pub fn builder(
        name: impl Into<String>,
        method: Method,
        path: impl Into<PathTemplate>,
    ) -> DescriptorBuilder {
        DescriptorBuilder::new(name, method, path)
    }

    /// The method identity.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The HTTP verb.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// The path template.
    #[must_use]
    pub const fn path(&self) -> &PathTemplate {
        &self.path
    }

    /// Static headers in declaration order.
    #[must_use]
    pub fn static_headers(&self) -> &[(String, HeaderValue)] {
        &self.headers
    }

    /// Parameter records of one kind, in decoration order.
    #[must_use]
    pub fn params(&self, kind: ParamKind) -> &[ParameterMetadata] {
        self.params.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// The body parameter, if any. [`ParamKind::Body`] wins over [`ParamKind::PlainBody`].
    #[must_use]
    pub fn body_param(&self) -> Option<(ParamKind, &ParameterMetadata)> {
        [ParamKind::Body, ParamKind::PlainBody]
            .into_iter()
            .find_map(|kind| self.params(kind).first().map(|meta| (kind, meta)))
    }

    /// Number of arguments the method expects: one past the highest recorded index.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params
            .values()
            .flatten()
            .map(|meta| meta.index + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Accumulates the annotations of one method, finalized by [`DescriptorBuilder::build`].
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    name: String,
    method: Method,
    path: PathTemplate,
    headers: Vec<(String, HeaderValue)>,
    params: BTreeMap<ParamKind, Vec<ParameterMetadata>>,
}

impl DescriptorBuilder {
    /// Record the verb and path template of a method.
    #[must_use]
    pub fn new(name: impl Into<String>, method: Method, path: impl Into<PathTemplate>) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            headers: Vec::new(),
            params: BTreeMap::new(),
        }
    }

    /// The method identity.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a static header. A list value is sent comma-joined.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add several static headers.
    #[must_use]
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<HeaderValue>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Apply a parameter decorator at `index`.
    #[must_use]
    pub fn param(mut self, index: usize, decorator: ParamDecorator) -> Self {
        decorator.decorate(&mut self, index);
        self
    }

    pub(crate) fn push_param(&mut self, kind: ParamKind, metadata: ParameterMetadata) {
        self.params.entry(kind).or_default().push(metadata);
    }

    /// Finalize the descriptor.
    ///
    /// Fails with [`Error::DuplicateBody`] when more than one body or plain
    /// body parameter was declared.
    pub fn build(self) -> Result<MethodDescriptor> {
        let bodies: usize = [ParamKind::Body, ParamKind::PlainBody]
            .iter()
            .map(|kind| self.params.get(kind).map_or(0, Vec::len))
            .sum();
        if bodies > 1 {
            return Err(Error::DuplicateBody { method: self.name });
        }

        Ok(MethodDescriptor {
            name: self.name,
            method: self.method,
            path: self.path,
            headers: self.headers,
            params: self.params,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::{ParamOptions, body, header, path_param, plain_body, query_param};

    #[test]
    fn header_list_is_comma_joined() {
        let value = HeaderValue::from(["en", "nl"]);
        check!(value.joined() == "en,nl");
        check!(HeaderValue::from("application/json").joined() == "application/json");
    }

    #[test]
    fn builder_records_verb_path_and_headers() {
        let descriptor = MethodDescriptor::builder("get_items", Method::Get, "/test")
            .header("accept", "application/json")
            .header("lang", ["en", "nl"])
            .build()
            .expect("descriptor");

        check!(descriptor.name() == "get_items");
        check!(descriptor.method() == Method::Get);
        check!(descriptor.path().as_str() == "/test");
        let headers: Vec<_> = descriptor
            .static_headers()
            .iter()
            .map(|(name, value)| (name.as_str(), value.joined()))
            .collect();
        check!(
            headers
                == vec![
                    ("accept", "application/json".to_string()),
                    ("lang", "en,nl".to_string())
                ]
        );
    }

    #[test]
    fn params_grouped_by_kind() {
        let descriptor = MethodDescriptor::builder("update", Method::Put, "/users/{id}")
            .param(0, path_param("id"))
            .param(1, body())
            .param(2, header("X-Token"))
            .param(
                3,
                query_param("dry_run", ParamOptions::default()).expect("query"),
            )
            .build()
            .expect("descriptor");

        check!(descriptor.params(ParamKind::Path).len() == 1);
        check!(descriptor.params(ParamKind::Header).len() == 1);
        check!(descriptor.params(ParamKind::PlainQuery).is_empty());
        check!(descriptor.arity() == 4);

        let_assert!(Some((kind, meta)) = descriptor.body_param());
        check!(kind == ParamKind::Body);
        check!(meta.index == 1);
    }

    #[test]
    fn second_body_is_rejected() {
        let result = MethodDescriptor::builder("create", Method::Post, "/items")
            .param(0, body())
            .param(1, plain_body())
            .build();
        let_assert!(Err(Error::DuplicateBody { method }) = result);
        check!(method == "create");
    }

    #[test]
    fn no_params_means_zero_arity() {
        let descriptor = MethodDescriptor::builder("health", Method::Get, "/health")
            .build()
            .expect("descriptor");
        check!(descriptor.arity() == 0);
        check!(descriptor.body_param().is_none());
    }
}
