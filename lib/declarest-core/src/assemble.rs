//! Request assembly: turns a [`MethodDescriptor`] and the call-time
//! arguments into a [`Request`].
//!
//! Arguments are passed as JSON values in signature order. A `null`
//! argument falls back to the default recorded on the parameter, and is
//! skipped when there is none.

use serde_json::Value;
use url::Url;

use crate::{
    CollectionFormat, ContentType, Error, MethodDescriptor, ParamKind, ParameterMetadata, Request,
    Result,
};

/// Serialize one call-time argument.
///
/// Used by generated client code to pass arguments to [`crate::RestClient::invoke`].
pub fn to_arg<T: serde::Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(Into::into)
}

/// Build the request for one invocation of `descriptor`.
///
/// `default_headers` are applied first, then the static headers of the
/// method, then per-call header arguments. A later header replaces an
/// earlier one with the same name, ignoring case.
pub fn assemble(
    base_url: &Url,
    default_headers: &[(String, String)],
    descriptor: &MethodDescriptor,
    args: &[Value],
) -> Result<Request> {
    let path = resolve_path(descriptor, args)?;
    let url = join_url(base_url, &path);

    let mut query = Vec::new();
    for meta in descriptor.params(ParamKind::Query) {
        let Some(value) = argument(meta, args) else {
            continue;
        };
        let key = required_key(descriptor, ParamKind::Query, meta)?;
        query.extend(query_pairs(key, value, meta.format));
    }
    for meta in descriptor.params(ParamKind::PlainQuery) {
        if let Some(value) = argument(meta, args) {
            query.extend(plain_query_pairs(value));
        }
    }

    let mut builder = Request::builder(descriptor.method(), url)
        .query_pairs(query)
        .headers(default_headers.iter().cloned())
        .headers(
            descriptor
                .static_headers()
                .iter()
                .map(|(name, value)| (name.clone(), value.joined())),
        );

    for meta in descriptor.params(ParamKind::Header) {
        let Some(value) = argument(meta, args) else {
            continue;
        };
        let name = required_key(descriptor, ParamKind::Header, meta)?;
        builder = builder.header(name, header_text(value));
    }

    if let Some((kind, meta)) = descriptor.body_param() {
        if let Some(value) = argument(meta, args) {
            builder = match kind {
                ParamKind::Body => builder.json(value)?,
                _ => match value {
                    Value::Object(_) => builder.form(value)?,
                    other => builder.typed_body(ContentType::FormUrlEncoded, text(other)),
                },
            };
        }
    }

    let request = builder.build();
    tracing::debug!(
        method = descriptor.name(),
        verb = %request.method(),
        url = %request.url(),
        has_body = request.body().is_some(),
        "assembled request"
    );
    Ok(request)
}

/// The argument at the record's index, or its default. `None` when both are absent or null.
fn argument<'a>(meta: &'a ParameterMetadata, args: &'a [Value]) -> Option<&'a Value> {
    args.get(meta.index)
        .filter(|value| !value.is_null())
        .or(meta.value.as_ref())
        .filter(|value| !value.is_null())
}

fn required_key<'a>(
    descriptor: &MethodDescriptor,
    kind: ParamKind,
    meta: &'a ParameterMetadata,
) -> Result<&'a str> {
    meta.key.as_deref().ok_or_else(|| {
        Error::invalid_request(format!(
            "{kind} parameter at index {} of {} has no name",
            meta.index,
            kind.metadata_key(descriptor.name())
        ))
    })
}

fn resolve_path(descriptor: &MethodDescriptor, args: &[Value]) -> Result<String> {
    let mut values = Vec::new();
    for meta in descriptor.params(ParamKind::Path) {
        let key = required_key(descriptor, ParamKind::Path, meta)?;
        let value = argument(meta, args).ok_or_else(|| {
            Error::invalid_request(format!(
                "missing value for path parameter '{key}' of {}",
                descriptor.name()
            ))
        })?;
        values.push((key, header_text(value)));
    }

    Ok(descriptor.path().resolve(|name| {
        values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.clone())
    }))
}

/// Append `path` to the path of the base URL, keeping its prefix and query.
fn join_url(base_url: &Url, path: &str) -> Url {
    let mut url = base_url.clone();
    url.set_fragment(None);
    if !path.is_empty() {
        let prefix = base_url.path().trim_end_matches('/');
        url.set_path(&format!("{prefix}/{}", path.trim_start_matches('/')));
    }
    url
}

/// Text of a scalar: strings unquoted, everything else as JSON.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Text of a header or path value; lists are comma-joined.
fn header_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().map(text).collect::<Vec<_>>().join(","),
        other => text(other),
    }
}

fn query_pairs(
    key: &str,
    value: &Value,
    format: Option<CollectionFormat>,
) -> Vec<(String, String)> {
    match value {
        Value::Array(items) => {
            let values: Vec<String> = items
                .iter()
                .filter(|item| !item.is_null())
                .map(text)
                .collect();
            format
                .unwrap_or(CollectionFormat::Multi)
                .encode(key, &values)
        }
        other => vec![(key.to_string(), text(other))],
    }
}

fn plain_query_pairs(value: &Value) -> Vec<(String, String)> {
    match value {
        Value::String(query) => {
            url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
                .into_owned()
                .collect()
        }
        Value::Object(fields) => fields
            .iter()
            .flat_map(|(key, value)| match value {
                Value::Null => Vec::new(),
                other => query_pairs(key, other, None),
            })
            .collect(),
        other => vec![(text(other), String::new())],
    }
}
