//! Attribute parsing for declarest proc-macros.

use syn::ext::IdentExt as _;
use syn::parse::Parse as _;
use syn::{Expr, Ident};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// The `declarest::Method` variant name.
    #[must_use]
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "Get",
            Self::Post => "Post",
            Self::Put => "Put",
            Self::Delete => "Delete",
            Self::Patch => "Patch",
            Self::Head => "Head",
            Self::Options => "Options",
        }
    }

    /// Parse an HTTP method from a string (case-insensitive).
    /// Returns `None` for unsupported methods.
    #[must_use]
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "PATCH" => Some(Self::Patch),
            "HEAD" => Some(Self::Head),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }

    /// Map a verb attribute name (`get`, `post`, ...) to its method.
    #[must_use]
    pub(crate) fn from_attr(path: &syn::Path) -> Option<Self> {
        const VERBS: [(&str, HttpMethod); 7] = [
            ("get", HttpMethod::Get),
            ("post", HttpMethod::Post),
            ("put", HttpMethod::Put),
            ("delete", HttpMethod::Delete),
            ("patch", HttpMethod::Patch),
            ("head", HttpMethod::Head),
            ("options", HttpMethod::Options),
        ];
        VERBS
            .iter()
            .find(|(name, _)| path.is_ident(name))
            .map(|(_, method)| *method)
    }

    /// Returns true if this HTTP method typically has a request body.
    #[must_use]
    pub(crate) const fn supports_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

/// Collection formats accepted in `#[query(format = "...")]`.
///
/// Names are matched exactly, so typos surface at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CollectionFormat {
    Csv,
    Ssv,
    Tsv,
    Pipes,
    Multi,
}

impl CollectionFormat {
    const ALL: [Self; 5] = [Self::Csv, Self::Ssv, Self::Tsv, Self::Pipes, Self::Multi];

    /// The declared name, passed through to the runtime parameter builder.
    #[must_use]
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Ssv => "SSV",
            Self::Tsv => "TSV",
            Self::Pipes => "PIPES",
            Self::Multi => "MULTI",
        }
    }

    #[must_use]
    pub(crate) fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.as_str() == s)
    }
}

/// Options shared by path, query and header parameters.
#[derive(Debug, Clone, Default)]
pub(crate) struct ParamOptions {
    /// Placeholder, query key or header name. Defaults to the parameter name.
    pub(crate) name: Option<String>,
    /// Collection format for list values.
    pub(crate) format: Option<CollectionFormat>,
    /// Default value, used when the argument is `None`.
    pub(crate) value: Option<Expr>,
}

/// Parameter kind for method arguments.
#[derive(Debug, Clone)]
pub(crate) enum ParamKind {
    /// `#[path]`, `#[path("user_id")]`.
    Path(ParamOptions),
    /// `#[query]`, `#[query("page_size")]`, `#[query("tags", format = "CSV", value = 10)]`.
    Query(ParamOptions),
    /// `#[plain_query]`: a whole query string or an object of pairs.
    PlainQuery,
    /// `#[header("Authorization")]`.
    Header(ParamOptions),
    /// `#[body]`: JSON body.
    Body,
    /// `#[plain_body]`: form-encoded body.
    PlainBody,
}

impl ParamKind {
    #[must_use]
    pub(crate) const fn is_body(&self) -> bool {
        matches!(self, Self::Body | Self::PlainBody)
    }
}

/// A parsed method parameter.
#[derive(Debug)]
pub(crate) struct MethodParam {
    /// Parameter name from the function signature.
    pub(crate) name: Ident,
    /// Position in the signature, receiver excluded.
    pub(crate) index: usize,
    /// Parameter kind.
    pub(crate) kind: ParamKind,
}

impl MethodParam {
    /// The key the parameter is recorded under: explicit name or parameter name.
    pub(crate) fn key(&self) -> String {
        match &self.kind {
            ParamKind::Path(options) | ParamKind::Query(options) | ParamKind::Header(options) => {
                options
                    .name
                    .clone()
                    .unwrap_or_else(|| self.name.to_string())
            }
            ParamKind::PlainQuery | ParamKind::Body | ParamKind::PlainBody => self.name.to_string(),
        }
    }
}

/// Parameter attribute names stripped from generated code.
pub(crate) const PARAM_ATTRS: &[&str] = &[
    "path",
    "query",
    "plain_query",
    "header",
    "body",
    "plain_body",
];

/// Parse a parameter attribute and return its kind.
///
/// Returns `Ok(None)` for attributes that are not parameter attributes.
pub(crate) fn parse_param_attr(attr: &syn::Attribute) -> syn::Result<Option<ParamKind>> {
    let path = attr.path();

    if path.is_ident("path") {
        return parse_param_options(attr).map(|options| Some(ParamKind::Path(options)));
    }

    if path.is_ident("query") {
        return parse_param_options(attr).map(|options| Some(ParamKind::Query(options)));
    }

    if path.is_ident("header") {
        let options = parse_param_options(attr)?;
        if options.name.is_none() {
            return Err(syn::Error::new_spanned(
                attr,
                "expected header name: #[header(\"X-Name\")]",
            ));
        }
        return Ok(Some(ParamKind::Header(options)));
    }

    if path.is_ident("plain_query") {
        return Ok(Some(ParamKind::PlainQuery));
    }

    if path.is_ident("body") {
        return Ok(Some(ParamKind::Body));
    }

    if path.is_ident("plain_body") {
        return Ok(Some(ParamKind::PlainBody));
    }

    Ok(None)
}

/// Parse `#[attr]`, `#[attr("name")]` or `#[attr("name", format = "CSV", value = expr)]`.
fn parse_param_options(attr: &syn::Attribute) -> syn::Result<ParamOptions> {
    let mut options = ParamOptions::default();

    let syn::Meta::List(meta_list) = &attr.meta else {
        return Ok(options);
    };

    // A lone string literal is the name.
    if let Ok(str_lit) = syn::parse2::<syn::LitStr>(meta_list.tokens.clone()) {
        options.name = Some(str_lit.value());
        return Ok(options);
    }

    let parser = |input: syn::parse::ParseStream<'_>| -> syn::Result<()> {
        if input.peek(syn::LitStr) {
            let name: syn::LitStr = input.parse()?;
            options.name = Some(name.value());
            if input.is_empty() {
                return Ok(());
            }
            input.parse::<syn::Token![,]>()?;
        }
        let pairs = input.parse_terminated(syn::MetaNameValue::parse, syn::Token![,])?;
        for pair in pairs {
            if pair.path.is_ident("format") {
                options.format = parse_format(&pair.value)?;
            } else if pair.path.is_ident("value") {
                options.value = Some(pair.value);
            } else if pair.path.is_ident("name") {
                options.name = Some(lit_str(&pair.value)?.value());
            } else {
                return Err(syn::Error::new_spanned(
                    &pair.path,
                    "unsupported parameter option, expected `name`, `format` or `value`",
                ));
            }
        }
        Ok(())
    };
    syn::parse::Parser::parse2(parser, meta_list.tokens.clone())?;

    Ok(options)
}

/// Validate a collection format declaration. An empty string means no format.
fn parse_format(expr: &Expr) -> syn::Result<Option<CollectionFormat>> {
    let lit = lit_str(expr)?;
    let value = lit.value();
    if value.is_empty() {
        return Ok(None);
    }
    CollectionFormat::parse(&value).map(Some).ok_or_else(|| {
        syn::Error::new_spanned(
            lit,
            format!(
                "unknown collection format: '{value}'. Expected one of: CSV, SSV, TSV, PIPES, MULTI"
            ),
        )
    })
}

fn lit_str(expr: &Expr) -> syn::Result<&syn::LitStr> {
    match expr {
        Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Str(lit),
            ..
        }) => Ok(lit),
        other => Err(syn::Error::new_spanned(other, "expected string literal")),
    }
}

/// Extract placeholder names from a URL path template.
///
/// E.g., `/users/{id}/posts/{post_id}` returns `["id", "post_id"]`
#[must_use]
pub(crate) fn extract_path_placeholders(path: &str) -> Vec<String> {
    let mut placeholders = Vec::new();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '{' {
            let mut name = String::new();
            for next in chars.by_ref() {
                if next == '}' {
                    break;
                }
                name.push(next);
            }
            if !name.is_empty() {
                placeholders.push(name);
            }
        }
    }
    placeholders
}

/// A static header value: one string or a list sent comma-joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HeaderSpec {
    Single(String),
    List(Vec<String>),
}

/// Parse static headers from `#[headers(...)]` attributes.
///
/// Syntax: `#[headers(accept = "application/json", accept_language = ["en", "nl"])]`
///
/// Underscores in header names are converted to hyphens, so `accept_language`
/// becomes `accept-language`. A quoted name is kept as written.
pub(crate) fn parse_headers(attrs: &[syn::Attribute]) -> syn::Result<Vec<(String, HeaderSpec)>> {
    let mut headers = Vec::new();

    for attr in attrs {
        if !attr.path().is_ident("headers") {
            continue;
        }
        let parser = |input: syn::parse::ParseStream<'_>| -> syn::Result<()> {
            while !input.is_empty() {
                let name = if input.peek(syn::LitStr) {
                    input.parse::<syn::LitStr>()?.value()
                } else {
                    input.call(syn::Ident::parse_any)?.to_string().replace('_', "-")
                };
                input.parse::<syn::Token![=]>()?;
                let value: Expr = input.parse()?;
                headers.push((name, header_spec(&value)?));
                if input.is_empty() {
                    break;
                }
                input.parse::<syn::Token![,]>()?;
            }
            Ok(())
        };
        attr.parse_args_with(parser)?;
    }

    Ok(headers)
}

fn header_spec(value: &Expr) -> syn::Result<HeaderSpec> {
    match value {
        Expr::Array(array) => array
            .elems
            .iter()
            .map(|elem| lit_str(elem).map(syn::LitStr::value))
            .collect::<syn::Result<Vec<_>>>()
            .map(HeaderSpec::List),
        other => lit_str(other).map(|lit| HeaderSpec::Single(lit.value())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn http_method_as_str() {
        assert_eq!(HttpMethod::Get.as_str(), "Get");
        assert_eq!(HttpMethod::Post.as_str(), "Post");
        assert_eq!(HttpMethod::Delete.as_str(), "Delete");
    }

    #[test]
    fn http_method_parse_ignores_case() {
        assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("OPTIONS"), Some(HttpMethod::Options));
        assert_eq!(HttpMethod::parse("TRACE"), None);
    }

    #[test]
    fn http_method_supports_body() {
        assert!(HttpMethod::Post.supports_body());
        assert!(HttpMethod::Put.supports_body());
        assert!(HttpMethod::Patch.supports_body());
        assert!(!HttpMethod::Get.supports_body());
        assert!(!HttpMethod::Delete.supports_body());
        assert!(!HttpMethod::Head.supports_body());
        assert!(!HttpMethod::Options.supports_body());
    }

    #[test]
    fn collection_format_is_exact() {
        assert_eq!(CollectionFormat::parse("PIPES"), Some(CollectionFormat::Pipes));
        assert_eq!(CollectionFormat::parse("pipes"), None);
        assert_eq!(CollectionFormat::parse("COMMA"), None);
    }

    #[test]
    fn extract_placeholders_multiple() {
        assert_eq!(
            extract_path_placeholders("/repos/{owner}/{repo}/issues/{number}"),
            vec![
                "owner".to_string(),
                "repo".to_string(),
                "number".to_string()
            ]
        );
        assert!(extract_path_placeholders("/health").is_empty());
    }

    #[test]
    fn query_with_name_format_and_default() {
        let attr: syn::Attribute = parse_quote!(#[query("tags", format = "MULTI", value = 10)]);
        let Some(ParamKind::Query(options)) = parse_param_attr(&attr).expect("parse") else {
            panic!("expected query");
        };
        assert_eq!(options.name.as_deref(), Some("tags"));
        assert_eq!(options.format, Some(CollectionFormat::Multi));
        assert!(options.value.is_some());
    }

    #[test]
    fn query_with_unknown_format_fails() {
        let attr: syn::Attribute = parse_quote!(#[query(format = "COMMA")]);
        let err = parse_param_attr(&attr).expect_err("should fail");
        assert!(err.to_string().contains("unknown collection format: 'COMMA'"));
    }

    #[test]
    fn query_with_empty_format_has_none() {
        let attr: syn::Attribute = parse_quote!(#[query(format = "")]);
        let Some(ParamKind::Query(options)) = parse_param_attr(&attr).expect("parse") else {
            panic!("expected query");
        };
        assert!(options.format.is_none());
    }

    #[test]
    fn header_requires_name() {
        let attr: syn::Attribute = parse_quote!(#[header]);
        assert!(parse_param_attr(&attr).is_err());

        let attr: syn::Attribute = parse_quote!(#[header("X-Token")]);
        let Some(ParamKind::Header(options)) = parse_param_attr(&attr).expect("parse") else {
            panic!("expected header");
        };
        assert_eq!(options.name.as_deref(), Some("X-Token"));
    }

    #[test]
    fn non_param_attribute_is_ignored() {
        let attr: syn::Attribute = parse_quote!(#[doc = "docs"]);
        assert!(parse_param_attr(&attr).expect("parse").is_none());
    }

    #[test]
    fn headers_single_and_list() {
        let attrs: Vec<syn::Attribute> = vec![
            parse_quote!(#[headers(accept = "application/json", lang = ["en", "nl"])]),
            parse_quote!(#[headers(x_api_version = "2", "X_Raw" = "kept")]),
        ];
        let headers = parse_headers(&attrs).expect("parse");
        assert_eq!(
            headers,
            vec![
                (
                    "accept".to_string(),
                    HeaderSpec::Single("application/json".to_string())
                ),
                (
                    "lang".to_string(),
                    HeaderSpec::List(vec!["en".to_string(), "nl".to_string()])
                ),
                ("x-api-version".to_string(), HeaderSpec::Single("2".to_string())),
                ("X_Raw".to_string(), HeaderSpec::Single("kept".to_string())),
            ]
        );
    }

    #[test]
    fn headers_reject_non_string_values() {
        let attrs: Vec<syn::Attribute> = vec![parse_quote!(#[headers(retries = 3)])];
        assert!(parse_headers(&attrs).is_err());
    }
}
