//! Macro expansion logic for declarest.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{FnArg, Ident, ItemTrait, Pat, TraitItem, parse2};

use crate::attrs::{
    HeaderSpec, HttpMethod, MethodParam, PARAM_ATTRS, ParamKind, ParamOptions,
    extract_path_placeholders, parse_headers, parse_param_attr,
};
use crate::codegen::{
    analyze_return_type, generate_args, generate_descriptor, generate_response_handling,
};

/// Method attributes consumed by the macros.
const METHOD_ATTRS: &[&str] = &[
    "get", "post", "put", "delete", "patch", "head", "options", "http", "headers",
];

/// Arguments for the `#[rest_client]` attribute.
#[derive(Default)]
pub struct RestClientArgs {
    /// Sent as `User-Agent` by every method of the trait.
    pub user_agent: Option<String>,
}

/// Parse the `#[rest_client]` attribute arguments.
fn parse_rest_client_args(attr: TokenStream) -> syn::Result<RestClientArgs> {
    let mut args = RestClientArgs::default();

    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("user_agent") {
            let value: syn::LitStr = meta.value()?.parse()?;
            args.user_agent = Some(value.value());
            Ok(())
        } else {
            Err(meta.error("unsupported rest_client attribute"))
        }
    });

    syn::parse::Parser::parse2(parser, attr)?;
    Ok(args)
}

/// Information about a parsed trait method.
pub struct TraitMethodInfo {
    /// The method signature.
    pub sig: syn::Signature,
    /// The HTTP method (GET, POST, etc.).
    pub http_method: HttpMethod,
    /// The URL path template.
    pub path: String,
    /// Static headers declared on the method.
    pub headers: Vec<(String, HeaderSpec)>,
    /// Parsed parameters.
    pub params: Vec<MethodParam>,
    /// Documentation attributes.
    pub docs: Vec<syn::Attribute>,
}

/// Expand the `#[rest_client]` attribute on a trait.
pub fn expand_rest_client(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let trait_def: ItemTrait = parse2(item)?;
    let args = parse_rest_client_args(attr)?;

    let trait_name = &trait_def.ident;
    let vis = &trait_def.vis;
    let descriptors_name = format_ident!("{}Descriptors", trait_name);

    let mut trait_headers = Vec::new();
    if let Some(user_agent) = &args.user_agent {
        trait_headers.push((
            "User-Agent".to_string(),
            HeaderSpec::Single(user_agent.clone()),
        ));
    }
    trait_headers.extend(parse_headers(&trait_def.attrs)?);

    let methods = extract_trait_methods(&trait_def)?;
    let clean_trait = generate_clean_trait(vis, trait_name, &methods, &trait_def);
    let descriptors = generate_descriptors(vis, trait_name, &descriptors_name, &methods, &trait_headers);
    let blanket_impl = generate_blanket_impl(trait_name, &descriptors_name, &methods);

    Ok(quote! {
        #clean_trait
        #descriptors
        #blanket_impl
    })
}

/// Extract methods from a trait definition.
///
/// Every method must carry a verb attribute.
fn extract_trait_methods(trait_def: &ItemTrait) -> syn::Result<Vec<TraitMethodInfo>> {
    let mut methods = Vec::new();

    for item in &trait_def.items {
        let TraitItem::Fn(method) = item else {
            return Err(syn::Error::new_spanned(
                item,
                "only methods are supported in a #[rest_client] trait",
            ));
        };

        let Some((http_method, path)) = find_http_attribute(&method.attrs)? else {
            return Err(syn::Error::new_spanned(
                &method.sig,
                "missing HTTP method attribute, e.g. #[get(\"/path\")]",
            ));
        };

        if method.sig.asyncness.is_none() {
            return Err(syn::Error::new_spanned(
                &method.sig,
                "declared methods must be `async fn`",
            ));
        }

        let params = parse_method_params(&method.sig.inputs, &path, http_method)?;
        let headers = parse_headers(&method.attrs)?;
        let docs = method
            .attrs
            .iter()
            .filter(|a| a.path().is_ident("doc"))
            .cloned()
            .collect();

        methods.push(TraitMethodInfo {
            sig: method.sig.clone(),
            http_method,
            path,
            headers,
            params,
            docs,
        });
    }

    Ok(methods)
}

/// Find and parse HTTP method attribute from a method's attributes.
fn find_http_attribute(attrs: &[syn::Attribute]) -> syn::Result<Option<(HttpMethod, String)>> {
    for attr in attrs {
        let path = attr.path();

        if let Some(method) = HttpMethod::from_attr(path) {
            let path_str = parse_attr_path(attr)?;
            return Ok(Some((method, path_str)));
        }

        // Check for #[http("METHOD /path")]
        if path.is_ident("http") {
            let spec = parse_attr_path(attr)?;
            let (method, url_path) = parse_http_spec(&spec).map_err(|message| {
                syn::Error::new_spanned(attr, message)
            })?;
            return Ok(Some((method, url_path)));
        }
    }

    Ok(None)
}

/// Split `"METHOD /path"` into its verb and path.
fn parse_http_spec(spec: &str) -> Result<(HttpMethod, String), String> {
    let (method_str, url_path) = spec
        .split_once(' ')
        .ok_or_else(|| "expected format: \"METHOD /path\" (e.g., \"GET /users/{id}\")".to_string())?;

    let method = HttpMethod::parse(method_str).ok_or_else(|| {
        format!(
            "unsupported HTTP method: {method_str}. Supported: GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS"
        )
    })?;

    Ok((method, url_path.trim().to_string()))
}

/// Parse the path string from an attribute.
fn parse_attr_path(attr: &syn::Attribute) -> syn::Result<String> {
    match &attr.meta {
        syn::Meta::List(meta_list) => {
            let str_lit: syn::LitStr = syn::parse2(meta_list.tokens.clone())?;
            Ok(str_lit.value())
        }
        _ => Err(syn::Error::new_spanned(attr, "expected string argument")),
    }
}

/// Parse method parameters from function inputs.
///
/// Parameters are classified as follows:
/// 1. Explicit attributes (`#[path]`, `#[query]`, `#[body]`, etc.) take precedence
/// 2. Parameters matching URL placeholders are auto-classified as Path
/// 3. For body-supporting methods (POST, PUT, PATCH), a single remaining param becomes Body
/// 4. Multiple unclassified params or unclassified params on non-body methods cause errors
///
/// At most one body or plain body parameter is allowed.
fn parse_method_params(
    inputs: &syn::punctuated::Punctuated<FnArg, syn::token::Comma>,
    path_template: &str,
    http_method: HttpMethod,
) -> syn::Result<Vec<MethodParam>> {
    let placeholders = extract_path_placeholders(path_template);
    let mut params = Vec::new();
    let mut unclassified: Vec<(Ident, usize, &syn::PatType)> = Vec::new();

    let typed = inputs.iter().filter_map(|arg| match arg {
        FnArg::Typed(pat_type) => Some(pat_type),
        FnArg::Receiver(_) => None,
    });

    for (index, pat_type) in typed.enumerate() {
        let Pat::Ident(pat_ident) = pat_type.pat.as_ref() else {
            return Err(syn::Error::new_spanned(
                &pat_type.pat,
                "parameters must be plain identifiers",
            ));
        };
        let name = pat_ident.ident.clone();

        // Check for explicit attribute first
        let mut explicit = None;
        for attr in &pat_type.attrs {
            if let Some(kind) = parse_param_attr(attr)? {
                explicit = Some(kind);
                break;
            }
        }
        if let Some(kind) = explicit {
            params.push(MethodParam { name, index, kind });
            continue;
        }

        // Check if param name matches a URL placeholder
        if placeholders.contains(&name.to_string()) {
            params.push(MethodParam {
                name,
                index,
                kind: ParamKind::Path(ParamOptions::default()),
            });
            continue;
        }

        unclassified.push((name, index, pat_type));
    }

    match unclassified.len() {
        0 => {}
        1 if http_method.supports_body() => {
            if let Some((name, index, _)) = unclassified.into_iter().next() {
                params.push(MethodParam {
                    name,
                    index,
                    kind: ParamKind::Body,
                });
            }
        }
        1 => {
            if let Some((name, _, pat_type)) = unclassified.first() {
                return Err(syn::Error::new_spanned(
                    pat_type,
                    format!(
                        "parameter '{}' does not match any URL placeholder (available: {:?}) \
                         and {} requests do not support body. \
                         Add #[query] or another explicit attribute.",
                        name,
                        placeholders,
                        http_method.as_str().to_uppercase()
                    ),
                ));
            }
        }
        _ => {
            let names: Vec<_> = unclassified.iter().map(|(n, _, _)| n.to_string()).collect();
            if let Some((_, _, pat_type)) = unclassified.get(1) {
                return Err(syn::Error::new_spanned(
                    pat_type,
                    format!(
                        "multiple unattributed parameters found: {names:?}. \
                         Only one body parameter is allowed. \
                         Add explicit attributes to disambiguate.",
                    ),
                ));
            }
        }
    }

    if let Some(second) = params.iter().filter(|p| p.kind.is_body()).nth(1) {
        return Err(syn::Error::new_spanned(
            &second.name,
            "only one #[body] or #[plain_body] parameter is allowed per method",
        ));
    }

    Ok(params)
}

/// Generate a clean trait without declarest attributes.
fn generate_clean_trait(
    vis: &syn::Visibility,
    name: &Ident,
    methods: &[TraitMethodInfo],
    original: &ItemTrait,
) -> TokenStream {
    let trait_attrs: Vec<_> = original
        .attrs
        .iter()
        .filter(|a| {
            let path = a.path();
            path.is_ident("doc") || path.is_ident("allow") || path.is_ident("cfg")
        })
        .collect();

    let method_signatures: Vec<_> = methods
        .iter()
        .map(|m| {
            let docs = &m.docs;
            let sig = strip_param_attrs(&m.sig);
            quote! {
                #(#docs)*
                #sig;
            }
        })
        .collect();

    quote! {
        #(#trait_attrs)*
        #[allow(async_fn_in_trait)]
        #vis trait #name {
            #(#method_signatures)*
        }
    }
}

fn is_param_attr(attr: &syn::Attribute) -> bool {
    let path = attr.path();
    PARAM_ATTRS.iter().any(|name| path.is_ident(name))
}

/// Strip parameter attributes from a method signature.
fn strip_param_attrs(sig: &syn::Signature) -> syn::Signature {
    let mut clean_sig = sig.clone();
    for arg in &mut clean_sig.inputs {
        if let FnArg::Typed(pat_type) = arg {
            pat_type.attrs.retain(|attr| !is_param_attr(attr));
        }
    }
    clean_sig
}

/// Generate the `<Trait>Descriptors` type holding the method registry.
fn generate_descriptors(
    vis: &syn::Visibility,
    trait_name: &Ident,
    descriptors_name: &Ident,
    methods: &[TraitMethodInfo],
    trait_headers: &[(String, HeaderSpec)],
) -> TokenStream {
    let doc = format!("Method descriptors of [`{trait_name}`].");
    let registrations = methods.iter().map(|m| {
        let mut headers = trait_headers.to_vec();
        headers.extend(m.headers.iter().cloned());
        let descriptor = generate_descriptor(
            &m.sig.ident.to_string(),
            m.http_method,
            &m.path,
            &headers,
            &m.params,
        );
        quote! { .register(#descriptor)? }
    });

    quote! {
        #[doc = #doc]
        #vis struct #descriptors_name;

        impl #descriptors_name {
            /// The registry of every declared method, built on first use.
            pub fn registry() -> ::declarest::Result<&'static ::declarest::Registry> {
                static REGISTRY: ::std::sync::LazyLock<::declarest::Result<::declarest::Registry>> =
                    ::std::sync::LazyLock::new(|| -> ::declarest::Result<::declarest::Registry> {
                        let builder = ::declarest::Registry::builder()
                            #(#registrations)*;
                        Ok(builder.build())
                    });
                REGISTRY
                    .as_ref()
                    .map_err(|e| ::declarest::Error::registry(e.to_string()))
            }
        }
    }
}

/// Generate a blanket implementation for any `RestClient`.
///
/// This generates code like:
/// ```ignore
/// impl<C: RestClient> PetStore for C { ... }
/// ```
fn generate_blanket_impl(
    trait_name: &Ident,
    descriptors_name: &Ident,
    methods: &[TraitMethodInfo],
) -> TokenStream {
    let method_impls: Vec<_> = methods
        .iter()
        .map(|m| {
            let sig = strip_param_attrs(&m.sig);
            let method_name = m.sig.ident.to_string();
            let args = generate_args(&m.params);
            let response_handling = generate_response_handling(analyze_return_type(&m.sig.output));

            quote! {
                #sig {
                    let __descriptor = #descriptors_name::registry()?.get(#method_name)?;
                    #args
                    let response =
                        ::declarest::RestClient::invoke(self, __descriptor, &__args).await?;
                    #response_handling
                }
            }
        })
        .collect();

    quote! {
        impl<__DeclarestC: ::declarest::RestClient> #trait_name for __DeclarestC {
            #(#method_impls)*
        }
    }
}

// Standalone method attribute macros (used on inherent methods of a `RestClient`)

/// Expand an HTTP method attribute on a standalone method.
pub fn expand_http_method(
    method: HttpMethod,
    attr: TokenStream,
    item: TokenStream,
) -> syn::Result<TokenStream> {
    let path: syn::LitStr = parse2(attr)?;
    let method_fn: syn::ImplItemFn = parse2(item)?;
    generate_standalone_method(&method_fn, method, &path.value())
}

/// Expand a custom `#[http("VERB /path")]` attribute on a standalone method.
pub fn expand_custom_http(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let spec: syn::LitStr = parse2(attr)?;
    let (method, path) =
        parse_http_spec(&spec.value()).map_err(|message| syn::Error::new_spanned(&spec, message))?;

    let method_fn: syn::ImplItemFn = parse2(item)?;
    generate_standalone_method(&method_fn, method, &path)
}

/// Generate a standalone method implementation.
///
/// The descriptor is built once in a function-local `LazyLock`. Static
/// headers come from `#[headers(...)]` attributes placed after the verb.
fn generate_standalone_method(
    method_fn: &syn::ImplItemFn,
    http_method: HttpMethod,
    path: &str,
) -> syn::Result<TokenStream> {
    let sig = &method_fn.sig;
    if sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(sig, "declared methods must be `async fn`"));
    }

    let params = parse_method_params(&sig.inputs, path, http_method)?;
    let headers = parse_headers(&method_fn.attrs)?;
    let clean_sig = strip_param_attrs(sig);
    let vis = &method_fn.vis;
    let attrs = method_fn
        .attrs
        .iter()
        .filter(|attr| !METHOD_ATTRS.iter().any(|name| attr.path().is_ident(name)));

    let descriptor = generate_descriptor(
        &sig.ident.to_string(),
        http_method,
        path,
        &headers,
        &params,
    );
    let args = generate_args(&params);
    let response_handling = generate_response_handling(analyze_return_type(&sig.output));

    Ok(quote! {
        #(#attrs)*
        #vis #clean_sig {
            static DESCRIPTOR: ::std::sync::LazyLock<::declarest::Result<::declarest::MethodDescriptor>> =
                ::std::sync::LazyLock::new(|| -> ::declarest::Result<::declarest::MethodDescriptor> {
                    #descriptor.build()
                });
            let __descriptor = DESCRIPTOR
                .as_ref()
                .map_err(|e| ::declarest::Error::registry(e.to_string()))?;
            #args
            let response = ::declarest::RestClient::invoke(self, __descriptor, &__args).await?;
            #response_handling
        }
    })
}
