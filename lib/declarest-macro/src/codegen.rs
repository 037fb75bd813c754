//! Code generation for declarest proc-macros.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Type;

use crate::attrs::{HeaderSpec, HttpMethod, MethodParam, ParamKind, ParamOptions};

/// Generate the `DescriptorBuilder` expression describing one method.
///
/// Query decorators go through the runtime parameter builder and may fail,
/// so the expression must be used where `?` returns a `declarest::Result`.
pub fn generate_descriptor(
    method_name: &str,
    http_method: HttpMethod,
    path: &str,
    headers: &[(String, HeaderSpec)],
    params: &[MethodParam],
) -> TokenStream {
    let verb = format_ident!("{}", http_method.as_str());

    let header_calls = headers.iter().map(|(name, value)| match value {
        HeaderSpec::Single(value) => quote! { .header(#name, #value) },
        HeaderSpec::List(values) => quote! { .header(#name, [#(#values),*]) },
    });

    let param_calls = params.iter().map(|param| {
        let index = param.index;
        let decorator = generate_decorator(param);
        quote! { .param(#index, #decorator) }
    });

    quote! {
        ::declarest::DescriptorBuilder::new(#method_name, ::declarest::Method::#verb, #path)
            #(#header_calls)*
            #(#param_calls)*
    }
}

/// Generate the `ParamDecorator` expression for one parameter.
fn generate_decorator(param: &MethodParam) -> TokenStream {
    let key = param.key();
    match &param.kind {
        ParamKind::Path(options) => {
            let default = generate_default(options);
            quote! { ::declarest::path_param(#key) #default }
        }
        ParamKind::Query(options) => {
            let format = options.format.map(|format| {
                let name = format.as_str();
                quote! { .format(#name) }
            });
            let default = generate_default(options);
            quote! {
                ::declarest::param_builder(::declarest::ParamKind::Query)
                    .build(
                        ::core::option::Option::Some(#key),
                        ::declarest::ParamOptions::default() #format,
                    )?
                    #default
            }
        }
        ParamKind::Header(options) => {
            let default = generate_default(options);
            quote! { ::declarest::header(#key) #default }
        }
        ParamKind::PlainQuery => quote! { ::declarest::plain_query() },
        ParamKind::Body => quote! { ::declarest::body() },
        ParamKind::PlainBody => quote! { ::declarest::plain_body() },
    }
}

fn generate_default(options: &ParamOptions) -> Option<TokenStream> {
    options.value.as_ref().map(|value| {
        quote! { .with_value(::declarest::serde_json::json!(#value)) }
    })
}

/// Generate the argument array passed to `RestClient::invoke`, in signature order.
pub fn generate_args(params: &[MethodParam]) -> TokenStream {
    let mut ordered: Vec<_> = params.iter().collect();
    ordered.sort_by_key(|param| param.index);
    let count = ordered.len();
    let values = ordered.iter().map(|param| {
        let name = &param.name;
        quote! { ::declarest::to_arg(&#name)? }
    });

    quote! {
        let __args: [::declarest::serde_json::Value; #count] = [#(#values),*];
    }
}

/// The kind of return type for a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnTypeKind {
    /// JSON deserialization (default): `Result<T>`
    Json,
    /// Raw response: `Result<Response>`
    RawResponse,
    /// Unit type: `Result<()>`
    Unit,
}

/// Analyze the return type to determine how to handle the response.
///
/// Extracts the inner type from `Result<T>` and determines:
/// - `RawResponse`: If the type is `Response`
/// - `Unit`: If the type is `()`
/// - `Json`: Everything else (default - deserialize JSON)
pub fn analyze_return_type(return_type: &syn::ReturnType) -> ReturnTypeKind {
    let ty = match return_type {
        syn::ReturnType::Default => return ReturnTypeKind::Unit,
        syn::ReturnType::Type(_, ty) => ty.as_ref(),
    };

    // Unwrap Result<T> to get T
    let inner = unwrap_result_type(ty).unwrap_or(ty);

    if is_unit_type(inner) {
        return ReturnTypeKind::Unit;
    }

    if is_response_type(inner) {
        return ReturnTypeKind::RawResponse;
    }

    ReturnTypeKind::Json
}

/// Generate response handling code for a return type kind.
///
/// The response is in scope as `response`.
pub fn generate_response_handling(return_type_kind: ReturnTypeKind) -> TokenStream {
    match return_type_kind {
        // Raw response: returned as received, whatever the status
        ReturnTypeKind::RawResponse => quote! {
            Ok(response)
        },
        ReturnTypeKind::Unit => quote! {
            response.error_for_status()?;
            Ok(())
        },
        ReturnTypeKind::Json => quote! {
            Ok(response.error_for_status()?.json()?)
        },
    }
}

/// Check if a type is the unit type `()`.
pub fn is_unit_type(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(tuple) if tuple.elems.is_empty())
}

/// Check if a type is `Response`.
fn is_response_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
    {
        return segment.ident == "Response";
    }
    false
}

/// Unwrap `Result<T>` to get `T`, returns None if not a Result.
fn unwrap_result_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
        && segment.ident == "Result"
        && let syn::PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(syn::GenericArgument::Type(inner)) = args.args.first()
    {
        return Some(inner);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn compact(tokens: &TokenStream) -> String {
        tokens.to_string().replace(' ', "")
    }

    fn param(name: &str, index: usize, kind: ParamKind) -> MethodParam {
        MethodParam {
            name: format_ident!("{}", name),
            index,
            kind,
        }
    }

    #[test]
    fn return_type_kinds() {
        let unit: syn::ReturnType = parse_quote!(-> declarest::Result<()>);
        let raw: syn::ReturnType = parse_quote!(-> declarest::Result<declarest::Response>);
        let json: syn::ReturnType = parse_quote!(-> declarest::Result<Vec<User>>);

        assert_eq!(analyze_return_type(&unit), ReturnTypeKind::Unit);
        assert_eq!(analyze_return_type(&raw), ReturnTypeKind::RawResponse);
        assert_eq!(analyze_return_type(&json), ReturnTypeKind::Json);
        assert_eq!(
            analyze_return_type(&syn::ReturnType::Default),
            ReturnTypeKind::Unit
        );
    }

    #[test]
    fn descriptor_records_headers_and_params() {
        let headers = vec![
            (
                "accept".to_string(),
                HeaderSpec::Single("application/json".to_string()),
            ),
            (
                "lang".to_string(),
                HeaderSpec::List(vec!["en".to_string(), "nl".to_string()]),
            ),
        ];
        let params = vec![
            param("id", 0, ParamKind::Path(ParamOptions::default())),
            param("payload", 1, ParamKind::Body),
        ];

        let tokens = compact(&generate_descriptor(
            "update",
            HttpMethod::Put,
            "/items/{id}",
            &headers,
            &params,
        ));

        assert!(tokens.contains("Method::Put"), "{tokens}");
        assert!(tokens.contains(r#".header("lang",["en","nl"])"#), "{tokens}");
        assert!(tokens.contains(r#"path_param("id")"#), "{tokens}");
        assert!(tokens.contains(".param(1usize,::declarest::body())"), "{tokens}");
    }

    #[test]
    fn query_decorator_carries_format_and_default() {
        let options = ParamOptions {
            name: Some("tags".to_string()),
            format: Some(crate::attrs::CollectionFormat::Csv),
            value: Some(parse_quote!(["a", "b"])),
        };
        let tokens = compact(&generate_decorator(&param("t", 0, ParamKind::Query(options))));

        assert!(tokens.contains(r#"Some("tags")"#), "{tokens}");
        assert!(tokens.contains(r#".format("CSV")"#), "{tokens}");
        assert!(tokens.contains(r#"json!(["a","b"])"#), "{tokens}");
    }

    #[test]
    fn args_follow_signature_order() {
        let params = vec![
            param("payload", 1, ParamKind::Body),
            param("id", 0, ParamKind::Path(ParamOptions::default())),
        ];
        let tokens = compact(&generate_args(&params));
        let id = tokens.find("&id").expect("id arg");
        let payload = tokens.find("&payload").expect("payload arg");
        assert!(id < payload, "{tokens}");
        assert!(tokens.contains(";2usize]"), "{tokens}");
    }
}
