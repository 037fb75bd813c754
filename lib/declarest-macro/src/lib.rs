//! Procedural macros for the declarest declarative REST client.
//!
//! This crate provides the proc-macros for declaring REST clients:
//! - `#[rest_client]` - Turn a trait into a declared client
//! - `#[get]`, `#[post]`, `#[put]`, `#[delete]`, `#[patch]`, `#[head]`, `#[options]` - HTTP method attributes
//! - `#[http("VERB /path")]` - Custom HTTP method attribute
//! - `#[headers(...)]` - Static headers, on the trait or on a method
//! - `#[path]`, `#[query]`, `#[plain_query]`, `#[header]`, `#[body]`, `#[plain_body]` - Parameter attributes
//!
//! # Example
//!
//! ```ignore
//! use declarest::prelude::*;
//!
//! #[rest_client]
//! #[headers(accept = "application/json")]
//! pub trait PetStore {
//!     #[get("/pets")]
//!     async fn list_pets(
//!         &self,
//!         #[query("tags", format = "MULTI")] tags: Vec<String>,
//!         #[query("limit", value = 20)] limit: Option<u32>,
//!     ) -> declarest::Result<Vec<Pet>>;
//! }
//!
//! // Any `RestClient` implements the trait:
//! let api = RestApi::new(HyperClient::new(), "https://petstore.example.com/v1")?;
//! let pets = api.list_pets(vec!["dog".into()], None).await?;
//! ```

mod attrs;
mod codegen;
mod expand;

use proc_macro::TokenStream;

use crate::attrs::HttpMethod;

/// Turn a trait into a declared REST client.
///
/// This macro generates:
/// - A clean trait (without declarest attributes)
/// - A `<Trait>Descriptors` type whose `registry()` holds the metadata of
///   every method, built once on first use
/// - An implementation of the trait for every type implementing `RestClient`
///
/// Each generated method serializes its arguments, assembles the request from
/// the method's metadata and sends it through the client's `HttpClient`.
/// The return type decides what happens with the response:
/// - `Result<Response>` - returned unchanged, whatever the status
/// - `Result<()>` - non-2xx statuses become `Error::Http`
/// - `Result<T>` - non-2xx statuses become `Error::Http`, otherwise the body is decoded as JSON
///
/// # Attributes
///
/// - `user_agent` (optional): `User-Agent` header sent by every method
///
/// # Example
///
/// ```ignore
/// #[rest_client(user_agent = "petstore/1.0")]
/// #[headers(accept = "application/json", accept_language = ["en", "nl"])]
/// pub trait PetStore {
///     #[get("/pets/{id}")]
///     async fn get_pet(&self, id: u64) -> declarest::Result<Pet>;
/// }
/// ```
#[proc_macro_attribute]
pub fn rest_client(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand::expand_rest_client(attr.into(), item.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Mark a method as a GET request.
///
/// Inside a `#[rest_client]` trait the attribute is read by `rest_client`.
/// On an inherent method of a `RestClient` type it generates the body.
///
/// # Example
///
/// ```ignore
/// #[get("/pets/{id}")]
/// async fn get_pet(&self, id: u64) -> declarest::Result<Pet>;
/// ```
#[proc_macro_attribute]
pub fn get(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand::expand_http_method(HttpMethod::Get, attr.into(), item.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Mark a method as a POST request.
///
/// Inside a `#[rest_client]` trait the attribute is read by `rest_client`.
/// On an inherent method of a `RestClient` type it generates the body.
///
/// # Example
///
/// ```ignore
/// #[post("/pets")]
/// async fn create_pet(&self, #[body] pet: &NewPet) -> declarest::Result<Pet>;
/// ```
#[proc_macro_attribute]
pub fn post(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand::expand_http_method(HttpMethod::Post, attr.into(), item.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Mark a method as a PUT request.
///
/// Inside a `#[rest_client]` trait the attribute is read by `rest_client`.
/// On an inherent method of a `RestClient` type it generates the body.
///
/// # Example
///
/// ```ignore
/// #[put("/pets/{id}")]
/// async fn update_pet(&self, id: u64, #[body] pet: &NewPet) -> declarest::Result<Pet>;
/// ```
#[proc_macro_attribute]
pub fn put(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand::expand_http_method(HttpMethod::Put, attr.into(), item.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Mark a method as a DELETE request.
///
/// Inside a `#[rest_client]` trait the attribute is read by `rest_client`.
/// On an inherent method of a `RestClient` type it generates the body.
///
/// # Example
///
/// ```ignore
/// #[delete("/pets/{id}")]
/// async fn delete_pet(&self, id: u64) -> declarest::Result<()>;
/// ```
#[proc_macro_attribute]
pub fn delete(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand::expand_http_method(HttpMethod::Delete, attr.into(), item.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Mark a method as a PATCH request.
///
/// Inside a `#[rest_client]` trait the attribute is read by `rest_client`.
/// On an inherent method of a `RestClient` type it generates the body.
///
/// # Example
///
/// ```ignore
/// #[patch("/pets/{id}")]
/// async fn rename_pet(&self, id: u64, #[plain_body] name: &str) -> declarest::Result<Pet>;
/// ```
#[proc_macro_attribute]
pub fn patch(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand::expand_http_method(HttpMethod::Patch, attr.into(), item.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Mark a method as a HEAD request.
///
/// Inside a `#[rest_client]` trait the attribute is read by `rest_client`.
/// On an inherent method of a `RestClient` type it generates the body.
///
/// # Example
///
/// ```ignore
/// #[head("/pets/{id}")]
/// async fn pet_exists(&self, id: u64) -> declarest::Result<declarest::Response>;
/// ```
#[proc_macro_attribute]
pub fn head(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand::expand_http_method(HttpMethod::Head, attr.into(), item.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Mark a method as an OPTIONS request.
///
/// Inside a `#[rest_client]` trait the attribute is read by `rest_client`.
/// On an inherent method of a `RestClient` type it generates the body.
///
/// # Example
///
/// ```ignore
/// #[options("/pets")]
/// async fn pet_options(&self) -> declarest::Result<declarest::Response>;
/// ```
#[proc_macro_attribute]
pub fn options(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand::expand_http_method(HttpMethod::Options, attr.into(), item.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Mark a method with a custom HTTP method and path.
///
/// This is useful when the verb and path come as one string.
///
/// # Example
///
/// ```ignore
/// #[http("GET /pets/{id}")]
/// async fn get_pet(&self, id: u64) -> declarest::Result<Pet>;
///
/// #[http("OPTIONS /pets")]
/// async fn pet_options(&self) -> declarest::Result<declarest::Response>;
/// ```
#[proc_macro_attribute]
pub fn http(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand::expand_custom_http(attr.into(), item.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
