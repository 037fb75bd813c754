//! Declarative REST clients for Rust.
//!
//! Describe an HTTP API as an annotated trait. The `#[rest_client]` macro
//! records the verb, path, headers and parameter roles of every method once,
//! and implements the trait for any [`RestClient`], which assembles each call
//! into a request and hands it to an injected [`HttpClient`].
//!
//! # Example
//!
//! ```ignore
//! use declarest::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct Pet {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[rest_client]
//! #[headers(accept = "application/json")]
//! pub trait PetApi {
//!     #[get("/pets/{id}")]
//!     async fn get_pet(&self, #[path] id: u64) -> declarest::Result<Pet>;
//!
//!     #[get("/pets")]
//!     async fn find_pets(
//!         &self,
//!         #[query(format = "CSV")] tags: Vec<String>,
//!         #[query(value = 20)] limit: Option<u32>,
//!     ) -> declarest::Result<Vec<Pet>>;
//! }
//!
//! let api = RestApi::new(HyperClient::new(), "https://petstore.example.com/v1")?;
//! let pet = api.get_pet(42).await?;
//! ```
//!
//! Clients can also be described without macros through
//! [`DescriptorBuilder`] and [`Registry`], and invoked with
//! [`RestClient::invoke`].

mod api_client;
mod client;
mod config;
mod connector;
pub mod middleware;
pub mod prelude;

pub use api_client::RestApi;
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use declarest_core::{
    CollectionFormat, ContentType, DescriptorBuilder, Error, HeaderValue, HttpClient, Method,
    MethodDescriptor, ParamDecorator, ParamFactory, ParamKind, ParamOptions, ParameterMetadata,
    PathTemplate, Registry, RegistryBuilder, Request, RequestBuilder, RequestOptions, Response,
    RestClient, Result, StatusCode, assemble, body, from_json, header, param_builder, path_param,
    plain_body, plain_query, query_param, to_arg, to_form, to_json,
};

// Re-export crates for macro-generated code
pub use serde_json;
pub use url;

// Re-export macros
pub use declarest_macro::{delete, get, head, http, options, patch, post, put, rest_client};
