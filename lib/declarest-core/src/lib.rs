//! Core types and traits for the declarest declarative REST client.
//!
//! This crate holds everything a declared client needs at run time:
//! - [`CollectionFormat`] - how list values are encoded into query strings
//! - [`ParameterMetadata`], [`ParamKind`] and [`param_builder`] - parameter annotations
//! - [`MethodDescriptor`] and [`Registry`] - per-method metadata, built once
//! - [`RestClient`] - the client base that assembles and dispatches requests
//! - [`HttpClient`] - the injected transport
//! - [`Request`], [`Response`], [`Error`] and [`Result`]

mod assemble;
mod body;
mod client;
mod descriptor;
mod error;
mod format;
mod method;
mod param;
mod path_template;
pub mod prelude;
mod registry;
mod request;
mod response;
mod rest_client;

pub use assemble::{assemble, to_arg};
pub use body::{ContentType, from_json, to_form, to_json};
pub use client::HttpClient;
pub use descriptor::{DescriptorBuilder, HeaderValue, MethodDescriptor};
pub use error::{Error, Result};
pub use format::CollectionFormat;
pub use method::Method;
pub use param::{
    ParamDecorator, ParamFactory, ParamKind, ParamOptions, ParameterMetadata, body, header,
    param_builder, path_param, plain_body, plain_query, query_param,
};
pub use path_template::PathTemplate;
pub use registry::{Registry, RegistryBuilder};
pub use request::{Request, RequestBuilder, RequestOptions};
pub use response::Response;
pub use rest_client::RestClient;

// Re-export http crate status codes
pub use http::StatusCode;
