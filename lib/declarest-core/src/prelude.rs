//! Prelude module for convenient imports.
//!
//! ```ignore
//! use declarest_core::prelude::*;
//! ```

pub use crate::{
    CollectionFormat, DescriptorBuilder, Error, HttpClient, Method, MethodDescriptor, ParamKind,
    ParamOptions, Registry, Request, RequestOptions, Response, RestClient, Result,
};
