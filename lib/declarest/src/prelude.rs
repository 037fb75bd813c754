//! Prelude module for convenient imports.
//!
//! ```ignore
//! use declarest::prelude::*;
//! ```

pub use crate::{
    ClientConfig, CollectionFormat, DescriptorBuilder, Error, HttpClient, HyperClient, Method,
    ParamOptions, Registry, Request, Response, RestApi, RestClient, Result, StatusCode, delete,
    get, head, http, options, patch, post, put, rest_client,
};
pub use serde::{Deserialize, Serialize};
