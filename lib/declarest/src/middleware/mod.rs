//! Tower middleware layers for [`crate::HyperClient`].
//!
//! Layers wrap the transport service through [`crate::HyperClientBuilder::layer`].
//! The last layer added is the first to see a request.
//!
//! ```ignore
//! use declarest::HyperClient;
//! use declarest::middleware::{LoggingLayer, SetHeaderLayer};
//!
//! let client = HyperClient::builder()
//!     .layer(SetHeaderLayer::bearer("my-token"))
//!     .layer(LoggingLayer::debug())
//!     .build();
//! ```

mod logging;
mod set_header;

pub use logging::{LogLevel, Logging, LoggingLayer};
pub use set_header::{SetHeader, SetHeaderLayer};

pub use tower::{Layer, ServiceBuilder};
