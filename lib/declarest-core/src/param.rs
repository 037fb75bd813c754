//! Parameter metadata and the parameter decorator builder.
//!
//! Each annotated method parameter produces one [`ParameterMetadata`] record,
//! grouped by [`ParamKind`] on the method's descriptor. Records are created
//! through a [`ParamFactory`] (see [`param_builder`]), which validates the
//! collection format as soon as the decorator is built rather than when the
//! method is called.
//!
//! ```
//! use declarest_core::{DescriptorBuilder, Method, ParamKind, ParamOptions, param_builder};
//!
//! let query = param_builder(ParamKind::Query);
//! let tags = query
//!     .build(Some("tags"), ParamOptions::default().format("MULTI"))
//!     .expect("valid format");
//!
//! let mut builder = DescriptorBuilder::new("search", Method::Get, "/search");
//! tags.decorate(&mut builder, 0);
//!
//! assert!(query.build(Some("tags"), ParamOptions::default().format("COMMA")).is_err());
//! ```

use std::fmt;

use serde_json::Value;

use crate::{CollectionFormat, DescriptorBuilder, Result};

/// Where an annotated parameter goes in the assembled request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamKind {
    /// Substituted into a `{placeholder}` of the path template.
    Path,
    /// Appended to the query string under its key.
    Query,
    /// A whole query string (`a=1&b=2`) or an object of pairs.
    PlainQuery,
    /// Serialized as the JSON request body.
    Body,
    /// Sent as a form-encoded request body.
    PlainBody,
    /// Sent as a request header.
    Header,
}

impl ParamKind {
    /// All parameter kinds.
    pub const ALL: [Self; 6] = [
        Self::Path,
        Self::Query,
        Self::PlainQuery,
        Self::Body,
        Self::PlainBody,
        Self::Header,
    ];

    /// Suffix naming this kind's metadata collection.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Path => "_PathParam_parameters",
            Self::Query => "_QueryParam_parameters",
            Self::PlainQuery => "_PlainQuery_parameters",
            Self::Body => "_Body_parameters",
            Self::PlainBody => "_PlainBody_parameters",
            Self::Header => "_Header_parameters",
        }
    }

    /// Label of this kind's collection for a given method, e.g. `getItems_Header_parameters`.
    #[must_use]
    pub fn metadata_key(self, method: &str) -> String {
        format!("{method}{}", self.suffix())
    }

    /// Returns `true` for [`ParamKind::Body`] and [`ParamKind::PlainBody`].
    #[must_use]
    pub const fn is_body(self) -> bool {
        matches!(self, Self::Body | Self::PlainBody)
    }

    /// Whether decorators of this kind carry their suffix as key.
    const fn keyed_by_suffix(self) -> bool {
        matches!(self, Self::PlainQuery | Self::Body | Self::PlainBody)
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::PlainQuery => "plain query",
            Self::Body => "body",
            Self::PlainBody => "plain body",
            Self::Header => "header",
        })
    }
}

/// Metadata recorded for one annotated parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMetadata {
    /// Path placeholder, query key or header name.
    pub key: Option<String>,
    /// Default used when the argument is `null`.
    pub value: Option<Value>,
    /// Position of the parameter in the method signature (receiver excluded).
    pub index: usize,
    /// Collection format for list values.
    pub format: Option<CollectionFormat>,
}

/// Options accepted by a [`ParamFactory`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamOptions<'a> {
    /// Default value.
    pub value: Option<Value>,
    /// Collection format name, validated when the decorator is built.
    pub format: Option<&'a str>,
}

impl<'a> ParamOptions<'a> {
    /// Set the default value.
    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the collection format name.
    #[must_use]
    pub const fn format(mut self, format: &'a str) -> Self {
        self.format = Some(format);
        self
    }
}

/// Produces [`ParamDecorator`]s of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFactory {
    kind: ParamKind,
}

/// Create the decorator factory for a parameter kind.
#[must_use]
pub const fn param_builder(kind: ParamKind) -> ParamFactory {
    ParamFactory { kind }
}

impl ParamFactory {
    /// The kind of decorators built by this factory.
    #[must_use]
    pub const fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Build a decorator.
    ///
    /// Fails immediately with [`crate::Error::UnknownCollectionFormat`] when
    /// `options.format` is not a recognized format name.
    pub fn build(&self, name: Option<&str>, options: ParamOptions<'_>) -> Result<ParamDecorator> {
        let format = CollectionFormat::validate(options.format)?;
        Ok(ParamDecorator {
            kind: self.kind,
            key: name.map(ToString::to_string),
            value: options.value,
            format,
        })
    }

    fn unvalidated(self, name: Option<&str>) -> ParamDecorator {
        let key = if self.kind.keyed_by_suffix() {
            Some(self.kind.suffix())
        } else {
            name
        };
        ParamDecorator {
            kind: self.kind,
            key: key.map(ToString::to_string),
            value: None,
            format: None,
        }
    }
}

/// A validated parameter annotation, ready to be applied at a position.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecorator {
    kind: ParamKind,
    key: Option<String>,
    value: Option<Value>,
    format: Option<CollectionFormat>,
}

impl ParamDecorator {
    /// The parameter kind.
    #[must_use]
    pub const fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Set the default value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set an already-validated collection format.
    #[must_use]
    pub const fn with_format(mut self, format: CollectionFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// The metadata record this decorator produces at `index`.
    #[must_use]
    pub fn metadata(&self, index: usize) -> ParameterMetadata {
        ParameterMetadata {
            key: self.key.clone(),
            value: self.value.clone(),
            index,
            format: self.format,
        }
    }

    /// Apply the decorator to the parameter at `index` of the method being built.
    pub fn decorate(self, target: &mut DescriptorBuilder, index: usize) {
        let kind = self.kind;
        target.push_param(
            kind,
            ParameterMetadata {
                key: self.key,
                value: self.value,
                index,
                format: self.format,
            },
        );
    }
}

/// Path parameter bound to the `{name}` placeholder.
#[must_use]
pub fn path_param(name: &str) -> ParamDecorator {
    param_builder(ParamKind::Path).unvalidated(Some(name))
}

/// Query parameter appended under `name`.
pub fn query_param(name: &str, options: ParamOptions<'_>) -> Result<ParamDecorator> {
    param_builder(ParamKind::Query).build(Some(name), options)
}

/// Plain query string or object of query pairs.
#[must_use]
pub fn plain_query() -> ParamDecorator {
    param_builder(ParamKind::PlainQuery).unvalidated(None)
}

/// JSON request body. Only one body per method.
#[must_use]
pub fn body() -> ParamDecorator {
    param_builder(ParamKind::Body).unvalidated(None)
}

/// Form-encoded request body. Only one body per method.
#[must_use]
pub fn plain_body() -> ParamDecorator {
    param_builder(ParamKind::PlainBody).unvalidated(None)
}

/// Header sent under `name`.
#[must_use]
pub fn header(name: &str) -> ParamDecorator {
    param_builder(ParamKind::Header).unvalidated(Some(name))
}
