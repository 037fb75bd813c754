//! Collection formats for multi-valued query parameters.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// How an ordered sequence is encoded into one or more query-string entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionFormat {
    /// Comma separated values: `foo,bar`.
    Csv,
    /// Space separated values: `foo bar`.
    Ssv,
    /// Tab separated values: `foo\tbar`.
    Tsv,
    /// Pipe separated values: `foo|bar`.
    Pipes,
    /// One parameter instance per value: `foo=bar&foo=baz`.
    Multi,
}

impl CollectionFormat {
    /// All recognized formats.
    pub const ALL: [Self; 5] = [Self::Csv, Self::Ssv, Self::Tsv, Self::Pipes, Self::Multi];

    /// The canonical name used when declaring the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Ssv => "SSV",
            Self::Tsv => "TSV",
            Self::Pipes => "PIPES",
            Self::Multi => "MULTI",
        }
    }

    /// The separator joining the values, `None` for [`CollectionFormat::Multi`].
    #[must_use]
    pub const fn separator(self) -> Option<&'static str> {
        match self {
            Self::Csv => Some(","),
            Self::Ssv => Some(" "),
            Self::Tsv => Some("\t"),
            Self::Pipes => Some("|"),
            Self::Multi => None,
        }
    }

    /// Validate an optional format declaration.
    ///
    /// An absent or empty string means no format was declared.
    pub fn validate(format: Option<&str>) -> crate::Result<Option<Self>> {
        match format {
            None | Some("") => Ok(None),
            Some(name) => name.parse().map(Some),
        }
    }

    /// Encode `values` under `key` as query pairs.
    #[must_use]
    pub fn encode(self, key: &str, values: &[String]) -> Vec<(String, String)> {
        match self.separator() {
            None => values
                .iter()
                .map(|value| (key.to_string(), value.clone()))
                .collect(),
            Some(_) if values.is_empty() => Vec::new(),
            Some(sep) => vec![(key.to_string(), values.join(sep))],
        }
    }
}

impl FromStr for CollectionFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| Error::UnknownCollectionFormat(s.to_string()))
    }
}

impl fmt::Display for CollectionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
