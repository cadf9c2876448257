//! Dataset identity value

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Extra key-value attributes attached to a dataset.
///
/// Ordered so that equality and hashing do not depend on insertion order.
pub type Extra = BTreeMap<String, String>;

/// Immutable identity of an external resource.
///
/// Two datasets are equal iff both the URI and the extras are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Dataset {
    uri: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    extra: Extra,
}

impl Dataset {
    /// Create a dataset with no extras
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            extra: Extra::new(),
        }
    }

    /// Replace the extras
    pub fn with_extra(mut self, extra: Extra) -> Self {
        self.extra = extra;
        self
    }

    /// Add a single extra attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn extra(&self) -> &Extra {
        &self.extra
    }

    /// Lowercase URI scheme, if the URI is absolute
    pub fn scheme(&self) -> Option<String> {
        parse_scheme(&self.uri)
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)
    }
}

/// Extract the scheme of an absolute URI. `Url` normalizes it to lowercase.
pub(crate) fn parse_scheme(uri: &str) -> Option<String> {
    Url::parse(uri).ok().map(|url| url.scheme().to_string())
}
