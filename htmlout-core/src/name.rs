//! Qualified names for data constructs and markup.
//!
//! The same type names input containers/properties and output
//! elements/attributes. Prefix and namespace are carried through
//! untouched; resolving them is the writer's job.

use std::fmt;

/// A (local name, prefix, namespace URI) triple.
///
/// Prefix and namespace may be empty. Two names are equal iff all
/// three parts are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QName {
    local_name: String,
    prefix: String,
    namespace_uri: String,
}

impl QName {
    /// Unqualified name: no prefix, no namespace.
    pub fn new(local_name: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            prefix: String::new(),
            namespace_uri: String::new(),
        }
    }

    /// Fully qualified name.
    pub fn with_namespace(
        local_name: impl Into<String>,
        prefix: impl Into<String>,
        namespace_uri: impl Into<String>,
    ) -> Self {
        Self {
            local_name: local_name.into(),
            prefix: prefix.into(),
            namespace_uri: namespace_uri.into(),
        }
    }

    #[inline]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[inline]
    pub fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    /// True when the local name is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.local_name.is_empty()
    }

    /// True when either a prefix or a namespace is set.
    #[inline]
    pub fn is_qualified(&self) -> bool {
        !self.prefix.is_empty() || !self.namespace_uri.is_empty()
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix.is_empty() {
            f.write_str(&self.local_name)
        } else {
            write!(f, "{}:{}", self.prefix, self.local_name)
        }
    }
}

impl From<&str> for QName {
    fn from(local_name: &str) -> Self {
        QName::new(local_name)
    }
}

impl From<String> for QName {
    fn from(local_name: String) -> Self {
        QName::new(local_name)
    }
}
