//! Common types for the IQ codec.

use std::fmt;

/// A namespace-qualified element or attribute name.
///
/// Prefixes never take part in identity: `<a:query xmlns:a='urn:x'/>` and
/// `<query xmlns='urn:x'/>` have the same `QName`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    /// Namespace URI (empty when the name is in no namespace)
    pub ns: String,
    /// Local part of the name
    pub local: String,
}

impl QName {
    /// Create a namespaced name.
    pub fn new(ns: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            ns: ns.into(),
            local: local.into(),
        }
    }

    /// Create a name in no namespace.
    pub fn unqualified(local: impl Into<String>) -> Self {
        Self::new(String::new(), local)
    }

    /// Check whether this name matches the given namespace and local name.
    pub fn is(&self, ns: &str, local: &str) -> bool {
        self.ns == ns && self.local == local
    }
}

/// Clark notation: `{namespace}local`, or just `local` without a namespace.
impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ns.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{{{}}}{}", self.ns, self.local)
        }
    }
}

/// An attribute on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// Qualified attribute name (unprefixed attributes have no namespace)
    pub name: QName,
    /// Unescaped attribute value
    pub value: String,
}

impl Attr {
    /// Create an attribute in no namespace.
    pub fn new(local: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: QName::unqualified(local),
            value: value.into(),
        }
    }

    /// Create a namespaced attribute.
    pub fn namespaced(
        ns: impl Into<String>,
        local: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: QName::new(ns, local),
            value: value.into(),
        }
    }
}

/// IQ operation type (RFC 6120 Section 8.2.3).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IqType {
    /// Request for information
    Get,
    /// Request that provides data or sets state
    Set,
    /// Successful response
    Result,
    /// Failed response carrying a stanza error
    Error,
    /// Any other value, kept verbatim so it survives re-encoding
    Other(String),
}

impl IqType {
    /// Parse a `type` attribute value.
    pub fn from_attr(value: &str) -> Self {
        match value {
            "get" => Self::Get,
            "set" => Self::Set,
            "result" => Self::Result,
            "error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }

    /// Get the `type` attribute value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Result => "result",
            Self::Error => "error",
            Self::Other(value) => value,
        }
    }

    /// Whether this type expects a reply (get or set).
    pub fn is_request(&self) -> bool {
        matches!(self, Self::Get | Self::Set)
    }
}

impl fmt::Display for IqType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
