//! Error types for the IQ codec.

use std::str::FromStr;

use thiserror::Error;

/// Errors raised while reading or writing IQ markup.
///
/// Application-level failures reported to a remote peer are not errors here;
/// they travel as a [`StanzaError`](crate::StanzaError) inside an IQ of type
/// `error`.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Malformed XML from the underlying tokenizer
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute list
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// IO error while writing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialized output or CDATA was not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The stream ended before the current element was closed
    #[error("Unexpected end of stream")]
    UnexpectedEof,

    /// An end tag closed an element the caller never started
    #[error("Unexpected end tag: {0}")]
    UnexpectedEnd(String),

    /// An element or attribute used a prefix with no namespace binding
    #[error("Unbound namespace prefix: {0}")]
    UnboundPrefix(String),

    /// Element nesting went past the configured limit
    #[error("Element nesting exceeds limit of {0}")]
    TooDeep(usize),

    /// Writer misuse (end without start, unclosed elements)
    #[error("Unbalanced writer: {0}")]
    Unbalanced(String),

    /// The process-wide payload registry was already installed
    #[error("Payload registry already installed")]
    RegistryInstalled,
}

impl CodecError {
    /// Create a new unbalanced writer error.
    pub fn unbalanced(msg: impl Into<String>) -> Self {
        Self::Unbalanced(msg.into())
    }
}

/// Returned when a condition or type string is not one defined by RFC 6120.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown stanza error value: {0}")]
pub struct UnknownErrorValue(pub String);

/// XMPP stanza error conditions (RFC 6120 Section 8.3.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StanzaErrorCondition {
    /// Bad request (malformed XML, etc.)
    BadRequest,
    /// Conflict (e.g., resource already bound)
    Conflict,
    /// Feature not implemented
    FeatureNotImplemented,
    /// Forbidden (permission denied)
    Forbidden,
    /// Gone (entity no longer available)
    Gone,
    /// Internal server error
    InternalServerError,
    /// Item not found
    ItemNotFound,
    /// JID malformed
    JidMalformed,
    /// Not acceptable
    NotAcceptable,
    /// Not allowed
    NotAllowed,
    /// Not authorized
    NotAuthorized,
    /// Policy violation
    PolicyViolation,
    /// Recipient unavailable
    RecipientUnavailable,
    /// Redirect
    Redirect,
    /// Registration required
    RegistrationRequired,
    /// Remote server not found
    RemoteServerNotFound,
    /// Remote server timeout
    RemoteServerTimeout,
    /// Resource constraint
    ResourceConstraint,
    /// Service unavailable
    ServiceUnavailable,
    /// Subscription required
    SubscriptionRequired,
    /// Undefined condition
    UndefinedCondition,
    /// Unexpected request
    UnexpectedRequest,
}

impl StanzaErrorCondition {
    /// Every defined condition, in RFC order.
    pub const ALL: [StanzaErrorCondition; 22] = [
        Self::BadRequest,
        Self::Conflict,
        Self::FeatureNotImplemented,
        Self::Forbidden,
        Self::Gone,
        Self::InternalServerError,
        Self::ItemNotFound,
        Self::JidMalformed,
        Self::NotAcceptable,
        Self::NotAllowed,
        Self::NotAuthorized,
        Self::PolicyViolation,
        Self::RecipientUnavailable,
        Self::Redirect,
        Self::RegistrationRequired,
        Self::RemoteServerNotFound,
        Self::RemoteServerTimeout,
        Self::ResourceConstraint,
        Self::ServiceUnavailable,
        Self::SubscriptionRequired,
        Self::UndefinedCondition,
        Self::UnexpectedRequest,
    ];

    /// Get the element name for this condition.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad-request",
            Self::Conflict => "conflict",
            Self::FeatureNotImplemented => "feature-not-implemented",
            Self::Forbidden => "forbidden",
            Self::Gone => "gone",
            Self::InternalServerError => "internal-server-error",
            Self::ItemNotFound => "item-not-found",
            Self::JidMalformed => "jid-malformed",
            Self::NotAcceptable => "not-acceptable",
            Self::NotAllowed => "not-allowed",
            Self::NotAuthorized => "not-authorized",
            Self::PolicyViolation => "policy-violation",
            Self::RecipientUnavailable => "recipient-unavailable",
            Self::Redirect => "redirect",
            Self::RegistrationRequired => "registration-required",
            Self::RemoteServerNotFound => "remote-server-not-found",
            Self::RemoteServerTimeout => "remote-server-timeout",
            Self::ResourceConstraint => "resource-constraint",
            Self::ServiceUnavailable => "service-unavailable",
            Self::SubscriptionRequired => "subscription-required",
            Self::UndefinedCondition => "undefined-condition",
            Self::UnexpectedRequest => "unexpected-request",
        }
    }

    /// Legacy numeric error code for this condition (XEP-0086).
    ///
    /// Older peers only understand the `code` attribute, and the codec omits
    /// the whole error element when the code is zero.
    pub fn legacy_code(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Conflict => 409,
            Self::FeatureNotImplemented => 501,
            Self::Forbidden => 403,
            Self::Gone => 302,
            Self::InternalServerError => 500,
            Self::ItemNotFound => 404,
            Self::JidMalformed => 400,
            Self::NotAcceptable => 406,
            Self::NotAllowed => 405,
            Self::NotAuthorized => 401,
            // Not in the XEP-0086 table; 406 is the nearest legacy meaning.
            Self::PolicyViolation => 406,
            Self::RecipientUnavailable => 404,
            Self::Redirect => 302,
            Self::RegistrationRequired => 407,
            Self::RemoteServerNotFound => 404,
            Self::RemoteServerTimeout => 504,
            Self::ResourceConstraint => 500,
            Self::ServiceUnavailable => 503,
            Self::SubscriptionRequired => 407,
            Self::UndefinedCondition => 500,
            Self::UnexpectedRequest => 400,
        }
    }

    /// Default error type for this condition (RFC 6120 Section 8.3.3).
    pub fn default_type(&self) -> StanzaErrorType {
        match self {
            Self::BadRequest
            | Self::JidMalformed
            | Self::NotAcceptable
            | Self::PolicyViolation
            | Self::Redirect => StanzaErrorType::Modify,
            Self::Forbidden
            | Self::NotAuthorized
            | Self::RegistrationRequired
            | Self::SubscriptionRequired => StanzaErrorType::Auth,
            Self::RecipientUnavailable
            | Self::RemoteServerTimeout
            | Self::ResourceConstraint
            | Self::UnexpectedRequest => StanzaErrorType::Wait,
            Self::Conflict
            | Self::FeatureNotImplemented
            | Self::Gone
            | Self::InternalServerError
            | Self::ItemNotFound
            | Self::NotAllowed
            | Self::RemoteServerNotFound
            | Self::ServiceUnavailable
            | Self::UndefinedCondition => StanzaErrorType::Cancel,
        }
    }
}

impl FromStr for StanzaErrorCondition {
    type Err = UnknownErrorValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownErrorValue(s.to_string()))
    }
}

impl std::fmt::Display for StanzaErrorCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// XMPP stanza error types (RFC 6120 Section 8.3.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StanzaErrorType {
    /// Retry after providing credentials
    Auth,
    /// Do not retry (unrecoverable error)
    Cancel,
    /// Proceed (the condition was only a warning)
    Continue,
    /// Retry after changing the data sent
    Modify,
    /// Retry after waiting (temporary error)
    Wait,
}

impl StanzaErrorType {
    /// Get the type attribute value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Cancel => "cancel",
            Self::Continue => "continue",
            Self::Modify => "modify",
            Self::Wait => "wait",
        }
    }
}

impl FromStr for StanzaErrorType {
    type Err = UnknownErrorValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auth" => Ok(Self::Auth),
            "cancel" => Ok(Self::Cancel),
            "continue" => Ok(Self::Continue),
            "modify" => Ok(Self::Modify),
            "wait" => Ok(Self::Wait),
            other => Err(UnknownErrorValue(other.to_string())),
        }
    }
}

impl std::fmt::Display for StanzaErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
