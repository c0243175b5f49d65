//! Stanza error element (RFC 6120 Section 8.3).
//!
//! ```xml
//! <error code='404' type='cancel'>
//!   <item-not-found xmlns='urn:ietf:params:xml:ns:xmpp-stanzas'/>
//!   <text xmlns='urn:ietf:params:xml:ns:xmpp-stanzas'>No such node</text>
//! </error>
//! ```
//!
//! A zero `code` means "no error": such a value encodes to nothing at all.

use tracing::trace;

use crate::parser::{ns, StartTag, Token, XmlReader};
use crate::writer::XmlWriter;
use crate::{Attr, CodecError, Node, QName, StanzaErrorCondition, StanzaErrorType};

/// Error details attached to an IQ of type `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StanzaError {
    /// Legacy numeric code; 0 means the error is absent
    pub code: i64,
    /// The `type` attribute, conventionally one of [`StanzaErrorType`]
    pub error_type: String,
    /// Local name of the defined-condition element
    pub reason: String,
    /// Optional human-readable description
    pub text: String,
}

impl StanzaError {
    /// Create an error from raw values.
    pub fn new(code: i64, error_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code,
            error_type: error_type.into(),
            reason: reason.into(),
            text: String::new(),
        }
    }

    /// Create an error for a defined condition, filling in its legacy code.
    pub fn from_condition(condition: StanzaErrorCondition, error_type: StanzaErrorType) -> Self {
        Self::new(i64::from(condition.legacy_code()), error_type.as_str(), condition.as_str())
    }

    /// Set the human-readable text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Whether this value is an actual error (non-zero code).
    pub fn is_present(&self) -> bool {
        self.code != 0
    }

    /// The reason as a defined condition, if it is one.
    pub fn condition(&self) -> Option<StanzaErrorCondition> {
        self.reason.parse().ok()
    }

    /// The `type` attribute as a defined error type, if it is one.
    pub fn kind(&self) -> Option<StanzaErrorType> {
        self.error_type.parse().ok()
    }

    /// Decode the `<error/>` element opened by `start`, through its end tag.
    ///
    /// A `code` that is not a plain decimal integer (including one with
    /// surrounding whitespace) is ignored. Children outside the stanza error
    /// namespace are dropped; when several condition elements are present
    /// the last one wins.
    pub fn read(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self, CodecError> {
        let mut error = StanzaError::default();

        for attr in start.attrs.iter().filter(|a| a.name.ns.is_empty()) {
            match attr.name.local.as_str() {
                "code" => {
                    if let Ok(code) = attr.value.parse() {
                        error.code = code;
                    }
                }
                "type" => error.error_type = attr.value.clone(),
                _ => {}
            }
        }

        loop {
            match reader.next_token()? {
                Token::Start(tag) => {
                    let child = Node::read(reader, &tag)?;
                    if child.name.is(ns::STANZAS, "text") {
                        error.text = child.content;
                    } else if child.name.ns == ns::STANZAS {
                        error.reason = child.name.local;
                    } else {
                        trace!(name = %child.name, "Dropping unknown stanza error child");
                    }
                }
                Token::Text(_) => {}
                Token::End(_) => break,
            }
        }

        Ok(error)
    }

    /// Write the `<error/>` element, or nothing when the code is zero.
    ///
    /// The element takes the namespace in scope, i.e. that of the enclosing
    /// stanza.
    pub fn write(&self, writer: &mut XmlWriter) -> Result<(), CodecError> {
        if !self.is_present() {
            return Ok(());
        }

        let mut attrs = vec![Attr::new("code", self.code.to_string())];
        if !self.error_type.is_empty() {
            attrs.push(Attr::new("type", self.error_type.clone()));
        }

        let name = QName::new(writer.default_namespace(), "error");
        writer.start(&name, &attrs)?;

        if !self.reason.is_empty() {
            writer.empty(&QName::new(ns::STANZAS, self.reason.clone()), &[])?;
        }

        if !self.text.is_empty() {
            writer.text_element(&QName::new(ns::STANZAS, "text"), &self.text)?;
        }

        writer.end()
    }
}

impl std::fmt::Display for StanzaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.reason, self.code)?;
        if !self.text.is_empty() {
            write!(f, ": {}", self.text)?;
        }
        Ok(())
    }
}
