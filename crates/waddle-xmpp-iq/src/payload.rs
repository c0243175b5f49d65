//! The IQ payload capability.
//!
//! Anything carried as a first-level child of an `<iq/>` implements
//! [`IqPayload`]. Known payloads get their own typed struct; everything else
//! decodes into a generic [`Node`](crate::Node).

use std::any::Any;
use std::fmt;

use crate::parser::{StartTag, XmlReader};
use crate::writer::XmlWriter;
use crate::{CodecError, QName};

/// A typed IQ payload.
///
/// Implementors only need `Clone + Debug` besides the methods below; the
/// object-safe helpers in [`AnyPayload`] are provided by a blanket impl.
pub trait IqPayload: AnyPayload + fmt::Debug + Send + Sync + 'static {
    /// Qualified name of the element this payload is written as.
    fn name(&self) -> QName;

    /// Fill `self` from the element opened by `start`.
    ///
    /// The reader is positioned right after the start tag; implementations
    /// must consume everything through the matching end tag.
    fn decode(&mut self, reader: &mut XmlReader<'_>, start: &StartTag) -> Result<(), CodecError>;

    /// Write the payload as one complete element.
    fn encode(&self, writer: &mut XmlWriter) -> Result<(), CodecError>;
}

/// Object-safe cloning and downcasting for boxed payloads.
pub trait AnyPayload {
    /// Clone into a new box.
    fn clone_payload(&self) -> Box<dyn IqPayload>;
    /// Borrow as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T: IqPayload + Clone> AnyPayload for T {
    fn clone_payload(&self) -> Box<dyn IqPayload> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Clone for Box<dyn IqPayload> {
    fn clone(&self) -> Self {
        self.clone_payload()
    }
}

impl dyn IqPayload {
    /// Whether the payload is of concrete type `T`.
    pub fn is<T: IqPayload>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrow the payload as concrete type `T`.
    pub fn downcast_ref<T: IqPayload>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Serialize this payload on its own.
    pub fn to_xml(&self) -> Result<String, CodecError> {
        let mut writer = XmlWriter::new();
        self.encode(&mut writer)?;
        writer.into_string()
    }
}
