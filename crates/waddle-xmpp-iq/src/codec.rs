//! Configured entry point for decoding and encoding IQs.

use std::io::BufRead;
use std::sync::Arc;

use crate::config::CodecConfig;
use crate::iq::Iq;
use crate::parser::XmlReader;
use crate::registry::PayloadRegistry;
use crate::writer::XmlWriter;
use crate::CodecError;

/// IQ codec bound to a configuration and a payload registry.
///
/// Cheap to clone; clones share the registry.
#[derive(Debug, Clone)]
pub struct IqCodec {
    config: CodecConfig,
    registry: Arc<PayloadRegistry>,
}

impl IqCodec {
    pub fn new(config: CodecConfig, registry: Arc<PayloadRegistry>) -> Self {
        Self { config, registry }
    }

    /// Default configuration over the process-wide registry.
    pub fn with_defaults() -> Self {
        Self::new(CodecConfig::default(), PayloadRegistry::global())
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<PayloadRegistry> {
        &self.registry
    }

    /// Reader over `source` with this codec's limits applied.
    pub fn reader<'r>(&self, source: &'r str) -> XmlReader<'r> {
        let reader = XmlReader::new(source).with_max_depth(self.config.max_depth);
        if self.config.capture_raw {
            reader
        } else {
            reader.without_raw_capture()
        }
    }

    /// Decode one IQ from a string.
    pub fn decode_str(&self, xml: &str) -> Result<Iq, CodecError> {
        Iq::decode(&mut self.reader(xml), &self.registry)
    }

    /// Decode the next IQ from a buffered stream. `raw_xml` is never
    /// captured from streams.
    pub fn decode<R: BufRead>(&self, source: R) -> Result<Iq, CodecError> {
        let mut reader = XmlReader::from_reader(source).with_max_depth(self.config.max_depth);
        Iq::decode(&mut reader, &self.registry)
    }

    /// Encode an IQ with the configured default namespace in scope.
    pub fn encode(&self, iq: &Iq) -> Result<String, CodecError> {
        let mut writer = XmlWriter::with_default_namespace(self.config.default_namespace.clone());
        iq.encode(&mut writer)?;
        writer.into_string()
    }
}
