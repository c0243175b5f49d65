//! # waddle-xmpp-iq
//!
//! Extensible IQ (Info/Query) stanza codec for Waddle Social.
//!
//! Decodes namespaced IQ markup into typed payloads when the payload is
//! known and into a generic [`Node`] tree when it is not, and writes both
//! back out. Stanza errors (RFC 6120 Section 8.3) are handled as part of
//! the envelope.
//!
//! ## Architecture
//!
//! - **Token layer**: [`XmlReader`] / [`XmlWriter`] over quick-xml, with
//!   namespace resolution on the way in and minimal `xmlns` on the way out
//! - **Payloads**: anything implementing [`IqPayload`]
//! - **Registry**: [`PayloadRegistry`] maps qualified names to payload types
//! - **Envelope**: [`Iq`] with its [`StanzaError`]
//! - **Codec**: [`IqCodec`] bundles a [`CodecConfig`] with a registry
//!
//! ## Built-in Payloads
//!
//! - RFC 6120 resource binding (`bind`)
//! - XEP-0030 (Service Discovery) `disco#info` / `disco#items`
//! - XEP-0325 (IoT Control) `set` / `setResponse`
//!
//! ## Example
//!
//! ```
//! use waddle_xmpp_iq::{disco::DiscoItems, IqCodec};
//!
//! let codec = IqCodec::with_defaults();
//! let iq = codec
//!     .decode_str("<iq type='result' id='1'><query xmlns='http://jabber.org/protocol/disco#items'/></iq>")
//!     .unwrap();
//! assert!(iq.payload::<DiscoItems>().unwrap().items.is_empty());
//! ```

pub mod bind;
pub mod codec;
pub mod config;
pub mod disco;
pub mod iq;
pub mod node;
pub mod parser;
pub mod payload;
pub mod registry;
pub mod stanza_error;
pub mod writer;
pub mod xep;

mod error;
mod types;

pub use codec::IqCodec;
pub use config::CodecConfig;
pub use error::{CodecError, StanzaErrorCondition, StanzaErrorType, UnknownErrorValue};
pub use iq::Iq;
pub use node::Node;
pub use parser::{ns, StartTag, Token, XmlReader};
pub use payload::IqPayload;
pub use registry::{PayloadFactory, PayloadRegistry};
pub use stanza_error::StanzaError;
pub use types::*;
pub use writer::XmlWriter;
