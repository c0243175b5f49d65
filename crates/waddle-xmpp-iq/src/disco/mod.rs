//! Service Discovery (XEP-0030) payloads.
//!
//! ## Payloads
//!
//! - **disco#info** `query`: identities and features of an entity
//! - **disco#items** `query`: items hosted by an entity
//!
//! Both are registered by [`PayloadRegistry::with_defaults`](crate::PayloadRegistry::with_defaults).

pub mod info;
pub mod items;

pub use info::{DiscoInfo, Feature, Identity, DISCO_INFO_NS};
pub use items::{DiscoItem, DiscoItems, DISCO_ITEMS_NS};
