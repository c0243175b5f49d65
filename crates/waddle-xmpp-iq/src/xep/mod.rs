//! XMPP Extension Protocols (XEPs) Implementation
//!
//! Payloads defined by extension protocols rather than the core RFCs.
//!
//! ## Implemented XEPs
//!
//! - **XEP-0325**: Internet of Things - Control. Lets a controller set
//!   typed control parameters on a device.

pub mod xep0325;

pub use xep0325::{ControlField, ControlSet, ControlSetResponse, NS_IOT_CONTROL};
