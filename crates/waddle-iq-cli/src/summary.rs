// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2025 Waddle Social

//! JSON summary of a decoded IQ.

use serde::Serialize;
use waddle_xmpp_iq::bind::Bind;
use waddle_xmpp_iq::disco::{DiscoInfo, DiscoItems};
use waddle_xmpp_iq::xep::{ControlSet, ControlSetResponse};
use waddle_xmpp_iq::{CodecError, Iq, IqPayload, Node, StanzaError};

/// Serializable view of an [`Iq`].
#[derive(Debug, Serialize)]
pub struct IqSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub lang: Option<String>,
    pub payloads: Vec<PayloadSummary>,
    pub error: Option<ErrorSummary>,
    pub raw_xml: Option<String>,
}

/// One payload: its qualified name, how it was decoded, and its markup.
#[derive(Debug, Serialize)]
pub struct PayloadSummary {
    pub name: String,
    pub variant: &'static str,
    pub xml: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorSummary {
    pub code: i64,
    #[serde(rename = "type")]
    pub error_type: String,
    pub reason: String,
    pub text: String,
}

impl IqSummary {
    pub fn new(iq: &Iq) -> Result<Self, CodecError> {
        let payloads = iq
            .payloads
            .iter()
            .map(|payload| PayloadSummary::new(payload.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: iq.id.clone(),
            kind: iq.kind.as_ref().map(|kind| kind.to_string()),
            from: iq.from.clone(),
            to: iq.to.clone(),
            lang: iq.lang.clone(),
            payloads,
            error: iq.error.as_ref().map(ErrorSummary::from),
            raw_xml: iq.raw_xml.clone(),
        })
    }
}

impl PayloadSummary {
    pub fn new(payload: &dyn IqPayload) -> Result<Self, CodecError> {
        Ok(Self {
            name: payload.name().to_string(),
            variant: variant_name(payload),
            xml: payload.to_xml()?,
        })
    }
}

impl From<&StanzaError> for ErrorSummary {
    fn from(error: &StanzaError) -> Self {
        Self {
            code: error.code,
            error_type: error.error_type.clone(),
            reason: error.reason.clone(),
            text: error.text.clone(),
        }
    }
}

/// Name of the concrete payload type.
fn variant_name(payload: &dyn IqPayload) -> &'static str {
    if payload.is::<DiscoInfo>() {
        "disco-info"
    } else if payload.is::<DiscoItems>() {
        "disco-items"
    } else if payload.is::<Bind>() {
        "bind"
    } else if payload.is::<ControlSet>() {
        "iot-control-set"
    } else if payload.is::<ControlSetResponse>() {
        "iot-control-set-response"
    } else if payload.is::<Node>() {
        "node"
    } else {
        "custom"
    }
}
