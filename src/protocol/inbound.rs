//! Inbound frame decoding
//!
//! Every frame decodes to an [`InboundMessage`]. Anything that cannot be
//! typed (malformed JSON, `null`, an unknown type or key, a payload that does
//! not match its key) fails closed to [`InboundMessage::Unparsed`].

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::types::{DeviceIds, DevicePropertyEvent, DigitalInputEvent};
use crate::error::ClientError;

/// Raw `{Type, Key, Data}` envelope as sent by the bridge
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Type")]
    kind: MessageType,
    #[serde(rename = "Key", default)]
    key: Value,
    #[serde(rename = "Data", default)]
    data: Value,
}

/// Outer discriminator of an envelope
#[derive(Debug, Deserialize)]
enum MessageType {
    Result,
    InputDigital,
    #[serde(other)]
    Unknown,
}

/// A decoded inbound message
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Digital input event; `key` is the envelope key used as display label
    DigitalInput { key: String, event: DigitalInputEvent },
    /// Decoded identity tables plus the payload exactly as received
    DeviceIds { ids: DeviceIds, data: Value },
    InputAnalog(Value),
    InputPose(Value),
    ApplicationInfo(Value),
    PlayArea(Value),
    DeviceProperty(DevicePropertyEvent),
    RemoteSetting(Value),
    /// Anything that could not be typed; `raw` is pretty JSON when parseable
    Unparsed { raw: String },
}

impl InboundMessage {
    /// Label shown in front of the payload on the display sink
    pub fn label(&self) -> &str {
        match self {
            InboundMessage::DigitalInput { key, .. } => key,
            InboundMessage::DeviceIds { .. } => "DeviceIds",
            InboundMessage::InputAnalog(_) => "InputAnalog",
            InboundMessage::InputPose(_) => "InputPose",
            InboundMessage::ApplicationInfo(_) => "ApplicationInfo",
            InboundMessage::PlayArea(_) => "PlayArea",
            InboundMessage::DeviceProperty(_) => "DeviceProperty",
            InboundMessage::RemoteSetting(_) => "RemoteSetting",
            InboundMessage::Unparsed { .. } => "Response",
        }
    }
}

/// Decode a frame, reporting why it could not be typed
pub fn try_decode(text: &str) -> Result<InboundMessage, ClientError> {
    let envelope: Envelope = serde_json::from_str(text)?;
    let key = match &envelope.key {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };

    match envelope.kind {
        MessageType::InputDigital => {
            let event: DigitalInputEvent = serde_json::from_value(envelope.data)?;
            let key = if key.is_empty() { "InputDigital".to_string() } else { key };
            Ok(InboundMessage::DigitalInput { key, event })
        },
        MessageType::Result => match key.as_str() {
            "DeviceIds" => Ok(InboundMessage::DeviceIds {
                ids: serde_json::from_value(envelope.data.clone())?,
                data: envelope.data,
            }),
            "InputAnalog" => Ok(InboundMessage::InputAnalog(envelope.data)),
            "InputPose" => Ok(InboundMessage::InputPose(envelope.data)),
            "ApplicationInfo" => Ok(InboundMessage::ApplicationInfo(envelope.data)),
            "PlayArea" => Ok(InboundMessage::PlayArea(envelope.data)),
            "DeviceProperty" => Ok(InboundMessage::DeviceProperty(serde_json::from_value(
                envelope.data,
            )?)),
            "RemoteSetting" => Ok(InboundMessage::RemoteSetting(envelope.data)),
            _ => Err(ClientError::UnknownKey(key)),
        },
        MessageType::Unknown => Err(ClientError::UnknownType(type_name(text))),
    }
}

/// Decode a frame, falling back to [`InboundMessage::Unparsed`]
pub fn decode(text: &str) -> InboundMessage {
    match try_decode(text) {
        Ok(message) => message,
        Err(e) => {
            debug!(error = %e, "Frame not typed, showing as generic response");
            InboundMessage::Unparsed { raw: pretty_or_raw(text) }
        },
    }
}

fn type_name(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| v.get("Type").map(|t| t.to_string()))
        .unwrap_or_default()
}

fn pretty_or_raw(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| text.to_string())
}
