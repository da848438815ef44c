//! Message router
//!
//! Dispatches decoded inbound messages: identity, input and property
//! messages are folded into [`StateTables`]; everything is forwarded to the
//! display sink with a timestamp and the message key as label.

use serde_json::Value;
use tracing::trace;

use crate::protocol::{self, InboundMessage};
use crate::sink::{labeled, DisplaySink, Panel};
use crate::state::StateTables;

/// Decode one raw frame and dispatch it
pub fn route_frame(text: &str, tables: &mut StateTables, sink: &mut dyn DisplaySink) {
    dispatch(protocol::decode(text), tables, sink);
}

/// Dispatch one decoded message
pub fn dispatch(message: InboundMessage, tables: &mut StateTables, sink: &mut dyn DisplaySink) {
    let label = message.label().to_string();
    trace!(key = %label, "Routing inbound message");

    match message {
        InboundMessage::DigitalInput { event, .. } => {
            tables.merge_digital_input(event.source, event.input, event.state);
            sink.show(
                Panel::InputDigital,
                &labeled(&label, &pretty(&tables.digital_inputs_json())),
            );
        },
        InboundMessage::DeviceIds { ids, data } => {
            tables.replace_device_ids(ids);
            show_verbatim(sink, Panel::DeviceIds, &label, &data);
        },
        InboundMessage::DeviceProperty(event) => {
            tables.merge_device_property(
                event.device_index,
                event.property_name,
                event.property_value,
            );
            sink.show(
                Panel::Properties,
                &labeled(&label, &pretty(&tables.device_properties_json())),
            );
        },
        InboundMessage::InputAnalog(data) => show_verbatim(sink, Panel::InputAnalog, &label, &data),
        InboundMessage::InputPose(data) => show_verbatim(sink, Panel::InputPose, &label, &data),
        InboundMessage::ApplicationInfo(data) => {
            show_verbatim(sink, Panel::ApplicationInfo, &label, &data)
        },
        InboundMessage::PlayArea(data) => show_verbatim(sink, Panel::PlayArea, &label, &data),
        InboundMessage::RemoteSetting(data) => {
            show_verbatim(sink, Panel::RemoteSetting, &label, &data)
        },
        InboundMessage::Unparsed { raw } => sink.notify(&labeled(&label, &raw)),
    }
}

fn show_verbatim(sink: &mut dyn DisplaySink, panel: Panel, label: &str, data: &Value) {
    sink.show(panel, &labeled(label, &pretty(data)));
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
