//! OpenVR2WS wire protocol
//!
//! Inbound frames are `{Type, Key, Data}` JSON envelopes decoded into a closed
//! set of variants; outbound requests are flat `{key, value.., device}` objects.

pub mod credential;
pub mod inbound;
pub mod outbound;
mod types;

pub use inbound::{decode, try_decode, InboundMessage};
pub use outbound::{OutboundCommand, RemoteSettingRequest, RequestKey};
pub use types::{
    DeviceClass, DeviceIds, DevicePropertyEvent, DigitalInputEvent, InputSource, PropertyValue,
};

/// Device scope meaning "every tracked device"
pub const ALL_DEVICES: i64 = -1;

/// Property requested for each headset and controller by the property builder
pub const SERIAL_NUMBER_PROPERTY: &str = "Prop_SerialNumber_String";
