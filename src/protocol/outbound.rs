//! Outbound request builders
//!
//! Pure functions producing the request shapes the bridge accepts. Commands
//! are immutable, serialized verbatim, and never retried or queued.

use serde::Serialize;

use super::types::{DeviceClass, DeviceIds};
use super::{ALL_DEVICES, SERIAL_NUMBER_PROPERTY};

/// Request keys understood by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RequestKey {
    DeviceIds,
    PlayArea,
    ApplicationInfo,
    InputAnalog,
    InputPose,
    DeviceProperty,
    RemoteSetting,
}

/// A single outbound request: a key plus up to five positional values and a device scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundCommand {
    pub key: RequestKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value5: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<i64>,
}

/// User input for a remote setting change
#[derive(Clone, PartialEq, Eq, Default)]
pub struct RemoteSettingRequest {
    pub password: String,
    pub section: String,
    pub setting: String,
    pub value: String,
    pub value_type: String,
}

impl std::fmt::Debug for RemoteSettingRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSettingRequest")
            .field("password", &"[REDACTED]")
            .field("section", &self.section)
            .field("setting", &self.setting)
            .field("value", &self.value)
            .field("value_type", &self.value_type)
            .finish()
    }
}

impl OutboundCommand {
    fn new(key: RequestKey) -> Self {
        Self {
            key,
            value: None,
            value2: None,
            value3: None,
            value4: None,
            value5: None,
            device: None,
        }
    }

    fn scoped(key: RequestKey, value: &str, device: i64) -> Self {
        Self {
            value: Some(value.to_string()),
            device: Some(device),
            ..Self::new(key)
        }
    }

    /// `{key:"DeviceIds"}`
    pub fn device_ids() -> Self {
        Self::new(RequestKey::DeviceIds)
    }

    /// `{key:"PlayArea"}`
    pub fn play_area() -> Self {
        Self::new(RequestKey::PlayArea)
    }

    /// `{key:"ApplicationInfo"}`
    pub fn application_info() -> Self {
        Self::new(RequestKey::ApplicationInfo)
    }

    /// `{key:"InputAnalog", value:"", device:-1}`
    pub fn input_analog() -> Self {
        Self::scoped(RequestKey::InputAnalog, "", ALL_DEVICES)
    }

    /// `{key:"InputPose", value:"", device:-1}`
    pub fn input_pose() -> Self {
        Self::scoped(RequestKey::InputPose, "", ALL_DEVICES)
    }

    /// `{key:"DeviceProperty", value:<property>, device:<index>}`
    pub fn device_property(device_index: u32, property: &str) -> Self {
        Self::scoped(RequestKey::DeviceProperty, property, i64::from(device_index))
    }

    /// Remote setting change; `password_hash` must already be the hashed credential
    pub fn remote_setting(request: &RemoteSettingRequest, password_hash: String) -> Self {
        Self {
            value: Some(password_hash),
            value2: Some(request.section.clone()),
            value3: Some(request.setting.clone()),
            value4: Some(request.value.clone()),
            value5: Some(request.value_type.clone()),
            ..Self::new(RequestKey::RemoteSetting)
        }
    }

    /// One property request per headset index, then per controller index
    pub fn property_requests(ids: &DeviceIds, property: &str) -> Vec<Self> {
        [DeviceClass::Hmd, DeviceClass::Controller]
            .iter()
            .filter_map(|class| ids.device_to_index.get(class))
            .flatten()
            .map(|&index| Self::device_property(index, property))
            .collect()
    }

    /// Serial number requests for every headset and controller
    pub fn serial_number_requests(ids: &DeviceIds) -> Vec<Self> {
        Self::property_requests(ids, SERIAL_NUMBER_PROPERTY)
    }

    /// Serialize to the wire text
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
