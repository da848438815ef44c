//! Payload types carried in result envelopes and input events

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tracked device class, as named by the OpenVR runtime
///
/// Names this client does not know are kept verbatim in [`DeviceClass::Other`]
/// so distinct unknown classes never share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceClass {
    Invalid,
    Hmd,
    Controller,
    GenericTracker,
    TrackingReference,
    DisplayRedirect,
    Other(String),
}

impl DeviceClass {
    pub fn as_str(&self) -> &str {
        match self {
            DeviceClass::Invalid => "Invalid",
            DeviceClass::Hmd => "HMD",
            DeviceClass::Controller => "Controller",
            DeviceClass::GenericTracker => "GenericTracker",
            DeviceClass::TrackingReference => "TrackingReference",
            DeviceClass::DisplayRedirect => "DisplayRedirect",
            DeviceClass::Other(name) => name,
        }
    }
}

impl From<String> for DeviceClass {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Invalid" => DeviceClass::Invalid,
            "HMD" => DeviceClass::Hmd,
            "Controller" => DeviceClass::Controller,
            "GenericTracker" => DeviceClass::GenericTracker,
            "TrackingReference" => DeviceClass::TrackingReference,
            "DisplayRedirect" => DeviceClass::DisplayRedirect,
            _ => DeviceClass::Other(name),
        }
    }
}

impl From<DeviceClass> for String {
    fn from(class: DeviceClass) -> Self {
        match class {
            DeviceClass::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a `DeviceIds` result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceIds {
    /// Device class -> ordered device indices
    #[serde(default)]
    pub device_to_index: HashMap<DeviceClass, Vec<u32>>,
    /// Input source or serial -> device index
    #[serde(default)]
    pub source_to_index: HashMap<String, u32>,
}

/// Identifier of the input source a digital event came from
///
/// The bridge sends either a numeric id or a source name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputSource {
    Index(i64),
    Name(String),
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::Index(i) => write!(f, "{}", i),
            InputSource::Name(n) => f.write_str(n),
        }
    }
}

impl From<i64> for InputSource {
    fn from(value: i64) -> Self {
        InputSource::Index(value)
    }
}

impl From<&str> for InputSource {
    fn from(value: &str) -> Self {
        InputSource::Name(value.to_string())
    }
}

/// Payload of a digital input event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DigitalInputEvent {
    pub source: InputSource,
    pub input: String,
    pub state: bool,
}

/// Device property value: string, number, bool, or anything else the runtime reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Integer(i64),
    /// Unsigned values above `i64::MAX`, e.g. `*_Uint64` properties
    Unsigned(u64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl PropertyValue {
    /// Extract text value if available
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Payload of a `DeviceProperty` result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DevicePropertyEvent {
    pub device_index: u32,
    pub property_name: String,
    pub property_value: PropertyValue,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_device_ids_from_wire() {
        let ids: DeviceIds = serde_json::from_value(json!({
            "DeviceToIndex": {"HMD": [0], "Controller": [1, 2], "Lighthouse9000": [7]},
            "SourceToIndex": {"LHR-1234": 1}
        }))
        .unwrap();

        assert_eq!(ids.device_to_index[&DeviceClass::Hmd], vec![0]);
        assert_eq!(ids.device_to_index[&DeviceClass::Controller], vec![1, 2]);
        assert_eq!(
            ids.device_to_index[&DeviceClass::Other("Lighthouse9000".to_string())],
            vec![7]
        );
        assert_eq!(ids.source_to_index["LHR-1234"], 1);
    }

    #[test]
    fn test_unknown_device_classes_stay_distinct() {
        let ids: DeviceIds = serde_json::from_value(json!({
            "DeviceToIndex": {"Max": [7], "Foo": [8]}
        }))
        .unwrap();

        assert_eq!(ids.device_to_index.len(), 2);
        assert_eq!(ids.device_to_index[&DeviceClass::from("Max".to_string())], vec![7]);
        assert_eq!(ids.device_to_index[&DeviceClass::from("Foo".to_string())], vec![8]);
        assert_eq!(
            serde_json::to_value(&ids).unwrap()["DeviceToIndex"],
            json!({"Max": [7], "Foo": [8]})
        );
        assert_eq!(DeviceClass::from("HMD".to_string()), DeviceClass::Hmd);
        assert_eq!(String::from(DeviceClass::Hmd), "HMD");
    }

    #[test]
    fn test_device_ids_missing_tables_default_empty() {
        let ids: DeviceIds = serde_json::from_value(json!({})).unwrap();
        assert!(ids.device_to_index.is_empty());
        assert!(ids.source_to_index.is_empty());
    }

    #[test]
    fn test_input_source_number_or_name() {
        let numeric: DigitalInputEvent =
            serde_json::from_value(json!({"Source": 1, "Input": "trigger", "State": true}))
                .unwrap();
        assert_eq!(numeric.source, InputSource::Index(1));

        let named: DigitalInputEvent =
            serde_json::from_value(json!({"Source": "LeftHand", "Input": "a", "State": false}))
                .unwrap();
        assert_eq!(named.source, InputSource::Name("LeftHand".to_string()));
    }

    #[test]
    fn test_property_value_variants() {
        let parse = |v| serde_json::from_value::<PropertyValue>(v).unwrap();
        assert_eq!(parse(json!(true)), PropertyValue::Bool(true));
        assert_eq!(parse(json!(42)), PropertyValue::Integer(42));
        assert_eq!(parse(json!(-3)), PropertyValue::Integer(-3));
        assert_eq!(
            parse(json!(18446744073709551557u64)),
            PropertyValue::Unsigned(18446744073709551557)
        );
        assert_eq!(parse(json!(0.5)), PropertyValue::Float(0.5));
        assert_eq!(parse(json!("LHR-1")), PropertyValue::Text("LHR-1".to_string()));
        assert_eq!(parse(json!([1, 2])), PropertyValue::Other(json!([1, 2])));
    }
}
