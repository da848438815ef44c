//! StateTables - per-device and per-input state folded from routed messages
//!
//! Every merge touches exactly one cell and is idempotent. Tables grow for
//! the lifetime of the process; nothing is evicted.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::protocol::{DeviceClass, DeviceIds, InputSource, PropertyValue};

type InputMap = HashMap<InputSource, HashMap<String, bool>>;
type PropertyMap = HashMap<u32, HashMap<String, PropertyValue>>;

/// Device identity, digital input and device property tables
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StateTables {
    device_ids: DeviceIds,
    digital_inputs: InputMap,
    device_properties: PropertyMap,
}

impl StateTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pressed state of one input on one source
    ///
    /// Returns whether the stored value changed.
    pub fn merge_digital_input(
        &mut self,
        source: InputSource,
        name: impl Into<String>,
        state: bool,
    ) -> bool {
        let previous = self
            .digital_inputs
            .entry(source)
            .or_default()
            .insert(name.into(), state);
        previous != Some(state)
    }

    /// Record one property value for one device (last write wins)
    ///
    /// Returns whether the stored value changed.
    pub fn merge_device_property(
        &mut self,
        device_index: u32,
        name: impl Into<String>,
        value: PropertyValue,
    ) -> bool {
        let cell = self
            .device_properties
            .entry(device_index)
            .or_default()
            .entry(name.into());
        match cell {
            std::collections::hash_map::Entry::Occupied(mut e) => {
                if *e.get() == value {
                    false
                } else {
                    e.insert(value);
                    true
                }
            },
            std::collections::hash_map::Entry::Vacant(e) => {
                e.insert(value);
                true
            },
        }
    }

    /// Replace the device identity mapping wholesale
    pub fn replace_device_ids(&mut self, ids: DeviceIds) {
        self.device_ids = ids;
    }

    /// Last known state of an input; `None` when never reported
    pub fn digital_input(&self, source: &InputSource, name: &str) -> Option<bool> {
        self.digital_inputs.get(source)?.get(name).copied()
    }

    pub fn device_property(&self, device_index: u32, name: &str) -> Option<&PropertyValue> {
        self.device_properties.get(&device_index)?.get(name)
    }

    pub fn device_ids(&self) -> &DeviceIds {
        &self.device_ids
    }

    /// Device indices of a class, in the order the bridge reported them
    pub fn indices_for_class(&self, class: DeviceClass) -> &[u32] {
        self.device_ids
            .device_to_index
            .get(&class)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn index_for_source(&self, source: &str) -> Option<u32> {
        self.device_ids.source_to_index.get(source).copied()
    }

    /// Full digital input table as JSON, keys sorted
    pub fn digital_inputs_json(&self) -> Value {
        serde_json::to_value(&self.digital_inputs).unwrap_or(Value::Null)
    }

    /// Full device property table as JSON, keys sorted
    pub fn device_properties_json(&self) -> Value {
        serde_json::to_value(&self.device_properties).unwrap_or(Value::Null)
    }

    pub fn device_ids_json(&self) -> Value {
        serde_json::to_value(&self.device_ids).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn ids(value: Value) -> DeviceIds {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_trigger_press_then_release() {
        let mut tables = StateTables::new();
        tables.merge_digital_input(InputSource::Index(1), "trigger", true);
        tables.merge_digital_input(InputSource::Index(1), "trigger", false);

        assert_eq!(tables.digital_inputs_json(), json!({"1": {"trigger": false}}));
        assert_eq!(tables.digital_input(&InputSource::Index(1), "trigger"), Some(false));
    }

    #[test]
    fn test_absent_input_is_unknown() {
        let mut tables = StateTables::new();
        tables.merge_digital_input(InputSource::Index(1), "trigger", true);

        assert_eq!(tables.digital_input(&InputSource::Index(1), "grip"), None);
        assert_eq!(tables.digital_input(&InputSource::Index(2), "trigger"), None);
    }

    #[test]
    fn test_merge_reports_change() {
        let mut tables = StateTables::new();
        assert!(tables.merge_digital_input(InputSource::Index(1), "a", true));
        assert!(!tables.merge_digital_input(InputSource::Index(1), "a", true));
        assert!(tables.merge_digital_input(InputSource::Index(1), "a", false));

        let serial = PropertyValue::Text("LHR-1".to_string());
        assert!(tables.merge_device_property(0, "Prop_SerialNumber_String", serial.clone()));
        assert!(!tables.merge_device_property(0, "Prop_SerialNumber_String", serial));
    }

    #[test]
    fn test_property_last_write_wins_per_key() {
        let mut tables = StateTables::new();
        tables.merge_device_property(0, "Prop_A", PropertyValue::Integer(1));
        tables.merge_device_property(0, "Prop_B", PropertyValue::Bool(true));
        tables.merge_device_property(0, "Prop_A", PropertyValue::Integer(2));

        assert_eq!(tables.device_property(0, "Prop_A"), Some(&PropertyValue::Integer(2)));
        assert_eq!(tables.device_property(0, "Prop_B"), Some(&PropertyValue::Bool(true)));
        assert_eq!(
            tables.device_properties_json(),
            json!({"0": {"Prop_A": 2, "Prop_B": true}})
        );
    }

    #[test]
    fn test_replace_device_ids_leaves_no_residue() {
        let mut tables = StateTables::new();
        tables.replace_device_ids(ids(json!({
            "DeviceToIndex": {"HMD": [0], "Controller": [1, 2]},
            "SourceToIndex": {"LHR-OLD": 1}
        })));
        tables.replace_device_ids(ids(json!({
            "DeviceToIndex": {"HMD": [5]},
            "SourceToIndex": {"LHR-NEW": 5}
        })));

        assert_eq!(tables.indices_for_class(DeviceClass::Hmd), &[5]);
        assert!(tables.indices_for_class(DeviceClass::Controller).is_empty());
        assert_eq!(tables.index_for_source("LHR-OLD"), None);
        assert_eq!(tables.index_for_source("LHR-NEW"), Some(5));
    }

    fn source_strategy() -> impl Strategy<Value = InputSource> {
        prop_oneof![
            (0i64..4).prop_map(InputSource::Index),
            "[a-c]".prop_map(InputSource::Name),
        ]
    }

    proptest! {
        #[test]
        fn prop_last_event_per_pair_wins(
            events in prop::collection::vec((source_strategy(), "[a-d]", any::<bool>()), 0..64)
        ) {
            let mut tables = StateTables::new();
            for (source, name, state) in &events {
                tables.merge_digital_input(source.clone(), name.clone(), *state);
            }

            let mut expected: HashMap<(InputSource, String), bool> = HashMap::new();
            for (source, name, state) in events {
                expected.insert((source, name), state);
            }
            for ((source, name), state) in expected {
                prop_assert_eq!(tables.digital_input(&source, &name), Some(state));
            }
        }

        #[test]
        fn prop_property_merge_is_idempotent(
            index in 0u32..8,
            name in "Prop_[A-Z]{1,4}",
            value in any::<i64>(),
        ) {
            let mut once = StateTables::new();
            once.merge_device_property(index, name.clone(), PropertyValue::Integer(value));

            let mut twice = once.clone();
            twice.merge_device_property(index, name, PropertyValue::Integer(value));

            prop_assert_eq!(once, twice);
        }
    }
}
