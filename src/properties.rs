//! Typed custom properties.

use std::collections::HashMap;

/// A single typed custom property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// `bool`.
    Bool(bool),
    /// `int`.
    I64(i64),
    /// `float`.
    F32(f32),
    /// `string`, `color`, `file` and `class`-less text values.
    String(String),
}

/// Custom properties attached to a map, layer, tileset, tile or object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: HashMap<String, PropertyValue>,
}

impl Properties {
    /// No properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, replacing any previous value.
    pub fn insert(&mut self, name: String, value: PropertyValue) {
        self.values.insert(name, value);
    }

    /// Raw value of `name`.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when there are no properties.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `name` as a bool, if it is one.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// `name` as an integer, if it is one.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            PropertyValue::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// `None` when the stored integer does not fit in an `i32`.
    pub fn get_i32(&self, name: &str) -> Option<i32> {
        self.get_i64(name).and_then(|v| i32::try_from(v).ok())
    }

    /// `name` as a float. Integers widen.
    pub fn get_f32(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            PropertyValue::F32(v) => Some(*v),
            PropertyValue::I64(v) => Some(*v as f32),
            _ => None,
        }
    }

    /// `name` as text, if it is a string.
    pub fn get_string(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            PropertyValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters_reject_mismatched_kinds() {
        let mut props = Properties::new();
        props.insert("solid".into(), PropertyValue::Bool(true));
        props.insert("name".into(), PropertyValue::String("door".into()));

        assert_eq!(props.get_bool("solid"), Some(true));
        assert_eq!(props.get_string("solid"), None);
        assert_eq!(props.get_string("name"), Some("door"));
        assert_eq!(props.get_bool("missing"), None);
    }

    #[test]
    fn int_widens_to_float_but_not_the_other_way() {
        let mut props = Properties::new();
        props.insert("hp".into(), PropertyValue::I64(3));
        props.insert("speed".into(), PropertyValue::F32(1.5));

        assert_eq!(props.get_f32("hp"), Some(3.0));
        assert_eq!(props.get_i64("speed"), None);
    }

    #[test]
    fn get_i32_refuses_out_of_range_values() {
        let mut props = Properties::new();
        props.insert("big".into(), PropertyValue::I64(5_000_000_000));
        assert_eq!(props.get_i64("big"), Some(5_000_000_000));
        assert_eq!(props.get_i32("big"), None);
    }
}
