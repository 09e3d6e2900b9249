//! Property/record binding context attached to shapes.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A named value bound to a shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A database row referenced by shapes. Owned by a library outside the scene.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub columns: Vec<String>,
    pub values: Vec<String>,
}

impl Record {
    /// Value of a column by name.
    pub fn value(&self, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.values.get(index).map(String::as_str)
    }
}

/// Binding context owned by a shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShapeData {
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub record: Option<Arc<Record>>,
}

impl ShapeData {
    /// Value of a property by name.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Set or add a property. Returns whether anything changed.
    pub fn set_property(&mut self, name: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        match self.properties.iter_mut().find(|p| p.name == name) {
            Some(p) if p.value == value => false,
            Some(p) => {
                p.value = value;
                true
            }
            None => {
                self.properties.push(Property::new(name, value));
                true
            }
        }
    }
}

/// Substitute `{name}` placeholders from the shape's properties, then from
/// its record. Unknown placeholders are left as written.
pub fn bind_text(text: &str, data: &ShapeData) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let key = &after[..close];
        let bound = data
            .property(key)
            .or_else(|| data.record.as_ref().and_then(|r| r.value(key)));
        match bound {
            Some(value) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(key);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}
