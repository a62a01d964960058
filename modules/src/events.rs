use crate::prelude::*;

use core::fmt::{Display, Error as FmtError, Formatter};

use serde::{Deserialize, Serialize};

/// An event emitted by an IBC application, handed to the host verbatim.
///
/// Events are fire-and-forget: nothing in the application depends on them being delivered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEvent {
    pub kind: String,
    pub module_name: String,
    pub attributes: Vec<ModuleEventAttribute>,
}

impl ModuleEvent {
    pub fn new(kind: impl ToString, module_name: impl ToString) -> Self {
        Self {
            kind: kind.to_string(),
            module_name: module_name.to_string(),
            attributes: vec![],
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<ModuleEventAttribute>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Returns the value of the first attribute with the given key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }
}

impl Display for ModuleEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}.{} {{", self.module_name, self.kind)?;
        for (i, attr) in self.attributes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", attr)?;
        }
        write!(f, "}}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEventAttribute {
    pub key: String,
    pub value: String,
}

impl<K: ToString, V: ToString> From<(K, V)> for ModuleEventAttribute {
    fn from((k, v): (K, V)) -> Self {
        Self {
            key: k.to_string(),
            value: v.to_string(),
        }
    }
}

impl Display for ModuleEventAttribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}: {}", self.key, self.value)
    }
}
