//! Serde types for the process catalog JSON.

use serde::{Deserialize, Serialize};

/// Top-level shape of a catalog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub processes: Vec<ProcessMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    #[default]
    Process,
    /// Only ever inserted by the dependency resolver, but may also be named
    /// explicitly in a pipeline string.
    Adapter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMetadata {
    pub name: String,
    /// Data types this process accepts.
    pub input: Vec<String>,
    /// Data type this process emits.
    pub output: String,
    /// Whether the process may directly follow itself.
    #[serde(default)]
    pub repeatable: bool,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub description: String,
    /// Template script run by the generated block. Defaults to the name.
    #[serde(default)]
    pub template: Option<String>,
}

impl ProcessMetadata {
    pub fn accepts(&self, data_type: &str) -> bool {
        self.input.iter().any(|t| t == data_type)
    }

    pub fn is_adapter(&self) -> bool {
        self.role == Role::Adapter
    }

    pub fn template_name(&self) -> &str {
        self.template.as_deref().unwrap_or(&self.name)
    }
}

/// A sequence of adapters that turns one data type into another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterChain {
    /// Adapter names in splice order.
    pub adapters: Vec<String>,
    /// Type emitted by the last adapter.
    pub output: String,
}

impl AdapterChain {
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
