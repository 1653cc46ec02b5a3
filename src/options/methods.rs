use std::collections::HashMap;

use super::context::ResourceKind;
use super::error::OptionsError;
use super::node::{ConfigNode, OrderedMap};

/// Allowed HTTP methods per resource kind, in declared order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodTable {
    pub collection: Vec<String>,
    pub entity: Vec<String>,
}

impl MethodTable {
    pub fn allowed(&self, kind: ResourceKind) -> &[String] {
        match kind {
            ResourceKind::Collection => &self.collection,
            ResourceKind::Entity => &self.entity,
        }
    }

    pub fn allows(&self, kind: ResourceKind, method: &str) -> bool {
        self.allowed(kind).iter().any(|m| m.eq_ignore_ascii_case(method))
    }
}

/// Human-readable descriptions keyed by resource kind and method name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodDocs {
    collection: HashMap<String, String>,
    entity: HashMap<String, String>,
}

impl MethodDocs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ResourceKind, method: impl Into<String>, description: impl Into<String>) {
        self.table_mut(kind).insert(method.into(), description.into());
    }

    pub fn describe(&self, kind: ResourceKind, method: &str) -> Option<&str> {
        let table = match kind {
            ResourceKind::Collection => &self.collection,
            ResourceKind::Entity => &self.entity,
        };
        table.get(method).map(String::as_str)
    }

    fn table_mut(&mut self, kind: ResourceKind) -> &mut HashMap<String, String> {
        match kind {
            ResourceKind::Collection => &mut self.collection,
            ResourceKind::Entity => &mut self.entity,
        }
    }
}

/// Describe every method allowed for `kind`. A method without documentation
/// is a configuration error, never a blank entry.
pub fn build_methods(
    table: &MethodTable,
    docs: &MethodDocs,
    kind: ResourceKind,
) -> Result<OrderedMap, OptionsError> {
    let mut methods = OrderedMap::new();
    for method in table.allowed(kind) {
        let description = docs
            .describe(kind, method)
            .ok_or_else(|| OptionsError::MissingDocumentation {
                kind,
                method: method.clone(),
            })?;
        methods.insert(method.clone(), ConfigNode::string(description));
    }
    Ok(methods)
}
