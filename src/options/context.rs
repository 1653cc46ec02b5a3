use std::collections::HashMap;
use std::fmt;

use super::error::OptionsError;

/// Route parameter carrying the resolved resource name.
pub const CONTROLLER_PARAM: &str = "controller";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Collection,
    Entity,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Collection => "collection",
            ResourceKind::Entity => "entity",
        }
    }

    /// Classify a request by the number of bound route parameters.
    ///
    /// A collection route binds only the resource name and its version, so
    /// exactly two parameters means `Collection`. Any other count implies an
    /// identifier is present.
    pub fn classify<'a, I>(param_names: I) -> ResourceKind
    where
        I: IntoIterator<Item = &'a String>,
    {
        if param_names.into_iter().count() == 2 {
            ResourceKind::Collection
        } else {
            ResourceKind::Entity
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceContext {
    pub kind: ResourceKind,
    pub name: String,
}

impl ResourceContext {
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn from_route_params(params: &HashMap<String, String>) -> Result<Self, OptionsError> {
        let name = params
            .get(CONTROLLER_PARAM)
            .ok_or_else(|| OptionsError::UnresolvedResource {
                resource: String::new(),
            })?;
        Ok(Self::new(ResourceKind::classify(params.keys()), name.clone()))
    }
}
