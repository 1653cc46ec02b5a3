use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::options::fields::FieldSpec;

pub fn default_port() -> u16 {
    8080
}

pub fn default_version() -> u32 {
    1
}

/// Either an inline JSON value or a reference to a file holding it.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum RawDocumentation {
    Ref { fref: String },
    Inline(Value),
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RawMethodDoc {
    #[serde(default)]
    pub description: Option<String>,
}

/// Per-kind method descriptions, as `{"collection": {"GET": {"description": ..}}}`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RawMethodDocumentation {
    #[serde(default)]
    pub collection: IndexMap<String, RawMethodDoc>,
    #[serde(default)]
    pub entity: IndexMap<String, RawMethodDoc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RawResourceDefinition {
    /// Resource (controller) name, bound as the `controller` route parameter.
    pub name: String,
    /// Collection route, e.g. `/widgets`.
    pub route: String,
    /// Name of the identifier segment of the entity route, if the resource has one.
    #[serde(default)]
    pub entity_identifier: Option<String>,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub collection_http_methods: Vec<String>,
    #[serde(default)]
    pub entity_http_methods: Vec<String>,
    #[serde(default)]
    pub collection_query_whitelist: Vec<String>,
    #[serde(default)]
    pub documentation: RawMethodDocumentation,
    #[serde(default)]
    pub input_filter_specs: Vec<FieldSpec>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum RawResource {
    /// A resource defined in another file.
    Reference { fref: String },
    Inline(RawResourceDefinition),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RawConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Documentation trees keyed by resource name, plus `default`.
    #[serde(default)]
    pub options_documentation: Option<RawDocumentation>,
    pub resources: Vec<RawResource>,
}
