use serde_json::Value;

use super::raw::RawResourceDefinition;

/// Configuration with every file reference inlined.
#[derive(Debug)]
pub struct ResolvedConfig {
    pub port: u16,
    pub options_documentation: Option<Value>,
    pub resources: Vec<RawResourceDefinition>,
}
