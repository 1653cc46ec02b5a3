use super::fields::FieldSpec;
use super::methods::{MethodDocs, MethodTable};
use super::node::OrderedMap;

/// Everything the body assembler needs to know about one resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceConfig {
    pub methods: MethodTable,
    pub method_docs: MethodDocs,
    /// Filterable query parameters of the collection (`collection_query_whitelist`).
    pub query_whitelist: Vec<String>,
    pub fields: Vec<FieldSpec>,
    /// The resource's own documentation tree, if one is registered.
    pub documentation: Option<OrderedMap>,
}

/// Lookup of resource configuration by resource name.
pub trait ResourceRegistry {
    fn lookup(&self, resource: &str) -> Option<&ResourceConfig>;

    /// Tree used for resources that register no documentation of their own.
    fn default_documentation(&self) -> Option<&OrderedMap>;
}
