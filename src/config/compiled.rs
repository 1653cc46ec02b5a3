use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::options::{
    methods::{MethodDocs, MethodTable},
    ConfigNode, OrderedMap, ResourceConfig, ResourceKind, ResourceRegistry,
};

use super::{error::ConfigError, raw::RawResourceDefinition, resolved::ResolvedConfig};

/// Key of the documentation tree used by resources without their own.
pub const DEFAULT_DOCUMENTATION: &str = "default";

#[derive(Clone, Debug)]
pub struct CompiledResource {
    name: String,
    route: String,
    entity_identifier: Option<String>,
    version: u32,
    config: ResourceConfig,
}

impl CompiledResource {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn collection_route(&self) -> &str {
        &self.route
    }

    /// Entity route with its identifier as a dynamic segment, e.g. `/widgets/:widget_id`.
    pub fn entity_route(&self) -> Option<String> {
        self.entity_identifier
            .as_ref()
            .map(|id| format!("{}/:{}", self.route.trim_end_matches('/'), id))
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }
}

#[derive(Clone, Debug)]
pub struct CompiledConfig {
    pub port: u16,
    resources: IndexMap<String, CompiledResource>,
    default_documentation: Option<OrderedMap>,
}

impl CompiledConfig {
    pub fn resources(&self) -> impl Iterator<Item = &CompiledResource> {
        self.resources.values()
    }

    pub fn resource(&self, name: &str) -> Option<&CompiledResource> {
        self.resources.get(name)
    }
}

impl ResourceRegistry for CompiledConfig {
    fn lookup(&self, resource: &str) -> Option<&ResourceConfig> {
        self.resources.get(resource).map(CompiledResource::config)
    }

    fn default_documentation(&self) -> Option<&OrderedMap> {
        self.default_documentation.as_ref()
    }
}

fn compile_tree(name: &str, value: Value) -> Result<OrderedMap, ConfigError> {
    match ConfigNode::from(value) {
        ConfigNode::Map(map) => Ok(map),
        _ => Err(ConfigError::InvalidDocumentation(name.to_string())),
    }
}

fn normalize_route(resource: &str, route: &str) -> Result<String, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidRoute {
        resource: resource.to_string(),
        reason: reason.to_string(),
    };
    if !route.starts_with('/') {
        return Err(invalid("route must start with '/'"));
    }
    let segments: Vec<&str> = route.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Err(invalid("route must have at least one segment"));
    }
    // Extra bound parameters would make collections look like entities.
    if segments.iter().any(|seg| seg.starts_with(':')) {
        return Err(invalid("collection routes cannot contain dynamic segments"));
    }
    Ok(format!("/{}", segments.join("/")))
}

fn compile_method_docs(definition: &RawResourceDefinition) -> MethodDocs {
    let mut docs = MethodDocs::new();
    let tables = [
        (ResourceKind::Collection, &definition.documentation.collection),
        (ResourceKind::Entity, &definition.documentation.entity),
    ];
    for (kind, table) in tables {
        for (method, doc) in table {
            // Entries without a description stay absent so that the method is
            // reported as undocumented.
            if let Some(description) = &doc.description {
                docs.insert(kind, method.clone(), description.clone());
            }
        }
    }
    docs
}

fn compile_resource(
    definition: RawResourceDefinition,
    documentation: Option<OrderedMap>,
) -> Result<CompiledResource, ConfigError> {
    debug!(name = %definition.name, route = %definition.route, "Compiling resource");
    let route = normalize_route(&definition.name, &definition.route)?;
    if let Some(id) = &definition.entity_identifier {
        if id.is_empty() || id.contains('/') {
            return Err(ConfigError::InvalidRoute {
                resource: definition.name.clone(),
                reason: format!("invalid entity identifier '{id}'"),
            });
        }
    }

    let method_docs = compile_method_docs(&definition);
    let config = ResourceConfig {
        methods: MethodTable {
            collection: definition.collection_http_methods,
            entity: definition.entity_http_methods,
        },
        method_docs,
        query_whitelist: definition.collection_query_whitelist,
        fields: definition.input_filter_specs,
        documentation,
    };

    Ok(CompiledResource {
        name: definition.name,
        route,
        entity_identifier: definition.entity_identifier,
        version: definition.version,
        config,
    })
}

pub fn compile_config(resolved: ResolvedConfig) -> Result<CompiledConfig, ConfigError> {
    let mut trees: IndexMap<String, Value> = match resolved.options_documentation {
        Some(Value::Object(object)) => object.into_iter().collect(),
        Some(_) => {
            return Err(ConfigError::InvalidDocumentation(
                "options_documentation".to_string(),
            ))
        }
        None => IndexMap::new(),
    };

    let default_documentation = trees
        .shift_remove(DEFAULT_DOCUMENTATION)
        .map(|value| compile_tree(DEFAULT_DOCUMENTATION, value))
        .transpose()?;

    let mut resources = IndexMap::with_capacity(resolved.resources.len());
    let mut routes = HashSet::new();
    for definition in resolved.resources {
        if resources.contains_key(&definition.name) {
            return Err(ConfigError::DuplicateResource(definition.name));
        }
        let documentation = trees
            .shift_remove(&definition.name)
            .map(|value| compile_tree(&definition.name, value))
            .transpose()?;
        let resource = compile_resource(definition, documentation)?;

        let claimed = std::iter::once(resource.collection_route().to_string())
            .chain(resource.entity_route());
        for route in claimed {
            if !routes.insert(route.clone()) {
                return Err(ConfigError::DuplicateRoute(route));
            }
        }
        resources.insert(resource.name.clone(), resource);
    }

    for name in trees.keys() {
        debug!(%name, "Options documentation does not match any resource");
    }

    Ok(CompiledConfig {
        port: resolved.port,
        resources,
        default_documentation,
    })
}
