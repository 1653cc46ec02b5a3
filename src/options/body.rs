use std::collections::HashMap;

use tracing::{debug, warn};

use super::context::ResourceContext;
use super::error::OptionsError;
use super::fields::build_fields;
use super::merger::Merger;
use super::methods::build_methods;
use super::node::{ConfigNode, OrderedMap};
use super::registry::{ResourceConfig, ResourceRegistry};

const METHODS_KEY: &str = "methods";
const FIELDS_KEY: &str = "fields";

/// Compose the OPTIONS document: `methods`, then `fields`, then every key
/// produced by merging the documentation tree.
///
/// Custom keys named `methods` or `fields` never replace the generated ones;
/// they are dropped with a warning.
pub fn assemble(
    ctx: &ResourceContext,
    resource: &ResourceConfig,
    documentation: &OrderedMap,
) -> Result<OrderedMap, OptionsError> {
    let methods = build_methods(&resource.methods, &resource.method_docs, ctx.kind)?;
    let fields = build_fields(&resource.fields);
    let custom = Merger::new(ctx.kind, &resource.query_whitelist).merge(documentation)?;

    let mut document = OrderedMap::new();
    document.insert(METHODS_KEY, ConfigNode::Map(methods));
    document.insert(FIELDS_KEY, ConfigNode::Map(fields));
    for (key, value) in custom {
        if matches!(key.as_name(), Some(METHODS_KEY | FIELDS_KEY)) {
            warn!(resource = %ctx.name, key = %key, "Custom documentation key shadows a reserved key; ignoring it");
            continue;
        }
        document.append(key, value);
    }
    Ok(document)
}

pub fn render(document: &OrderedMap) -> Result<String, OptionsError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Build the serialized OPTIONS body for the resource bound in `route_params`.
pub fn build_body<R>(route_params: &HashMap<String, String>, registry: &R) -> Result<String, OptionsError>
where
    R: ResourceRegistry + ?Sized,
{
    let ctx = ResourceContext::from_route_params(route_params)?;
    debug!(resource = %ctx.name, kind = %ctx.kind, "Building OPTIONS body");

    let unresolved = || OptionsError::UnresolvedResource {
        resource: ctx.name.clone(),
    };
    let resource = registry.lookup(&ctx.name).ok_or_else(unresolved)?;
    let documentation = resource
        .documentation
        .as_ref()
        .or_else(|| registry.default_documentation())
        .ok_or_else(unresolved)?;

    render(&assemble(&ctx, resource, documentation)?)
}
