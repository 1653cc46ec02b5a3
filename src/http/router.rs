use std::collections::HashMap;

use crate::config::compiled::{CompiledConfig, CompiledResource};
use crate::options::context::CONTROLLER_PARAM;

/// Route parameter carrying the resource's API version.
pub const VERSION_PARAM: &str = "version";

/// The resource a route leads to.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTarget {
    pub resource: String,
    pub version: u32,
}

#[derive(Debug, Clone, Default)]
pub struct RouteNode {
    pub target: Option<RouteTarget>,
    pub static_children: HashMap<String, Box<RouteNode>>,
    pub dynamic_child: Option<(String, Box<RouteNode>)>,
}

impl RouteNode {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone)]
pub struct RoutesData {
    pub static_routes: StaticRoutes,
    pub dynamic_root: RouteNode,
}

pub type StaticRoutes = HashMap<String, RouteTarget>;

/// A matched route: the target resource plus every bound route parameter,
/// including `controller` and `version`.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    pub target: RouteTarget,
    pub params: HashMap<String, String>,
}

fn bind(target: &RouteTarget, mut params: HashMap<String, String>) -> RouteMatch {
    params.insert(CONTROLLER_PARAM.to_string(), target.resource.clone());
    params.insert(VERSION_PARAM.to_string(), target.version.to_string());
    RouteMatch {
        target: target.clone(),
        params,
    }
}

fn match_dynamic_route<'a>(
    root: &'a RouteNode,
    path_segments: &[&str],
) -> Option<(&'a RouteTarget, HashMap<String, String>)> {
    let mut current = root;
    let mut route_params = HashMap::new();

    for seg in path_segments {
        if let Some(child_node) = current.static_children.get(*seg) {
            current = child_node;
        } else if let Some((param_name, dynamic_node)) = &current.dynamic_child {
            route_params.insert(param_name.clone(), seg.to_string());
            current = dynamic_node;
        } else {
            return None;
        }
    }

    current.target.as_ref().map(|target| (target, route_params))
}

pub fn find_route(routes: &RoutesData, raw_path: &str) -> Option<RouteMatch> {
    let segments: Vec<&str> = raw_path.split('/').filter(|s| !s.is_empty()).collect();
    let normalized = format!("/{}", segments.join("/"));

    if let Some(target) = routes.static_routes.get(&normalized) {
        return Some(bind(target, HashMap::new()));
    }

    match_dynamic_route(&routes.dynamic_root, &segments)
        .map(|(target, route_params)| bind(target, route_params))
}

fn is_dynamic_segment(segment: &str) -> bool {
    segment.starts_with(':') && segment.len() > 1
}

fn insert_dynamic_path(root: &mut RouteNode, path_segments: &[&str], target: RouteTarget) {
    let mut current = root;

    for seg in path_segments {
        if is_dynamic_segment(seg) {
            let param_name = seg.trim_start_matches(':').to_string();
            current = current
                .dynamic_child
                .get_or_insert_with(|| (param_name, Box::new(RouteNode::new())))
                .1
                .as_mut();
        } else {
            current = current
                .static_children
                .entry(seg.to_string())
                .or_insert_with(|| Box::new(RouteNode::new()))
                .as_mut();
        }
    }
    current.target = Some(target);
}

fn process_route_insertion(
    static_routes: &mut StaticRoutes,
    dynamic_root: &mut RouteNode,
    full_path: &str,
    target: RouteTarget,
) {
    let segments: Vec<&str> = full_path.split('/').filter(|s| !s.is_empty()).collect();
    let has_dynamic = segments.iter().any(|seg| is_dynamic_segment(seg));

    if has_dynamic {
        insert_dynamic_path(dynamic_root, &segments, target);
    } else {
        static_routes.insert(format!("/{}", segments.join("/")), target);
    }
}

fn populate_routes(
    static_routes: &mut StaticRoutes,
    dynamic_root: &mut RouteNode,
    resource: &CompiledResource,
) {
    let target = RouteTarget {
        resource: resource.name().to_string(),
        version: resource.version(),
    };

    process_route_insertion(
        static_routes,
        dynamic_root,
        resource.collection_route(),
        target.clone(),
    );
    if let Some(entity_route) = resource.entity_route() {
        process_route_insertion(static_routes, dynamic_root, &entity_route, target);
    }
}

pub fn get_routes_from_config(config: &CompiledConfig) -> RoutesData {
    let mut static_routes: StaticRoutes = HashMap::new();
    let mut dynamic_root = RouteNode::new();

    for resource in config.resources() {
        populate_routes(&mut static_routes, &mut dynamic_root, resource);
    }

    RoutesData {
        static_routes,
        dynamic_root,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::compiled::compile_config;
    use crate::config::resolved::ResolvedConfig;
    use crate::options::ResourceKind;
    use serde_json::json;

    fn routes() -> RoutesData {
        let resources = vec![
            json!({"name": "Widgets", "route": "/widgets", "entity_identifier": "widget_id", "version": 2}),
            json!({"name": "Featured", "route": "/widgets/featured"}),
        ];
        let config = compile_config(ResolvedConfig {
            port: 8080,
            options_documentation: None,
            resources: resources
                .into_iter()
                .map(|r| serde_json::from_value(r).unwrap())
                .collect(),
        })
        .unwrap();
        get_routes_from_config(&config)
    }

    #[test]
    fn collection_route_binds_two_params() {
        let matched = find_route(&routes(), "/widgets/").unwrap();
        assert_eq!(matched.target.resource, "Widgets");
        assert_eq!(matched.params.len(), 2);
        assert_eq!(matched.params["version"], "2");
        assert_eq!(ResourceKind::classify(matched.params.keys()), ResourceKind::Collection);
    }

    #[test]
    fn entity_route_binds_identifier() {
        let matched = find_route(&routes(), "/widgets/42").unwrap();
        assert_eq!(matched.params["widget_id"], "42");
        assert_eq!(matched.params["controller"], "Widgets");
        assert_eq!(ResourceKind::classify(matched.params.keys()), ResourceKind::Entity);
    }

    #[test]
    fn static_route_wins_over_identifier() {
        let matched = find_route(&routes(), "/widgets/featured").unwrap();
        assert_eq!(matched.target.resource, "Featured");
    }

    #[test]
    fn unknown_path_has_no_route() {
        assert!(find_route(&routes(), "/gadgets").is_none());
        assert!(find_route(&routes(), "/widgets/42/parts").is_none());
    }
}
