use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{
    error::ConfigError,
    raw::{RawConfig, RawDocumentation, RawResource, RawResourceDefinition},
    resolved::ResolvedConfig,
};

/// Chains of `fref` files deeper than this are treated as cycles.
const MAX_REFERENCE_DEPTH: usize = 16;

pub fn get_config_path_cwd(config_arg: &Path) -> Result<PathBuf, ConfigError> {
    if config_arg.is_absolute() {
        Ok(config_arg.to_path_buf())
    } else {
        let cwd = env::current_dir().map_err(ConfigError::CurrentDir)?;
        Ok(cwd.join(config_arg))
    }
}

/// Resolves a reference relative to the directory of the file that holds it.
pub fn resolve_path(reference: &str, base: &Path) -> PathBuf {
    let ref_path = Path::new(reference.trim());
    if ref_path.is_absolute() {
        ref_path.to_path_buf()
    } else {
        base.join(ref_path)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn check_depth(depth: usize, path: &Path) -> Result<(), ConfigError> {
    if depth >= MAX_REFERENCE_DEPTH {
        return Err(ConfigError::Reference {
            path: path.to_path_buf(),
            reason: format!("reference chain deeper than {MAX_REFERENCE_DEPTH} files"),
        });
    }
    Ok(())
}

fn inline_resource(
    resource: RawResource,
    root_folder: &Path,
    depth: usize,
) -> Result<RawResourceDefinition, ConfigError> {
    match resource {
        RawResource::Inline(definition) => Ok(definition),
        RawResource::Reference { fref } => {
            let external_path = resolve_path(&fref, root_folder);
            check_depth(depth, &external_path)?;
            debug!(path = %external_path.display(), "Inlining resource reference");
            let referenced: RawResource = read_json(&external_path)?;
            // Further references resolve against the referenced file's directory.
            let new_root = external_path.parent().unwrap_or(root_folder);
            inline_resource(referenced, new_root, depth + 1)
        }
    }
}

fn inline_documentation(
    documentation: RawDocumentation,
    root_folder: &Path,
    depth: usize,
) -> Result<Value, ConfigError> {
    match documentation {
        RawDocumentation::Inline(value) => Ok(value),
        RawDocumentation::Ref { fref } => {
            let external_path = resolve_path(&fref, root_folder);
            check_depth(depth, &external_path)?;
            debug!(path = %external_path.display(), "Inlining options documentation reference");
            let referenced: RawDocumentation = read_json(&external_path)?;
            let new_root = external_path.parent().unwrap_or(root_folder);
            inline_documentation(referenced, new_root, depth + 1)
        }
    }
}

/// Inlines external references throughout the configuration.
pub fn resolve_config_references(
    config: RawConfig,
    root_folder: &Path,
) -> Result<ResolvedConfig, ConfigError> {
    let resources = config
        .resources
        .into_iter()
        .map(|resource| inline_resource(resource, root_folder, 0))
        .collect::<Result<Vec<_>, ConfigError>>()?;
    let options_documentation = config
        .options_documentation
        .map(|documentation| inline_documentation(documentation, root_folder, 0))
        .transpose()?;

    Ok(ResolvedConfig {
        port: config.port,
        options_documentation,
        resources,
    })
}

pub fn load_config(path: &Path) -> Result<RawConfig, ConfigError> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, value: serde_json::Value) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
        path
    }

    #[test]
    fn inlines_resource_and_documentation_references() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "resources/widgets.json",
            json!({"fref": "widgets.def.json"}),
        );
        write(
            dir.path(),
            "resources/widgets.def.json",
            json!({"name": "Widgets", "route": "/widgets"}),
        );
        write(dir.path(), "options.json", json!({"default": {"about": "x"}}));
        let main = write(
            dir.path(),
            "api.json",
            json!({
                "options_documentation": {"fref": "options.json"},
                "resources": [{"fref": "resources/widgets.json"}]
            }),
        );

        let raw = load_config(&main).unwrap();
        let resolved = resolve_config_references(raw, dir.path()).unwrap();
        assert_eq!(resolved.port, 8080);
        assert_eq!(resolved.resources[0].name, "Widgets");
        assert_eq!(resolved.resources[0].version, 1);
        assert_eq!(
            resolved.options_documentation,
            Some(json!({"default": {"about": "x"}}))
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_config(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn reference_cycle_is_rejected() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.json", json!({"fref": "b.json"}));
        write(dir.path(), "b.json", json!({"fref": "a.json"}));
        let main = write(dir.path(), "api.json", json!({"resources": [{"fref": "a.json"}]}));
        let raw = load_config(&main).unwrap();
        let err = resolve_config_references(raw, dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Reference { .. }));
    }

    #[test]
    fn relative_paths_join_the_base() {
        assert_eq!(
            resolve_path("options.json", Path::new("/srv/api")),
            PathBuf::from("/srv/api/options.json")
        );
        assert_eq!(
            resolve_path("/etc/options.json", Path::new("/srv/api")),
            PathBuf::from("/etc/options.json")
        );
    }
}
