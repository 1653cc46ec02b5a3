use thiserror::Error;

use super::context::ResourceKind;

/// Failures raised while generating an OPTIONS body. They are surfaced at the
/// point of detection and propagate unchanged to the caller.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("no documentation for {kind} method '{method}'")]
    MissingDocumentation { kind: ResourceKind, method: String },

    #[error("malformed whitelist directive: {reason}")]
    MalformedWhitelistDirective { reason: String },

    #[error("no options configuration for resource '{resource}'")]
    UnresolvedResource { resource: String },

    #[error("failed to serialize options body: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl OptionsError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        OptionsError::MalformedWhitelistDirective {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_documentation_names_kind_and_method() {
        let err = OptionsError::MissingDocumentation {
            kind: ResourceKind::Collection,
            method: "POST".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("collection"));
        assert!(msg.contains("POST"));
    }

    #[test]
    fn unresolved_resource_names_resource() {
        let err = OptionsError::UnresolvedResource {
            resource: "Widgets".into(),
        };
        assert!(err.to_string().contains("Widgets"));
    }
}
