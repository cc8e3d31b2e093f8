//! Startup registration of gated resources and their actions.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use kubedeck_core::{AppError, AppResult};
use kubedeck_domain::ResourceSchemaRegistry;

/// Permission an endpoint demands, resolved once at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRequirement {
    resource: String,
    template: String,
    actions: Vec<String>,
}

impl PermissionRequirement {
    /// Returns the resource name the endpoint was registered with.
    #[must_use]
    pub fn resource(&self) -> &str {
        self.resource.as_str()
    }

    /// Returns the canonical resource path template.
    #[must_use]
    pub fn template(&self) -> &str {
        self.template.as_str()
    }

    /// Returns the actions the endpoint performs.
    #[must_use]
    pub fn actions(&self) -> &[String] {
        self.actions.as_slice()
    }
}

/// Records every resource and action an endpoint is gated on.
///
/// Registration only happens while routes are assembled; afterwards the
/// registry is only read to list the gated resources.
#[derive(Debug)]
pub struct ResourceActionRegistry {
    schema: ResourceSchemaRegistry,
    actions: Mutex<BTreeMap<String, BTreeSet<String>>>,
}

impl ResourceActionRegistry {
    /// Creates an empty registry over a resource schema.
    #[must_use]
    pub fn new(schema: ResourceSchemaRegistry) -> Self {
        Self {
            schema,
            actions: Mutex::new(BTreeMap::new()),
        }
    }

    /// Resolves `resource` and records `actions` for it.
    ///
    /// Unknown or ambiguous resource names fail, which aborts route assembly.
    pub fn register(&self, resource: &str, actions: &[&str]) -> AppResult<PermissionRequirement> {
        if actions.is_empty() {
            return Err(AppError::Validation(format!(
                "resource {resource} must be registered with at least one action"
            )));
        }

        let template = self.schema.resolve(resource)?;
        let mut registered = self.actions.lock().map_err(|error| {
            AppError::Internal(format!("resource action registry lock poisoned: {error}"))
        })?;
        registered
            .entry(resource.to_owned())
            .or_default()
            .extend(actions.iter().map(|action| (*action).to_owned()));

        Ok(PermissionRequirement {
            resource: resource.to_owned(),
            template,
            actions: actions.iter().map(|action| (*action).to_owned()).collect(),
        })
    }

    /// Returns every registered resource with its sorted actions.
    pub fn snapshot(&self) -> AppResult<BTreeMap<String, Vec<String>>> {
        let registered = self.actions.lock().map_err(|error| {
            AppError::Internal(format!("resource action registry lock poisoned: {error}"))
        })?;

        Ok(registered
            .iter()
            .map(|(resource, actions)| (resource.clone(), actions.iter().cloned().collect()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use kubedeck_core::{AppError, AppResult};
    use kubedeck_domain::ResourceSchemaRegistry;

    use super::ResourceActionRegistry;

    fn registry() -> AppResult<ResourceActionRegistry> {
        Ok(ResourceActionRegistry::new(ResourceSchemaRegistry::platform()?))
    }

    #[test]
    fn register_resolves_template() -> AppResult<()> {
        let registry = registry()?;

        let requirement = registry.register("component", &["detail"])?;
        assert_eq!(
            requirement.template(),
            "project:{projectName}/application:{appName}/component:{compName}"
        );
        assert_eq!(requirement.actions(), &["detail".to_owned()]);
        assert_eq!(requirement.resource(), "component");
        Ok(())
    }

    #[test]
    fn register_merges_actions_per_resource() -> AppResult<()> {
        let registry = registry()?;

        registry.register("user", &["list"])?;
        registry.register("user", &["create", "list"])?;
        registry.register("project/role", &["list"])?;

        let snapshot = registry.snapshot()?;
        assert_eq!(
            snapshot.get("user"),
            Some(&vec!["create".to_owned(), "list".to_owned()])
        );
        assert_eq!(snapshot.get("project/role"), Some(&vec!["list".to_owned()]));
        Ok(())
    }

    #[test]
    fn ambiguous_or_unknown_resource_fails() -> AppResult<()> {
        let registry = registry()?;

        assert!(matches!(
            registry.register("workflow", &["list"]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            registry.register("widget", &["list"]),
            Err(AppError::NotFound(_))
        ));
        assert!(registry.snapshot()?.is_empty());
        Ok(())
    }

    #[test]
    fn empty_action_set_is_rejected() -> AppResult<()> {
        let registry = registry()?;

        assert!(registry.register("user", &[]).is_err());
        Ok(())
    }
}
