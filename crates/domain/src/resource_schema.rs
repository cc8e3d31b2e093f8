//! Static resource type hierarchy and resource path resolution.

use std::collections::BTreeMap;

use kubedeck_core::{AppError, AppResult};

use crate::resource::WILDCARD;

/// One node of the resource type tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceSchema {
    path_param: Option<String>,
    children: BTreeMap<String, ResourceSchema>,
}

impl ResourceSchema {
    /// Creates a node addressed by the given request path parameter.
    #[must_use]
    pub fn addressed_by(path_param: impl Into<String>) -> Self {
        Self {
            path_param: Some(path_param.into()),
            children: BTreeMap::new(),
        }
    }

    /// Creates a node without addressable instances.
    #[must_use]
    pub fn unaddressed() -> Self {
        Self::default()
    }

    /// Adds a nested resource type.
    #[must_use]
    pub fn child(mut self, resource_type: impl Into<String>, schema: ResourceSchema) -> Self {
        self.children.insert(resource_type.into(), schema);
        self
    }

    /// Returns the path parameter naming an instance, if any.
    #[must_use]
    pub fn path_param(&self) -> Option<&str> {
        self.path_param.as_deref()
    }

    /// Returns nested resource types.
    #[must_use]
    pub fn children(&self) -> &BTreeMap<String, ResourceSchema> {
        &self.children
    }

    fn template_segment(&self, resource_type: &str) -> String {
        match self.path_param() {
            Some(param) => format!("{resource_type}:{{{param}}}"),
            None => format!("{resource_type}:{WILDCARD}"),
        }
    }
}

/// Fully qualified path of one declared resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QualifiedPath {
    types: Vec<String>,
    template: Vec<String>,
}

impl QualifiedPath {
    fn key(&self) -> String {
        format!("/{}/", self.types.join("/"))
    }

    fn rendered_template(&self) -> String {
        format!("/{}/", self.template.join("/"))
    }

    /// Returns the start index of `parts` as a whole-segment run in the type path.
    fn position_of(&self, parts: &[&str]) -> Option<usize> {
        if parts.is_empty() || parts.len() > self.types.len() {
            return None;
        }

        self.types.windows(parts.len()).position(|window| {
            window
                .iter()
                .zip(parts.iter())
                .all(|(declared, requested)| declared == requested)
        })
    }
}

/// Registry of top-level resource types and the derived qualified paths.
#[derive(Debug, Clone, Default)]
pub struct ResourceSchemaRegistry {
    roots: BTreeMap<String, ResourceSchema>,
    paths: Vec<QualifiedPath>,
}

impl ResourceSchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a top-level resource type with its nested types.
    pub fn declare(
        &mut self,
        resource_type: impl Into<String>,
        schema: ResourceSchema,
    ) -> AppResult<()> {
        let resource_type = resource_type.into();
        if resource_type.trim().is_empty() || resource_type.contains(['/', ':']) {
            return Err(AppError::Validation(format!(
                "invalid resource type '{resource_type}'"
            )));
        }
        if self.roots.contains_key(&resource_type) {
            return Err(AppError::Conflict(format!(
                "resource type '{resource_type}' is already declared"
            )));
        }

        collect_paths(&resource_type, &schema, &mut Vec::new(), &mut Vec::new(), &mut self.paths);
        self.roots.insert(resource_type, schema);
        Ok(())
    }

    /// Returns a top-level resource type.
    #[must_use]
    pub fn lookup(&self, resource_type: &str) -> Option<&ResourceSchema> {
        self.roots.get(resource_type)
    }

    /// Returns every qualified type path mapped to its template.
    ///
    /// Keys look like `/project/application/` and values like
    /// `/project:{projectName}/application:{appName}/`.
    #[must_use]
    pub fn index(&self) -> BTreeMap<String, String> {
        self.paths
            .iter()
            .map(|path| (path.key(), path.rendered_template()))
            .collect()
    }

    /// Resolves a resource type, or a `/`-joined partial chain of types, to
    /// its canonical template such as
    /// `project:{projectName}/application:{appName}/component:{compName}`.
    ///
    /// Fails with `NotFound` when nothing matches and with `Validation` when
    /// the name is shared by more than one distinct path.
    pub fn resolve(&self, resource: &str) -> AppResult<String> {
        if let Some(schema) = self.lookup(resource) {
            return Ok(schema.template_segment(resource));
        }

        let parts: Vec<&str> = resource.split('/').filter(|part| !part.is_empty()).collect();
        let mut resolved: Vec<String> = Vec::new();

        for path in &self.paths {
            let Some(start) = path.position_of(&parts) else {
                continue;
            };
            let template = path.template[..start + parts.len()].join("/");
            if !resolved.contains(&template) {
                resolved.push(template);
            }
        }

        match resolved.len() {
            1 => Ok(resolved.remove(0)),
            0 => Err(AppError::NotFound(format!("there is no resource {resource}"))),
            _ => Err(AppError::Validation(format!(
                "the resource name {resource} is not unique"
            ))),
        }
    }

    /// Builds the resource hierarchy of the delivery platform.
    pub fn platform() -> AppResult<Self> {
        let mut registry = Self::new();

        registry.declare(
            "project",
            ResourceSchema::addressed_by("projectName")
                .child(
                    "application",
                    ResourceSchema::addressed_by("appName")
                        .child(
                            "component",
                            ResourceSchema::addressed_by("compName")
                                .child("trait", ResourceSchema::addressed_by("traitType")),
                        )
                        .child(
                            "workflow",
                            ResourceSchema::addressed_by("workflowName")
                                .child("record", ResourceSchema::addressed_by("record")),
                        )
                        .child("policy", ResourceSchema::addressed_by("policyName"))
                        .child("revision", ResourceSchema::addressed_by("revision"))
                        .child("envBinding", ResourceSchema::addressed_by("envName"))
                        .child("trigger", ResourceSchema::unaddressed()),
                )
                .child("environment", ResourceSchema::addressed_by("envName"))
                .child("workflow", ResourceSchema::addressed_by("workflowName"))
                .child("role", ResourceSchema::addressed_by("roleName"))
                .child("permission", ResourceSchema::unaddressed())
                .child("projectUser", ResourceSchema::addressed_by("userName"))
                .child("applicationTemplate", ResourceSchema::unaddressed())
                .child("config", ResourceSchema::addressed_by("configName"))
                .child("provider", ResourceSchema::unaddressed())
                .child(
                    "pipeline",
                    ResourceSchema::addressed_by("pipelineName")
                        .child("context", ResourceSchema::addressed_by("contextName"))
                        .child("pipelineRun", ResourceSchema::addressed_by("pipelineRunName")),
                ),
        )?;
        registry.declare(
            "cluster",
            ResourceSchema::addressed_by("clusterName")
                .child("namespace", ResourceSchema::unaddressed()),
        )?;
        registry.declare("addon", ResourceSchema::addressed_by("addonName"))?;
        registry.declare("addonRegistry", ResourceSchema::addressed_by("addonRegName"))?;
        registry.declare("target", ResourceSchema::addressed_by("targetName"))?;
        registry.declare("user", ResourceSchema::addressed_by("userName"))?;
        registry.declare("role", ResourceSchema::unaddressed())?;
        registry.declare("permission", ResourceSchema::addressed_by("permissionName"))?;
        registry.declare("systemSetting", ResourceSchema::unaddressed())?;
        registry.declare("definition", ResourceSchema::addressed_by("definitionName"))?;
        registry.declare(
            "configType",
            ResourceSchema::addressed_by("configType")
                .child("config", ResourceSchema::addressed_by("name")),
        )?;
        registry.declare("cloudshell", ResourceSchema::unaddressed())?;
        registry.declare("config", ResourceSchema::unaddressed())?;
        registry.declare("configTemplate", ResourceSchema::unaddressed())?;

        Ok(registry)
    }
}

fn collect_paths(
    resource_type: &str,
    schema: &ResourceSchema,
    types: &mut Vec<String>,
    template: &mut Vec<String>,
    paths: &mut Vec<QualifiedPath>,
) {
    types.push(resource_type.to_owned());
    template.push(schema.template_segment(resource_type));

    paths.push(QualifiedPath {
        types: types.clone(),
        template: template.clone(),
    });
    for (child_type, child) in schema.children() {
        collect_paths(child_type, child, types, template, paths);
    }

    types.pop();
    template.pop();
}
