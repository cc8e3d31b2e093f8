use kubedeck_domain::{PolicyEffect, ResourceName, WILDCARD, validate_name};

use crate::{CreatePermissionInput, UpdatePermissionInput};

use super::*;

impl RbacService {
    /// Lists the permissions of one scope.
    pub async fn list_permissions(&self, project: Option<&str>) -> AppResult<Vec<Permission>> {
        self.require_scope(project).await?;
        self.permissions.list_permissions(project).await
    }

    /// Creates a permission.
    ///
    /// Empty actions grant every action and a missing effect allows.
    pub async fn create_permission(
        &self,
        project: Option<&str>,
        input: CreatePermissionInput,
    ) -> AppResult<Permission> {
        self.require_scope(project).await?;
        validate_name("permission", &input.name)?;
        let effect = PolicyEffect::from_optional(input.effect.as_deref())?;
        let resources = required_resources(project, input.resources)?;

        let permission = Permission::new(
            input.name,
            input.alias,
            project.map(ToOwned::to_owned),
            resources,
            actions_or_wildcard(input.actions),
            effect,
        );
        self.permissions
            .create_permission(permission.clone())
            .await?;
        Ok(permission)
    }

    /// Replaces the alias, resources, actions, and effect of a permission.
    pub async fn update_permission(
        &self,
        project: Option<&str>,
        name: &str,
        input: UpdatePermissionInput,
    ) -> AppResult<Permission> {
        self.require_scope(project).await?;
        let effect = PolicyEffect::from_optional(input.effect.as_deref())?;
        let resources = required_resources(project, input.resources)?;

        let mut permission = self.find_permission(project, name).await?;
        permission.alias = input.alias;
        permission.resources = resources;
        permission.actions = actions_or_wildcard(input.actions);
        permission.effect = effect;
        touch(&mut permission.updated_at);

        self.permissions.save_permission(permission.clone()).await?;
        Ok(permission)
    }

    /// Deletes a permission no role of the scope references.
    pub async fn delete_permission(&self, project: Option<&str>, name: &str) -> AppResult<()> {
        self.require_scope(project).await?;

        let roles = self.roles.list_roles(project).await?;
        if let Some(role) = roles
            .iter()
            .find(|role| role.permissions.iter().any(|permission| permission == name))
        {
            return Err(AppError::Conflict(format!(
                "permission '{name}' is used by role '{}'",
                role.name
            )));
        }

        self.permissions.delete_permission(project, name).await
    }

    /// Returns the built-in permission templates of a scope.
    #[must_use]
    pub fn list_permission_templates(&self, scope: PermissionScope) -> &'static [PermissionTemplate] {
        PermissionTemplate::defaults(scope)
    }
}

/// Trims and checks the resource patterns of a permission.
///
/// Project permissions may only address resources under their own project.
fn required_resources(project: Option<&str>, resources: Vec<String>) -> AppResult<Vec<String>> {
    let resources: Vec<String> = resources
        .into_iter()
        .map(|resource| resource.trim().to_owned())
        .filter(|resource| !resource.is_empty())
        .collect();

    if resources.is_empty() {
        return Err(AppError::Validation(
            "a permission must name at least one resource".to_owned(),
        ));
    }

    if let Some(project) = project
        && let Some(escaping) = resources
            .iter()
            .find(|resource| !ResourceName::parse(resource).is_within_project(project))
    {
        return Err(AppError::Validation(format!(
            "resource '{escaping}' must start with 'project:{project}'"
        )));
    }

    Ok(resources)
}

fn actions_or_wildcard(actions: Vec<String>) -> Vec<String> {
    if actions.is_empty() {
        vec![WILDCARD.to_owned()]
    } else {
        actions
    }
}
