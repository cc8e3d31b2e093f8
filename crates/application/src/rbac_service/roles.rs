use kubedeck_domain::validate_name;

use crate::{CreateRoleInput, UpdateRoleInput};

use super::*;

impl RbacService {
    /// Lists the roles of one scope.
    pub async fn list_roles(&self, project: Option<&str>) -> AppResult<Vec<Role>> {
        self.require_scope(project).await?;
        self.roles.list_roles(project).await
    }

    /// Creates a role granting existing permissions of the same scope.
    pub async fn create_role(
        &self,
        project: Option<&str>,
        input: CreateRoleInput,
    ) -> AppResult<Role> {
        self.require_scope(project).await?;
        validate_name("role", &input.name)?;
        self.require_known_permissions(project, &input.permissions)
            .await?;

        let role = Role::new(
            input.name,
            input.alias,
            project.map(ToOwned::to_owned),
            input.permissions,
        );
        self.roles.create_role(role.clone()).await?;
        Ok(role)
    }

    /// Replaces the alias and permissions of a role.
    pub async fn update_role(
        &self,
        project: Option<&str>,
        name: &str,
        input: UpdateRoleInput,
    ) -> AppResult<Role> {
        self.require_scope(project).await?;
        self.require_known_permissions(project, &input.permissions)
            .await?;

        let mut role = self.find_role(project, name).await?;
        role.alias = input.alias;
        role.permissions = input.permissions;
        touch(&mut role.updated_at);

        self.roles.save_role(role.clone()).await?;
        Ok(role)
    }

    /// Deletes a role.
    pub async fn delete_role(&self, project: Option<&str>, name: &str) -> AppResult<()> {
        self.require_scope(project).await?;
        self.roles.delete_role(project, name).await
    }

    async fn require_known_permissions(
        &self,
        project: Option<&str>,
        names: &[String],
    ) -> AppResult<()> {
        if names.is_empty() {
            return Err(AppError::Validation(
                "a role must grant at least one permission".to_owned(),
            ));
        }

        let found = self.permissions.find_permissions(project, names).await?;
        let unknown: Vec<&str> = names
            .iter()
            .filter(|name| !found.iter().any(|permission| &permission.name == *name))
            .map(String::as_str)
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "unknown permissions: {}",
                unknown.join(", ")
            )))
        }
    }
}
