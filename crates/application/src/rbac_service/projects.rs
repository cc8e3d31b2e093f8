use kubedeck_domain::{Project, ProjectRoleTemplate, ProjectUser, validate_name};

use crate::CreateProjectInput;

use super::*;

impl RbacService {
    /// Lists every project.
    pub async fn list_projects(&self) -> AppResult<Vec<Project>> {
        self.projects.list_projects().await
    }

    /// Creates a project and seeds its default roles and permissions.
    pub async fn create_project(&self, input: CreateProjectInput) -> AppResult<Project> {
        validate_name("project", &input.name)?;
        if let Some(owner) = input.owner.as_deref()
            && self.users.find_user(owner).await?.is_none()
        {
            return Err(AppError::Validation(format!(
                "project owner '{owner}' does not exist"
            )));
        }

        let project = Project {
            name: input.name,
            alias: input.alias,
            owner: input.owner,
            description: input.description,
            created_at: Utc::now(),
        };
        self.projects.create_project(project.clone()).await?;
        self.sync_default_roles_for_project(&project).await?;

        tracing::info!(project = %project.name, "created project");
        Ok(project)
    }

    /// Brings the default permissions of a project up to date.
    ///
    /// Missing default permissions are created and drifted ones rewritten.
    /// On the first sync the default roles are created and the owner, if
    /// any, becomes project admin.
    pub async fn sync_default_roles_for_project(&self, project: &Project) -> AppResult<()> {
        let scope = Some(project.name.as_str());
        let existing = self.permissions.list_permissions(scope).await?;
        let first_sync = existing.is_empty();

        for template in PermissionTemplate::defaults(PermissionScope::Project) {
            let desired = template.instantiate(scope);
            match existing.iter().find(|current| current.name == desired.name) {
                None => self.permissions.create_permission(desired).await?,
                Some(current)
                    if current.resources != desired.resources
                        || current.actions != desired.actions =>
                {
                    let mut updated = current.clone();
                    updated.resources = desired.resources;
                    updated.actions = desired.actions;
                    touch(&mut updated.updated_at);
                    self.permissions.save_permission(updated).await?;
                }
                Some(_) => {}
            }
        }

        if !first_sync {
            return Ok(());
        }

        for template in ProjectRoleTemplate::defaults() {
            self.roles
                .create_role(template.instantiate(&project.name))
                .await?;
        }

        if let Some(owner) = project.owner.as_deref() {
            self.projects
                .save_project_user(ProjectUser {
                    project_name: project.name.clone(),
                    username: owner.to_owned(),
                    roles: vec![ProjectRoleTemplate::OWNER_ROLE.to_owned()],
                })
                .await?;
        }

        tracing::debug!(project = %project.name, "seeded default project roles");
        Ok(())
    }
}
