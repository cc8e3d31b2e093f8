use kubedeck_domain::{Permission, Role};

use super::*;

impl AuthorizationService {
    /// Collects the policies applicable to `user`.
    ///
    /// Platform role policies are included when `with_platform` is set and
    /// the membership role policies of `project` when one is given. Project
    /// policies reaching outside their project are skipped. The built-in
    /// terminal policy is always appended.
    pub async fn user_permissions(
        &self,
        user: &User,
        project: Option<&str>,
        with_platform: bool,
    ) -> AppResult<Vec<Permission>> {
        let mut policies = Vec::new();

        if with_platform && !user.roles.is_empty() {
            policies.extend(self.role_permissions(None, &user.roles).await?);
        }

        if let Some(project) = project
            && let Some(member) = self.projects.find_project_user(project, &user.name).await?
            && !member.roles.is_empty()
        {
            let scoped = self.role_permissions(Some(project), &member.roles).await?;
            policies.extend(scoped.into_iter().filter(|permission| {
                let confined = permission.is_confined_to_scope();
                if !confined {
                    tracing::warn!(
                        project = %project,
                        permission = %permission.name,
                        "ignoring project permission addressing resources outside its project"
                    );
                }
                confined
            }));
        }

        policies.push(Permission::cloudshell());
        Ok(policies)
    }

    async fn role_permissions(
        &self,
        project: Option<&str>,
        role_names: &[String],
    ) -> AppResult<Vec<Permission>> {
        let roles = self.roles.find_roles(project, role_names).await?;
        let names = permission_names(&roles);
        if names.is_empty() {
            return Ok(Vec::new());
        }

        self.permissions.find_permissions(project, &names).await
    }
}

fn permission_names(roles: &[Role]) -> Vec<String> {
    let mut names: Vec<String> = roles
        .iter()
        .flat_map(|role| role.permissions.iter().cloned())
        .collect();
    names.sort();
    names.dedup();
    names
}
