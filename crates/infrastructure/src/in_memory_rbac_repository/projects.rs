use super::*;

impl InMemoryRbacRepository {
    /// Records the project owning an application.
    pub async fn register_application(&self, app_name: &str, project: &str) {
        self.applications
            .write()
            .await
            .insert(app_name.to_owned(), project.to_owned());
    }

    /// Records the project owning an environment.
    pub async fn register_environment(&self, env_name: &str, project: &str) {
        self.environments
            .write()
            .await
            .insert(env_name.to_owned(), project.to_owned());
    }
}

#[async_trait]
impl ProjectRepository for InMemoryRbacRepository {
    async fn find_project(&self, name: &str) -> AppResult<Option<Project>> {
        Ok(self.projects.read().await.get(name).cloned())
    }

    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        let mut projects: Vec<Project> = self.projects.read().await.values().cloned().collect();
        projects.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(projects)
    }

    async fn create_project(&self, project: Project) -> AppResult<()> {
        let mut projects = self.projects.write().await;
        if projects.contains_key(&project.name) {
            return Err(AppError::Conflict(format!(
                "project '{}' already exists",
                project.name
            )));
        }

        projects.insert(project.name.clone(), project);
        Ok(())
    }

    async fn find_project_user(
        &self,
        project: &str,
        username: &str,
    ) -> AppResult<Option<ProjectUser>> {
        Ok(self
            .project_users
            .read()
            .await
            .get(&(project.to_owned(), username.to_owned()))
            .cloned())
    }

    async fn list_memberships(&self, username: &str) -> AppResult<Vec<ProjectUser>> {
        let mut memberships: Vec<ProjectUser> = self
            .project_users
            .read()
            .await
            .values()
            .filter(|member| member.username == username)
            .cloned()
            .collect();
        memberships.sort_by(|left, right| left.project_name.cmp(&right.project_name));
        Ok(memberships)
    }

    async fn save_project_user(&self, member: ProjectUser) -> AppResult<()> {
        self.project_users.write().await.insert(
            (member.project_name.clone(), member.username.clone()),
            member,
        );
        Ok(())
    }

    async fn delete_memberships(&self, username: &str) -> AppResult<()> {
        self.project_users
            .write()
            .await
            .retain(|(_, member), _| member != username);
        Ok(())
    }

    async fn application_project(&self, app_name: &str) -> AppResult<Option<String>> {
        Ok(self.applications.read().await.get(app_name).cloned())
    }

    async fn environment_project(&self, env_name: &str) -> AppResult<Option<String>> {
        Ok(self.environments.read().await.get(env_name).cloned())
    }
}
