use kubedeck_application::ProjectRepository;

use super::*;

#[async_trait]
impl ProjectRepository for PostgresRbacRepository {
    async fn find_project(&self, name: &str) -> AppResult<Option<Project>> {
        sqlx::query_as::<_, ProjectRow>(
            "SELECT name, alias, owner, description, created_at FROM projects WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Project::from))
        .map_err(|error| AppError::Internal(format!("failed to find project '{name}': {error}")))
    }

    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            "SELECT name, alias, owner, description, created_at FROM projects ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list projects: {error}")))?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn create_project(&self, project: Project) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO projects (name, alias, owner, description, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&project.name)
        .bind(&project.alias)
        .bind(&project.owner)
        .bind(&project.description)
        .bind(project.created_at)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(|error| insert_error(error, &format!("project '{}'", project.name)))
    }

    async fn find_project_user(
        &self,
        project: &str,
        username: &str,
    ) -> AppResult<Option<ProjectUser>> {
        sqlx::query_as::<_, ProjectUserRow>(
            r#"
            SELECT project_name, username, roles
            FROM project_users
            WHERE project_name = $1 AND username = $2
            "#,
        )
        .bind(project)
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(ProjectUser::from))
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find membership of '{username}' in project '{project}': {error}"
            ))
        })
    }

    async fn list_memberships(&self, username: &str) -> AppResult<Vec<ProjectUser>> {
        let rows = sqlx::query_as::<_, ProjectUserRow>(
            r#"
            SELECT project_name, username, roles
            FROM project_users
            WHERE username = $1
            ORDER BY project_name
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list memberships of '{username}': {error}"
            ))
        })?;

        Ok(rows.into_iter().map(ProjectUser::from).collect())
    }

    async fn save_project_user(&self, member: ProjectUser) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO project_users (project_name, username, roles)
            VALUES ($1, $2, $3)
            ON CONFLICT (project_name, username) DO UPDATE SET roles = EXCLUDED.roles
            "#,
        )
        .bind(&member.project_name)
        .bind(&member.username)
        .bind(&member.roles)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to save membership of '{}' in project '{}': {error}",
                member.username, member.project_name
            ))
        })
    }

    async fn delete_memberships(&self, username: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM project_users WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to delete memberships of '{username}': {error}"
                ))
            })
    }

    async fn application_project(&self, app_name: &str) -> AppResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT project FROM applications WHERE name = $1")
            .bind(app_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to resolve project of application '{app_name}': {error}"
                ))
            })
    }

    async fn environment_project(&self, env_name: &str) -> AppResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT project FROM environments WHERE name = $1")
            .bind(env_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to resolve project of environment '{env_name}': {error}"
                ))
            })
    }
}
