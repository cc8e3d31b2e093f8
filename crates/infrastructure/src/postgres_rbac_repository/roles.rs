use kubedeck_application::RoleRepository;

use super::*;

#[async_trait]
impl RoleRepository for PostgresRbacRepository {
    async fn list_roles(&self, project: Option<&str>) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT project, name, alias, permissions, created_at, updated_at
            FROM rbac_roles
            WHERE project = $1
            ORDER BY name
            "#,
        )
        .bind(project_column(project))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        Ok(rows.into_iter().map(Role::from).collect())
    }

    async fn find_roles(&self, project: Option<&str>, names: &[String]) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT project, name, alias, permissions, created_at, updated_at
            FROM rbac_roles
            WHERE project = $1 AND name = ANY($2)
            ORDER BY name
            "#,
        )
        .bind(project_column(project))
        .bind(names)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find roles: {error}")))?;

        Ok(rows.into_iter().map(Role::from).collect())
    }

    async fn create_role(&self, role: Role) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO rbac_roles (project, name, alias, permissions, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(project_column(role.project.as_deref()))
        .bind(&role.name)
        .bind(&role.alias)
        .bind(&role.permissions)
        .bind(role.created_at)
        .bind(role.updated_at)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(|error| insert_error(error, &format!("role '{}'", role.name)))
    }

    async fn save_role(&self, role: Role) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE rbac_roles
            SET alias = $3, permissions = $4, updated_at = $5
            WHERE project = $1 AND name = $2
            "#,
        )
        .bind(project_column(role.project.as_deref()))
        .bind(&role.name)
        .bind(&role.alias)
        .bind(&role.permissions)
        .bind(role.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to save role '{}': {error}", role.name))
        })?;

        require_affected(result.rows_affected(), &format!("role '{}'", role.name))
    }

    async fn delete_role(&self, project: Option<&str>, name: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM rbac_roles WHERE project = $1 AND name = $2")
            .bind(project_column(project))
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete role '{name}': {error}"))
            })?;

        require_affected(result.rows_affected(), &format!("role '{name}'"))
    }
}
