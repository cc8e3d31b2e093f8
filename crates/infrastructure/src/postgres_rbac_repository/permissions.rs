use kubedeck_application::PermissionRepository;

use super::*;

#[async_trait]
impl PermissionRepository for PostgresRbacRepository {
    async fn list_permissions(&self, project: Option<&str>) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT project, name, alias, resources, actions, effect, created_at, updated_at
            FROM rbac_permissions
            WHERE project = $1
            ORDER BY name
            "#,
        )
        .bind(project_column(project))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        rows.into_iter().map(Permission::try_from).collect()
    }

    async fn find_permissions(
        &self,
        project: Option<&str>,
        names: &[String],
    ) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT project, name, alias, resources, actions, effect, created_at, updated_at
            FROM rbac_permissions
            WHERE project = $1 AND name = ANY($2)
            ORDER BY name
            "#,
        )
        .bind(project_column(project))
        .bind(names)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find permissions: {error}")))?;

        rows.into_iter().map(Permission::try_from).collect()
    }

    async fn create_permission(&self, permission: Permission) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO rbac_permissions
                (project, name, alias, resources, actions, effect, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(project_column(permission.project.as_deref()))
        .bind(&permission.name)
        .bind(&permission.alias)
        .bind(&permission.resources)
        .bind(&permission.actions)
        .bind(permission.effect.as_str())
        .bind(permission.created_at)
        .bind(permission.updated_at)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(|error| insert_error(error, &format!("permission '{}'", permission.name)))
    }

    async fn save_permission(&self, permission: Permission) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE rbac_permissions
            SET alias = $3, resources = $4, actions = $5, effect = $6, updated_at = $7
            WHERE project = $1 AND name = $2
            "#,
        )
        .bind(project_column(permission.project.as_deref()))
        .bind(&permission.name)
        .bind(&permission.alias)
        .bind(&permission.resources)
        .bind(&permission.actions)
        .bind(permission.effect.as_str())
        .bind(permission.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to save permission '{}': {error}",
                permission.name
            ))
        })?;

        require_affected(
            result.rows_affected(),
            &format!("permission '{}'", permission.name),
        )
    }

    async fn delete_permission(&self, project: Option<&str>, name: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM rbac_permissions WHERE project = $1 AND name = $2")
            .bind(project_column(project))
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete permission '{name}': {error}"))
            })?;

        require_affected(result.rows_affected(), &format!("permission '{name}'"))
    }
}
